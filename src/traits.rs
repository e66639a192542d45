//! Core traits that decouple the session from any specific compositor,
//! input device, or UI toolkit.
//!
//! Every concrete backend (Hyprland IPC, a uinput mouse, the GTK overlay,
//! a stdin reader, a test harness, …) implements one of these traits.  The
//! [`Navigator`](crate::navigator::Navigator) only depends on these
//! abstractions.

use crate::command::{Direction, KeyEvent, MonitorInfo, ScreenId};
use std::sync::mpsc;

/// Source of display geometry.
pub trait MonitorEnumerator {
    /// The error type produced by this enumerator.
    type Error: std::error::Error + Send + 'static;

    /// Return every active monitor in global layout coordinates.
    fn monitors(&self) -> Result<Vec<MonitorInfo>, Self::Error>;
}

/// Something that can move the pointer and click.
///
/// An implementation might inject events through uinput, ask the
/// compositor to warp the cursor, or simply record calls in a test.
pub trait PointerDispatcher {
    /// The error type produced by this dispatcher.
    type Error: std::error::Error + Send + 'static;

    /// Warp the pointer to `(x, y)` in global desktop coordinates.
    fn move_absolute(&mut self, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Move the pointer `magnitude` pixels in `direction`.
    fn move_relative(&mut self, direction: Direction, magnitude: u32) -> Result<(), Self::Error>;

    /// Press and release the primary (left) button.
    fn primary_click(&mut self) -> Result<(), Self::Error>;

    /// Press and release the secondary (right) button.
    fn secondary_click(&mut self) -> Result<(), Self::Error>;
}

/// The rendering side of the overlay.
///
/// The navigator calls these synchronously, in the order the session asked
/// for them, so a surface is already hidden when a click is injected.
pub trait OverlayHost {
    /// Raise the surface covering `screen` and give it keyboard focus.
    fn focus_screen(&mut self, screen: ScreenId);

    /// Hide every surface.
    fn hide(&mut self);

    /// Show every surface again.
    fn show(&mut self);
}

/// A source of [`KeyEvent`]s.
///
/// # Contract
///
/// * [`run`](KeySource::run) **blocks** until the source is exhausted, the
///   sink is closed, or an unrecoverable error occurs.
/// * Each received event must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait KeySource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start reading and forward every key event into `sink`.
    fn run(&mut self, sink: mpsc::Sender<KeyEvent>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Key;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    //  Mock MonitorEnumerator

    struct FixedMonitors;

    impl MonitorEnumerator for FixedMonitors {
        type Error = MockError;

        fn monitors(&self) -> Result<Vec<MonitorInfo>, MockError> {
            Ok(vec![MonitorInfo {
                name: "MOCK-1".into(),
                width: 1920,
                height: 1080,
                x: 0,
                y: 0,
            }])
        }
    }

    #[test]
    fn mock_enumerator_lists_monitors() {
        let monitors = FixedMonitors.monitors().unwrap();
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].name, "MOCK-1");
    }

    //  Mock PointerDispatcher

    /// Tracks a pointer position instead of touching a device.
    #[derive(Debug, Default)]
    struct VirtualPointer {
        pos: (i32, i32),
        clicks: Vec<&'static str>,
    }

    impl PointerDispatcher for VirtualPointer {
        type Error = MockError;

        fn move_absolute(&mut self, x: i32, y: i32) -> Result<(), MockError> {
            self.pos = (x, y);
            Ok(())
        }

        fn move_relative(&mut self, direction: Direction, magnitude: u32) -> Result<(), MockError> {
            let (dx, dy) = direction.delta();
            self.pos.0 += dx * magnitude as i32;
            self.pos.1 += dy * magnitude as i32;
            Ok(())
        }

        fn primary_click(&mut self) -> Result<(), MockError> {
            self.clicks.push("primary");
            Ok(())
        }

        fn secondary_click(&mut self) -> Result<(), MockError> {
            self.clicks.push("secondary");
            Ok(())
        }
    }

    #[test]
    fn virtual_pointer_tracks_moves() {
        let mut p = VirtualPointer::default();
        p.move_absolute(100, 100).unwrap();
        p.move_relative(Direction::Left, 3).unwrap();
        p.move_relative(Direction::Down, 15).unwrap();
        p.secondary_click().unwrap();
        assert_eq!(p.pos, (97, 115));
        assert_eq!(p.clicks, vec!["secondary"]);
    }

    //  Mock KeySource

    /// Emits a fixed sequence of events.
    struct ScriptedKeys {
        events: Vec<KeyEvent>,
    }

    impl KeySource for ScriptedKeys {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<KeyEvent>) -> Result<(), MockError> {
            for ev in self.events.drain(..) {
                let _ = sink.send(ev);
            }
            Ok(())
        }
    }

    #[test]
    fn scripted_source_emits_events() {
        let mut src = ScriptedKeys {
            events: vec![KeyEvent::char('a'), KeyEvent::plain(Key::Escape)],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let events: Vec<KeyEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![KeyEvent::char('a'), KeyEvent::plain(Key::Escape)]);
    }
}
