//! Entry point for **hyprwarp**.
//!
//! Queries the monitor layout, builds a session and runs it to completion.
//!
//! When the `overlay-gtk` feature is enabled the main thread runs the GLib
//! main loop and the labelled grid is drawn on a layer-shell overlay.  With
//! `--stdin`, or without the feature, key events are read as JSON lines from
//! standard input on a background thread instead.
//!
//! Flags:
//!
//! * `--stdin`: headless mode, keys come from standard input.
//! * `--seed <N>`: fix the label shuffle.

use clap::Parser;
use hyprwarp::command::{KeyEvent, MonitorInfo, Status};
use hyprwarp::config::Config;
use hyprwarp::hyprland::wm::{HyprlandWm, MonitorFocus};
use hyprwarp::input::stdin::StdinKeySource;
use hyprwarp::navigator::{Navigator, NavigatorError};
use hyprwarp::pointer::uinput::UinputMouse;
use hyprwarp::pointer::HostPointer;
use hyprwarp::session::Session;
use hyprwarp::traits::{KeySource, MonitorEnumerator, PointerDispatcher};
use log::{error, info};
use std::sync::mpsc;

//  Arguments

/// Move the mouse pointer with the keyboard
#[derive(Parser, Debug)]
#[command(name = "hyprwarp", version, about = "Move the mouse pointer with the keyboard")]
struct Args {
    /// Read key events as JSON lines from stdin instead of showing the overlay
    #[arg(long)]
    stdin: bool,

    /// Seed for the label shuffle; the same seed gives the same layout
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            label_seed: self.seed,
            ..Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = args.config();

    let wm = HyprlandWm::new();
    let monitors = match wm.monitors() {
        Ok(m) => {
            info!("found {} monitor(s)", m.len());
            m
        }
        Err(e) => {
            error!("failed to query monitors: {}", e);
            std::process::exit(1);
        }
    };

    let session = match Session::from_monitors(&monitors, &config) {
        Ok(s) => {
            info!("grid has {} cell(s)", s.grid().len());
            s
        }
        Err(e) => {
            error!("cannot build session: {}", e);
            std::process::exit(1);
        }
    };

    let mouse = match UinputMouse::new() {
        Ok(m) => m,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let navigator = Navigator::new(session, HostPointer::new(wm, mouse));

    if !args.stdin && cfg!(not(feature = "overlay-gtk")) {
        info!("built without the GTK overlay, falling back to stdin");
    }

    #[cfg(feature = "overlay-gtk")]
    {
        if !args.stdin {
            run_overlay(navigator);
            return;
        }
    }

    run_headless(navigator, wm, &monitors);
}

//  Event loops

/// Feed key events from standard input until the session finishes.
fn run_headless<P: PointerDispatcher>(
    mut navigator: Navigator<P>,
    wm: HyprlandWm,
    monitors: &[MonitorInfo],
) {
    navigator.set_overlay(Box::new(MonitorFocus::new(wm, monitors)));

    let (key_tx, key_rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut source = StdinKeySource::stdin();
        if let Err(e) = source.run(key_tx) {
            error!("stdin key source error: {}", e);
        }
    });

    info!("reading key events from stdin");
    match drive(&mut navigator, key_rx) {
        Ok(Status::Continue) => info!("input closed before the session finished"),
        Ok(Status::Finished(_)) => {}
        Err(e) => {
            error!("session aborted: {}", e);
            std::process::exit(1);
        }
    }
}

/// Hand `events` to the navigator until the session finishes.
///
/// Events after the finishing one are left unread.
fn drive<P: PointerDispatcher>(
    navigator: &mut Navigator<P>,
    events: impl IntoIterator<Item = KeyEvent>,
) -> Result<Status, NavigatorError> {
    for event in events {
        if let Status::Finished(outcome) = navigator.handle(event)? {
            return Ok(Status::Finished(outcome));
        }
    }
    Ok(Status::Continue)
}

#[cfg(feature = "overlay-gtk")]
fn run_overlay<P: PointerDispatcher + 'static>(navigator: Navigator<P>) {
    match hyprwarp::overlay::gtk::run_main_loop(navigator) {
        Ok(Status::Continue) => info!("overlay closed before the session finished"),
        Ok(Status::Finished(_)) => {}
        Err(e) => {
            error!("overlay error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyprwarp::command::{Direction, Key, Modifiers, Outcome};
    use hyprwarp::config::{AfterClick, NudgeConfig};
    use hyprwarp::grid::Grid;
    use hyprwarp::label::{Alphabet, LabelAllocator};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn no_flags_uses_defaults() {
        let args = Args::try_parse_from(["hyprwarp"]).unwrap();
        assert!(!args.stdin);
        assert_eq!(args.seed, None);
        assert_eq!(args.config(), Config::default());
    }

    #[test]
    fn seed_and_stdin_flags() {
        let args = Args::try_parse_from(["hyprwarp", "--stdin", "--seed", "42"]).unwrap();
        assert!(args.stdin);
        assert_eq!(args.config().label_seed, Some(42));
    }

    #[test]
    fn bad_seed_and_unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["hyprwarp", "--seed", "-1"]).is_err());
        assert!(Args::try_parse_from(["hyprwarp", "--seed"]).is_err());
        assert!(Args::try_parse_from(["hyprwarp", "--grid"]).is_err());
    }

    /// Counts clicks; moves are accepted and ignored.
    struct CountingPointer {
        clicks: Rc<Cell<usize>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("never fails")]
    struct Never;

    impl PointerDispatcher for CountingPointer {
        type Error = Never;

        fn move_absolute(&mut self, _: i32, _: i32) -> Result<(), Never> {
            Ok(())
        }

        fn move_relative(&mut self, _: Direction, _: u32) -> Result<(), Never> {
            Ok(())
        }

        fn primary_click(&mut self) -> Result<(), Never> {
            self.clicks.set(self.clicks.get() + 1);
            Ok(())
        }

        fn secondary_click(&mut self) -> Result<(), Never> {
            self.clicks.set(self.clicks.get() + 1);
            Ok(())
        }
    }

    fn navigator(clicks: Rc<Cell<usize>>) -> Navigator<CountingPointer> {
        let monitors = [MonitorInfo {
            name: "DP-1".into(),
            width: 240,
            height: 120,
            x: 0,
            y: 0,
        }];
        let alphabet = Alphabet::default();
        let grid = Grid::build(&monitors, 120, &mut LabelAllocator::ordered(&alphabet)).unwrap();
        let session = Session::new(grid, alphabet, NudgeConfig::default(), AfterClick::Exit);
        Navigator::new(session, CountingPointer { clicks })
    }

    #[test]
    fn drive_stops_at_the_finishing_event() {
        let clicks = Rc::new(Cell::new(0));
        let mut nav = navigator(clicks.clone());
        let mut events = vec![
            KeyEvent::char('a'),
            KeyEvent::char('a'),
            KeyEvent::plain(Key::Enter),
            KeyEvent::new(Key::Enter, Modifiers::CONTROL),
        ]
        .into_iter();

        let status = drive(&mut nav, &mut events).unwrap();
        assert_eq!(status, Status::Finished(Outcome::Clicked));
        assert_eq!(clicks.get(), 1);
        assert_eq!(
            events.next(),
            Some(KeyEvent::new(Key::Enter, Modifiers::CONTROL))
        );
    }

    #[test]
    fn drive_reports_unfinished_input() {
        let clicks = Rc::new(Cell::new(0));
        let mut nav = navigator(clicks.clone());
        let status = drive(&mut nav, vec![KeyEvent::char('a')]).unwrap();
        assert_eq!(status, Status::Continue);
        assert_eq!(clicks.get(), 0);
    }
}
