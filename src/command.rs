//! Vocabulary shared by every component of hyprwarp.
//!
//! [`KeyEvent`] is what the overlay (or any other [`KeySource`]) feeds into
//! the session, [`Effect`] is what the session asks its host to do, and
//! [`MonitorInfo`] describes the display geometry the grid is built from.
//!
//! Key events have a JSON wire format so a session can be scripted from
//! stdin: either a bare key name (`"a"`, `"Escape"`) or an object with
//! optional modifier flags (`{"key":"Enter","control":true}`).  The flags
//! may also be grouped as `{"key":"Enter","modifiers":{"control":true}}`.
//!
//! [`KeySource`]: crate::traits::KeySource

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Direction of a relative pointer nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit vector in screen coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Index of a screen in the order the monitors were enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub usize);

/// Static information about a monitor, in global layout coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Unique name the compositor uses for this monitor (e.g. `"DP-1"`).
    pub name: String,
    /// Width in layout pixels.
    pub width: u32,
    /// Height in layout pixels.
    pub height: u32,
    /// X position on the virtual desktop.
    pub x: i32,
    /// Y position on the virtual desktop.
    pub y: i32,
}

//  Keys

/// A logical key, already translated from whatever the window system uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character; letters are matched case-insensitively.
    Char(char),
    Backspace,
    Enter,
    Escape,
    CapsLock,
    /// Anything the session has no use for.
    Other,
}

impl Key {
    /// Escape-class keys that abort the session from any mode.
    pub fn is_cancel(self) -> bool {
        matches!(self, Key::Escape | Key::CapsLock)
    }
}

/// Parse a key name (case-insensitive for named keys).
fn parse_key(s: &str) -> Option<Key> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Char(c));
    }
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "backspace" => Some(Key::Backspace),
        "enter" | "return" => Some(Key::Enter),
        "escape" | "esc" => Some(Key::Escape),
        "capslock" => Some(Key::CapsLock),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_key(&s).ok_or_else(|| DeError::custom(format!("invalid key: {:?}", s)))
    }
}

/// Modifier keys held while a key was released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default, alias = "ctrl")]
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
    };
}

/// A key-release event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key released with no modifier held.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// A character key released with no modifier held.
    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }
}

impl<'de> Deserialize<'de> for KeyEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = KeyEvent;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "key name or object {{key, shift, control}}")
            }
            fn visit_map<A>(self, mut map: A) -> Result<KeyEvent, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut key = None;
                let mut modifiers = Modifiers::NONE;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "key" => key = Some(map.next_value::<Key>()?),
                        "shift" => modifiers.shift = map.next_value()?,
                        "control" | "ctrl" => modifiers.control = map.next_value()?,
                        "modifiers" => {
                            let nested: Modifiers = map.next_value()?;
                            modifiers.shift |= nested.shift;
                            modifiers.control |= nested.control;
                        }
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                let key = key.ok_or_else(|| DeError::missing_field("key"))?;
                Ok(KeyEvent { key, modifiers })
            }
            fn visit_str<E>(self, s: &str) -> Result<KeyEvent, E>
            where
                E: DeError,
            {
                parse_key(s)
                    .map(KeyEvent::plain)
                    .ok_or_else(|| DeError::custom(format!("invalid key: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

//  Effects

/// A command for the [`PointerDispatcher`](crate::traits::PointerDispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCommand {
    /// Warp to a point in global desktop coordinates.
    MoveAbsolute { x: i32, y: i32 },
    /// Nudge by `magnitude` pixels in `direction`.
    MoveRelative { direction: Direction, magnitude: u32 },
    PrimaryClick,
    SecondaryClick,
}

/// A request for the rendering host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRequest {
    /// Bring the given screen's overlay surface to the foreground.
    FocusScreen(ScreenId),
    /// Hide every overlay surface so a click reaches the window underneath.
    Hide,
    /// Show the overlay surfaces again.
    Show,
}

/// A side effect produced by one session step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Pointer(PointerCommand),
    Overlay(OverlayRequest),
}

/// Why a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Clicked,
}

/// Whether the host should keep feeding events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Finished(Outcome),
}

impl Status {
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn direction_delta_points_down_for_down() {
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
    }

    #[test]
    fn cancel_keys() {
        assert!(Key::Escape.is_cancel());
        assert!(Key::CapsLock.is_cancel());
        assert!(!Key::Enter.is_cancel());
        assert!(!Key::Char('q').is_cancel());
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(parse_key("Escape"), Some(Key::Escape));
        assert_eq!(parse_key("esc"), Some(Key::Escape));
        assert_eq!(parse_key("Caps_Lock"), Some(Key::CapsLock));
        assert_eq!(parse_key("BackSpace"), Some(Key::Backspace));
        assert_eq!(parse_key("Return"), Some(Key::Enter));
        assert_eq!(parse_key("q"), Some(Key::Char('q')));
        assert_eq!(parse_key("F13"), None);
    }

    #[test]
    fn deserialize_bare_key_event() {
        let ev: KeyEvent = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(ev, KeyEvent::char('a'));
    }

    #[test]
    fn deserialize_key_event_with_modifiers() {
        let ev: KeyEvent =
            serde_json::from_str(r#"{"key":"Enter","control":true,"extra":1}"#).unwrap();
        assert_eq!(ev, KeyEvent::new(Key::Enter, Modifiers::CONTROL));
        let ev: KeyEvent = serde_json::from_str(r#"{"key":"Enter","shift":true}"#).unwrap();
        assert_eq!(ev.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn grouped_modifiers_are_kept() {
        let ev: KeyEvent = serde_json::from_str(
            r#"{"key":"Enter","modifiers":{"shift":false,"control":true}}"#,
        )
        .unwrap();
        assert_eq!(ev, KeyEvent::new(Key::Enter, Modifiers::CONTROL));

        let ev: KeyEvent =
            serde_json::from_str(r#"{"key":"l","shift":true,"modifiers":{"ctrl":true}}"#).unwrap();
        assert_eq!(
            ev,
            KeyEvent::new(
                Key::Char('l'),
                Modifiers {
                    shift: true,
                    control: true
                }
            )
        );
    }

    #[test]
    fn deserialize_rejects_unknown_key() {
        assert!(serde_json::from_str::<KeyEvent>(r#""Hyper""#).is_err());
        assert!(serde_json::from_str::<KeyEvent>(r#"{"shift":true}"#).is_err());
    }

    #[test]
    fn status_finished() {
        assert!(!Status::Continue.is_finished());
        assert!(Status::Finished(Outcome::Cancelled).is_finished());
    }
}
