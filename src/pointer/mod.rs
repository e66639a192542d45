//! Concrete [`PointerDispatcher`] for a Hyprland desktop.
//!
//! Absolute warps are requested from the compositor, which knows the
//! global layout; relative nudges and clicks are injected through a uinput
//! virtual mouse so they behave like a real device.

pub mod uinput;

use crate::command::Direction;
use crate::hyprland::wm::{HyprlandWm, HyprlandWmError};
use crate::traits::PointerDispatcher;
use evdev::Key;
use uinput::{UinputError, UinputMouse};

/// Errors from either half of the [`HostPointer`].
#[derive(Debug, thiserror::Error)]
pub enum HostPointerError {
    #[error(transparent)]
    Compositor(#[from] HyprlandWmError),
    #[error(transparent)]
    Device(#[from] UinputError),
}

/// Compositor warps plus a uinput mouse.
pub struct HostPointer {
    wm: HyprlandWm,
    mouse: UinputMouse,
}

impl HostPointer {
    pub fn new(wm: HyprlandWm, mouse: UinputMouse) -> Self {
        Self { wm, mouse }
    }
}

impl PointerDispatcher for HostPointer {
    type Error = HostPointerError;

    fn move_absolute(&mut self, x: i32, y: i32) -> Result<(), Self::Error> {
        Ok(self.wm.move_cursor(x, y)?)
    }

    fn move_relative(&mut self, direction: Direction, magnitude: u32) -> Result<(), Self::Error> {
        Ok(self.mouse.nudge(direction, magnitude)?)
    }

    fn primary_click(&mut self) -> Result<(), Self::Error> {
        Ok(self.mouse.click(Key::BTN_LEFT)?)
    }

    fn secondary_click(&mut self) -> Result<(), Self::Error> {
        Ok(self.mouse.click(Key::BTN_RIGHT)?)
    }
}
