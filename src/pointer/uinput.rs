//! Virtual mouse backed by `/dev/uinput`.
//!
//! The device only reports relative motion and two buttons, which is all
//! a nudge or a click needs.  Absolute warps go through the compositor
//! instead, see [`HostPointer`](super::HostPointer).
//!
//! Creating the device needs write access to `/dev/uinput` (usually the
//! `input` group or a udev rule).

use crate::command::Direction;
use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use log::info;
use std::io;

/// Name the virtual device registers under.
pub const DEVICE_NAME: &str = "hyprwarp virtual pointer";

/// Errors from creating or writing to the virtual mouse.
#[derive(Debug, thiserror::Error)]
pub enum UinputError {
    #[error("cannot create uinput device: {0}")]
    Create(io::Error),
    #[error("cannot write uinput event: {0}")]
    Emit(#[from] io::Error),
}

/// A relative mouse with left and right buttons.
pub struct UinputMouse {
    device: VirtualDevice,
}

impl UinputMouse {
    pub fn new() -> Result<Self, UinputError> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);

        let device = VirtualDeviceBuilder::new()
            .and_then(|b| b.name(DEVICE_NAME).with_keys(&keys))
            .and_then(|b| b.with_relative_axes(&axes))
            .and_then(|b| b.build())
            .map_err(UinputError::Create)?;
        info!("created uinput device {:?}", DEVICE_NAME);
        Ok(Self { device })
    }

    /// Move by `magnitude` pixels in `direction`.
    pub fn nudge(&mut self, direction: Direction, magnitude: u32) -> Result<(), UinputError> {
        let (dx, dy) = direction.delta();
        let magnitude = magnitude as i32;
        let mut events = Vec::with_capacity(2);
        if dx != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE,
                RelativeAxisType::REL_X.0,
                dx * magnitude,
            ));
        }
        if dy != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE,
                RelativeAxisType::REL_Y.0,
                dy * magnitude,
            ));
        }
        self.device.emit(&events)?;
        Ok(())
    }

    /// Press and release `button`; each half is its own report.
    pub fn click(&mut self, button: Key) -> Result<(), UinputError> {
        self.device
            .emit(&[InputEvent::new(EventType::KEY, button.code(), 1)])?;
        self.device
            .emit(&[InputEvent::new(EventType::KEY, button.code(), 0)])?;
        Ok(())
    }
}
