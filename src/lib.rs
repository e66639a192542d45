//! **hyprwarp**: move the mouse pointer with the keyboard.
//!
//! Every screen is tiled into square cells and each cell gets a unique
//! two-letter label.  Typing a label warps the pointer to the centre of that
//! cell; afterwards `h`/`j`/`k`/`l` nudge the pointer and `Enter` clicks.
//!
//! # Architecture
//!
//! The core is pure and synchronous:
//!
//! * [`label`] allocates unique two-letter labels from an alphabet.
//! * [`grid`] tiles the screens into labelled cells.
//! * [`session`] is the grid/cursor state machine.  [`session::Session::step`]
//!   takes one key event and returns the effects to perform, in order.
//!
//! Side effects are kept behind traits in [`traits`]:
//!
//! * [`traits::MonitorEnumerator`] discovers the screen layout.
//! * [`traits::PointerDispatcher`] moves and clicks the pointer.
//! * [`traits::OverlayHost`] focuses, hides and shows the overlay surfaces.
//! * [`traits::KeySource`] delivers key events from a transport.
//!
//! [`navigator::Navigator`] connects a session to these collaborators.
//! Concrete implementations live in [`hyprland`] (Hyprland IPC),
//! [`pointer`] (uinput), [`input`] (scripted keys) and [`overlay`] (GTK4).

pub mod command;
pub mod config;
pub mod grid;
pub mod hyprland;
pub mod input;
pub mod label;
pub mod navigator;
pub mod overlay;
pub mod pointer;
pub mod session;
pub mod traits;
