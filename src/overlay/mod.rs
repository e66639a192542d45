//! Overlay implementations.
//!
//! When the `overlay-gtk` feature is enabled, [`gtk::run_main_loop`] takes
//! over the main thread and drives both key handling and rendering through
//! the GLib main loop.

#[cfg(feature = "overlay-gtk")]
pub mod gtk;
