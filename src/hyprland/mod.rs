//! Hyprland-specific implementations.
//!
//! This module provides the [`MonitorEnumerator`](crate::traits::MonitorEnumerator)
//! backend, absolute cursor warping and monitor focus, powered by Hyprland's
//! IPC socket.

pub mod wm;
