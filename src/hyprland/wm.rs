//! Hyprland IPC backend.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.

use crate::command::{MonitorInfo, ScreenId};
use crate::traits::{MonitorEnumerator, OverlayHost};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed monitor enumeration and cursor control.
///
/// No connection is kept open; every call is a short-lived IPC request.
#[derive(Debug, Default, Clone, Copy)]
pub struct HyprlandWm;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandWmError(String);

impl HyprlandWm {
    pub fn new() -> Self {
        Self
    }

    /// Warp the cursor to `(x, y)` in global layout coordinates.
    pub fn move_cursor(&self, x: i32, y: i32) -> Result<(), HyprlandWmError> {
        ipc_dispatch(&format!("movecursor {} {}", x, y))
    }

    /// Give keyboard focus to the monitor called `name`.
    pub fn focus_monitor(&self, name: &str) -> Result<(), HyprlandWmError> {
        ipc_dispatch(&format!("focusmonitor {}", name))
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
fn socket_path() -> Result<PathBuf, HyprlandWmError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandWmError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandWmError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(command: &str) -> Result<String, HyprlandWmError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandWmError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandWmError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandWmError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandWmError(format!("utf-8: {}", e)))
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandWmError> {
    debug!("dispatch {}", args);
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandWmError(format!("dispatch error: {}", response)))
    }
}

//  Monitor JSON

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    name: String,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default = "default_scale")]
    scale: f64,
    /// wl_output transform; odd values rotate by 90° or 270°.
    #[serde(default)]
    transform: u32,
    #[serde(default)]
    disabled: bool,
}

fn default_scale() -> f64 {
    1.0
}

/// Convert the `j/monitors` reply into layout-space geometry.
///
/// Hyprland reports the mode in physical pixels while positions are in
/// layout pixels, so sizes are divided by the scale and swapped for
/// rotated outputs.
fn parse_monitors(json: &str) -> Result<Vec<MonitorInfo>, HyprlandWmError> {
    let monitors: Vec<MonitorJson> =
        serde_json::from_str(json).map_err(|e| HyprlandWmError(format!("parse: {}", e)))?;
    Ok(monitors
        .into_iter()
        .filter(|m| !m.disabled)
        .map(|m| {
            let scale = if m.scale > 0.0 { m.scale } else { 1.0 };
            let (w, h) = if m.transform % 2 == 1 {
                (m.height, m.width)
            } else {
                (m.width, m.height)
            };
            MonitorInfo {
                name: m.name,
                width: (w as f64 / scale).round() as u32,
                height: (h as f64 / scale).round() as u32,
                x: m.x,
                y: m.y,
            }
        })
        .collect())
}

impl MonitorEnumerator for HyprlandWm {
    type Error = HyprlandWmError;

    fn monitors(&self) -> Result<Vec<MonitorInfo>, Self::Error> {
        parse_monitors(&ipc_request("j/monitors")?)
    }
}

//  Headless overlay

/// [`OverlayHost`] for sessions without visible surfaces: focusing a screen
/// focuses the matching monitor, hiding and showing do nothing.
pub struct MonitorFocus {
    wm: HyprlandWm,
    /// Monitor names indexed by [`ScreenId`].
    names: Vec<String>,
}

impl MonitorFocus {
    pub fn new(wm: HyprlandWm, monitors: &[MonitorInfo]) -> Self {
        Self {
            wm,
            names: monitors.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

impl OverlayHost for MonitorFocus {
    fn focus_screen(&mut self, screen: ScreenId) {
        let Some(name) = self.names.get(screen.0) else {
            warn!("no monitor for screen {}", screen.0);
            return;
        };
        if let Err(e) = self.wm.focus_monitor(name) {
            warn!("focus {} failed: {}", name, e);
        }
    }

    fn hide(&mut self) {}

    fn show(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_monitor() {
        let json = r#"[{"id":0,"name":"DP-1","width":1920,"height":1080,"x":0,"y":0,
                        "scale":1.0,"transform":0,"focused":true}]"#;
        let monitors = parse_monitors(json).unwrap();
        assert_eq!(
            monitors,
            vec![MonitorInfo {
                name: "DP-1".into(),
                width: 1920,
                height: 1080,
                x: 0,
                y: 0,
            }]
        );
    }

    #[test]
    fn scaled_monitor_uses_layout_size() {
        let json = r#"[{"name":"eDP-1","width":2880,"height":1800,"x":0,"y":0,"scale":1.5}]"#;
        let m = &parse_monitors(json).unwrap()[0];
        assert_eq!((m.width, m.height), (1920, 1200));
    }

    #[test]
    fn rotated_monitor_swaps_axes() {
        let json = r#"[{"name":"DP-2","width":2560,"height":1440,"x":1920,"y":0,"transform":1}]"#;
        let m = &parse_monitors(json).unwrap()[0];
        assert_eq!((m.width, m.height), (1440, 2560));
        assert_eq!((m.x, m.y), (1920, 0));
    }

    #[test]
    fn disabled_monitors_are_skipped() {
        let json = r#"[
            {"name":"DP-1","width":1920,"height":1080,"x":0,"y":0},
            {"name":"DP-2","width":1920,"height":1080,"x":1920,"y":0,"disabled":true}
        ]"#;
        let monitors = parse_monitors(json).unwrap();
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].name, "DP-1");
    }

    #[test]
    fn garbage_reply_is_an_error() {
        assert!(parse_monitors("unknown request").is_err());
    }
}
