//! Headless key sources.
//!
//! Without the GTK overlay, key events can be scripted: pipe
//! newline-delimited JSON into the process and each line is fed to the
//! session as if it had been typed.

pub mod stdin;
