//! Line-based [`KeySource`] implementation.
//!
//! Reads one JSON-encoded [`KeyEvent`] per line.
//!
//! # Wire format
//!
//! ```json
//! "a"
//! "s"
//! {"key":"l","control":true}
//! {"key":"Enter","shift":true}
//! "Escape"
//! ```

use crate::command::KeyEvent;
use crate::traits::KeySource;
use log::{debug, error, info};
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc;

/// A [`KeySource`] that parses key events from any buffered reader.
pub struct LineKeySource<R> {
    reader: R,
}

/// Key source reading the process's standard input.
pub type StdinKeySource = LineKeySource<BufReader<io::Stdin>>;

/// Errors produced by the line reader.
#[derive(Debug, thiserror::Error)]
pub enum LineSourceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl<R: BufRead + Send> LineKeySource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl StdinKeySource {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> KeySource for LineKeySource<R> {
    type Error = LineSourceError;

    /// Read until end of input or until the sink closes.
    ///
    /// Malformed lines are logged and skipped.
    fn run(&mut self, sink: mpsc::Sender<KeyEvent>) -> Result<(), Self::Error> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                debug!("key input exhausted");
                return Ok(());
            }
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            match serde_json::from_str::<KeyEvent>(text) {
                Ok(event) => {
                    debug!("received {:?}", event);
                    if sink.send(event).is_err() {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                }
                Err(e) => {
                    error!("bad key event: {} ({})", text, e);
                }
            }
        }
    }
}

//  Tests
