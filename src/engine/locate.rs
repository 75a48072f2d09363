//! Executable discovery via `whereis -b`.
//!
//! `whereis -b gnuplot` answers with a labelled line such as:
//!
//! ```text
//! gnuplot: /usr/bin/gnuplot /usr/share/man/man1/gnuplot.1.gz
//! ```
//!
//! The executable path is the first whitespace-delimited token after the
//! first space. Output is consumed byte-by-byte through the bounded reader
//! and fed to [`PathScanner`], a standalone incremental scanner, so the
//! parsing rules are unit-testable without spawning a process.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::engine::pipe::{read_byte, ReadOutcome};
use crate::{PlotError, Result};

/// Incremental scanner for `whereis` output.
///
/// Skips everything up to and including the first space (the `name:`
/// label), captures bytes until the next space, and reports completion so
/// the caller can stop reading early. When the stream ends before a second
/// space, the captured token runs to end of output and trailing whitespace
/// is trimmed by [`PathScanner::finish`].
#[derive(Debug, Default)]
pub struct PathScanner {
    seen_space: bool,
    done: bool,
    token: Vec<u8>,
}

impl PathScanner {
    /// Create a scanner in its initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns `true` once the path token is complete.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.done {
            return true;
        }

        if !self.seen_space {
            if byte == b' ' {
                self.seen_space = true;
            }
            return false;
        }

        if byte == b' ' {
            self.done = true;
            return true;
        }

        self.token.push(byte);
        false
    }

    /// Consume the scanner and return the captured path, if any.
    ///
    /// Trailing ASCII whitespace (the newline `whereis` emits when the
    /// line holds a single path) is stripped; an empty capture yields
    /// `None`.
    #[must_use]
    pub fn finish(self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.token);
        let trimmed = text.trim_end();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }
}

/// Locate the executable for `name` on the host.
///
/// Runs `whereis -b <name>` and scans its output with [`PathScanner`],
/// reading one bounded byte at a time. A `Timeout` outcome simply stops
/// the scan — `whereis` terminates on its own, so whatever was captured
/// by then is all there is.
///
/// # Errors
///
/// - `PlotError::Discovery` — the discovery command could not be spawned,
///   produced no output at all, or named no path for `name`.
pub async fn locate(name: &str, timeout: Duration) -> Result<String> {
    let mut cmd = Command::new("whereis");
    cmd.arg("-b")
        .arg(name)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd
        .spawn()
        .map_err(|err| PlotError::Discovery(format!("failed to run whereis -b {name}: {err}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| PlotError::Discovery("failed to capture whereis output".into()))?;

    let mut scanner = PathScanner::new();
    let mut bytes_read = 0usize;

    loop {
        match read_byte(&mut stdout, timeout).await {
            ReadOutcome::Byte(byte) => {
                bytes_read += 1;
                if scanner.push(byte) {
                    break;
                }
            }
            ReadOutcome::Timeout | ReadOutcome::Eof => break,
        }
    }

    drop(stdout);
    // whereis exits once its line is printed; reap it so no zombie lingers.
    let _ = child.wait().await;

    if bytes_read == 0 {
        return Err(PlotError::Discovery(format!(
            "whereis -b {name} produced no output"
        )));
    }

    let path = scanner
        .finish()
        .ok_or_else(|| PlotError::Discovery(format!("no executable found for {name}")))?;

    debug!(name, path, "executable located");
    Ok(path)
}
