//! Version probe — the one-time handshake that establishes the session.
//!
//! Runs `<path> -V`, reads the single-line reply through the bounded
//! reader, and on success derives the launch command (the path without the
//! version flag) and lazily spawns the persistent engine session. A probe
//! that produces no output within the timeout fails with
//! [`PlotError::ProbeHung`] and leaves no session behind.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::engine::locate;
use crate::engine::pipe::{read_byte, ReadOutcome};
use crate::engine::session::{EngineLink, EngineSession};
use crate::{PlotError, Result};

/// Flag appended to the located path to ask the engine for its version.
pub const VERSION_FLAG: &str = "-V";

/// Derive the launch command from a probe command by trimming the trailing
/// version flag. The probe command is built as `<path> -V`, so the launch
/// command is everything before that 3-character suffix.
#[must_use]
pub fn launch_command(probe_command: &str) -> &str {
    probe_command
        .strip_suffix(&format!(" {VERSION_FLAG}"))
        .unwrap_or(probe_command)
}

/// Probe the configured engine and return its version string.
///
/// Locates the binary, runs the version probe, and — only when no session
/// exists yet — attaches the persistent session to `link`. Calling this
/// twice reuses the existing session.
///
/// # Errors
///
/// - `PlotError::Discovery` — the binary could not be located.
/// - `PlotError::ProbeHung` — the probe produced no output in time.
/// - `PlotError::Engine` — the probe or the session could not be spawned.
pub async fn probe(link: &mut EngineLink, config: &GlobalConfig) -> Result<String> {
    let path = locate::locate(&config.engine.binary, config.read_timeout()).await?;
    probe_with_path(link, &path, config.read_timeout()).await
}

/// Probe an already-resolved engine path.
///
/// Split out from [`probe`] so callers (and tests) can bypass `whereis`
/// discovery and point the probe at any executable.
///
/// # Errors
///
/// Same as [`probe`], minus discovery.
pub async fn probe_with_path(
    link: &mut EngineLink,
    path: &str,
    timeout: Duration,
) -> Result<String> {
    let probe_command = format!("{path} {VERSION_FLAG}");

    let mut cmd = Command::new(path);
    cmd.arg(VERSION_FLAG)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd
        .spawn()
        .map_err(|err| PlotError::Engine(format!("failed to run {probe_command}: {err}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| PlotError::Engine("failed to capture probe output".into()))?;

    let mut bytes = Vec::new();
    loop {
        match read_byte(&mut stdout, timeout).await {
            ReadOutcome::Byte(b'\n') => {}
            ReadOutcome::Byte(byte) => bytes.push(byte),
            ReadOutcome::Eof => break,
            ReadOutcome::Timeout => {
                warn!(probe_command, "version probe produced no output in time");
                // The child is waiting on stdin we will never write, so a
                // pclose-style wait here would block forever, and closing
                // its pipes cannot unstick it. Drop the handle without
                // killing or waiting: a leaked process instead of a hang.
                drop(stdout);
                drop(child);
                return Err(PlotError::ProbeHung(format!(
                    "timed out waiting for version string from {probe_command}"
                )));
            }
        }
    }

    drop(stdout);
    // EOF means the probe closed its stdout, i.e. it printed and exited.
    let _ = child.wait().await;

    let version = String::from_utf8_lossy(&bytes).trim().to_owned();
    if version.is_empty() {
        return Err(PlotError::Engine(format!(
            "{probe_command} produced no version output"
        )));
    }

    if link.is_open() {
        info!(version, "engine session already live; probe reused it");
    } else {
        link.attach(EngineSession::spawn(launch_command(&probe_command))?);
        info!(version, "engine session established by version probe");
    }

    Ok(version)
}
