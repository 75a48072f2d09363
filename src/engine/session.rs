//! The persistent writable connection to the plotting engine's stdin.
//!
//! A process holds at most one live [`EngineSession`], owned by an
//! [`EngineLink`]. The session is created lazily by the first successful
//! version probe and destroyed only by an explicit `quit` command; it is
//! never released implicitly on error paths. Every write is flushed
//! immediately — the engine consumes its input interactively, line by
//! line, and must see each one promptly.
//!
//! No internal locking: a single caller thread is assumed to interact with
//! the engine at a time, and concurrent callers must serialize externally.

use std::fmt;
use std::process::Stdio;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::{PlotError, Result};

/// Writable pipe into the engine. Boxed so tests can substitute an
/// in-memory stream for a real child stdin.
type SessionPipe = Box<dyn AsyncWrite + Send + Unpin>;

/// Active connection to a spawned engine process.
pub struct EngineSession {
    /// Child handle; `None` when the session wraps a bare pipe (tests).
    child: Option<Child>,
    /// The engine's stdin (or a substitute writer).
    pipe: SessionPipe,
}

impl fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("child", &self.child.is_some())
            .finish_non_exhaustive()
    }
}

impl EngineSession {
    /// Spawn the engine from a launch command and capture its stdin.
    ///
    /// The engine's stdout and stderr stay attached to the host's — the
    /// engine draws and reports on its own terminal, exactly as if a user
    /// had started it interactively.
    ///
    /// # Errors
    ///
    /// - `PlotError::Engine` — the launch command is empty, the spawn
    ///   failed, or stdin could not be captured.
    pub fn spawn(launch_command: &str) -> Result<Self> {
        let mut parts = launch_command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| PlotError::Engine("launch command is empty".into()))?;

        let mut cmd = Command::new(program);
        cmd.args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .map_err(|err| PlotError::Engine(format!("failed to launch {launch_command}: {err}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PlotError::Engine("failed to capture engine stdin".into()))?;

        info!(launch_command, "engine session started");

        Ok(Self {
            child: Some(child),
            pipe: Box::new(stdin),
        })
    }

    /// Wrap an arbitrary writer as a session, with no child process.
    ///
    /// Lets tests drive the full write path against an in-memory pipe.
    pub fn from_pipe(pipe: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            child: None,
            pipe: Box::new(pipe),
        }
    }
}

/// The process-wide engine session slot.
///
/// All command and data writes go through this handle; the slot being
/// empty is a precondition failure for every write operation.
#[derive(Debug, Default)]
pub struct EngineLink {
    session: Option<EngineSession>,
}

impl EngineLink {
    /// Create a link with no session attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live session is attached.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Attach a session. If one already exists it wins and the new one is
    /// dropped; returns whether `session` was actually installed.
    pub fn attach(&mut self, session: EngineSession) -> bool {
        if self.session.is_some() {
            debug!("engine session already attached; keeping the existing one");
            return false;
        }
        self.session = Some(session);
        true
    }

    /// Write raw text to the engine and flush.
    ///
    /// # Errors
    ///
    /// - `PlotError::NoSession` — no session is attached.
    /// - `PlotError::Engine` — the pipe write or flush failed.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        let session = self.session_mut()?;
        session
            .pipe
            .write_all(text.as_bytes())
            .await
            .map_err(|err| PlotError::Engine(format!("write to engine failed: {err}")))?;
        session
            .pipe
            .flush()
            .await
            .map_err(|err| PlotError::Engine(format!("flush to engine failed: {err}")))
    }

    /// Write one newline-terminated line to the engine and flush.
    ///
    /// # Errors
    ///
    /// Same as [`EngineLink::write`].
    pub async fn write_line(&mut self, text: &str) -> Result<()> {
        let session = self.session_mut()?;
        session
            .pipe
            .write_all(text.as_bytes())
            .await
            .map_err(|err| PlotError::Engine(format!("write to engine failed: {err}")))?;
        session
            .pipe
            .write_all(b"\n")
            .await
            .map_err(|err| PlotError::Engine(format!("write to engine failed: {err}")))?;
        session
            .pipe
            .flush()
            .await
            .map_err(|err| PlotError::Engine(format!("flush to engine failed: {err}")))
    }

    /// Close the session: shut the pipe down and wait for the engine to
    /// exit, leaving the slot empty so subsequent writes fail until a new
    /// probe succeeds.
    ///
    /// Only called after `quit` has been sent — the engine exits on its
    /// own once its stdin closes, so the wait is bounded in practice.
    ///
    /// # Errors
    ///
    /// - `PlotError::NoSession` — no session is attached.
    /// - `PlotError::Engine` — shutdown or wait failed.
    pub async fn close(&mut self) -> Result<()> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| PlotError::NoSession("no engine session to close".into()))?;

        session
            .pipe
            .shutdown()
            .await
            .map_err(|err| PlotError::Engine(format!("failed to shut down engine pipe: {err}")))?;

        let child = session.child.take();
        // On unix, `shutdown` on a child stdin is a no-op — the fd closes
        // only when the writer is dropped, and the engine exits only on
        // stdin EOF. Drop the pipe before waiting or the wait deadlocks.
        drop(session);

        if let Some(mut child) = child {
            child
                .wait()
                .await
                .map_err(|err| PlotError::Engine(format!("failed to reap engine: {err}")))?;
        }

        info!("engine session closed");
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut EngineSession> {
        self.session.as_mut().ok_or_else(|| {
            PlotError::NoSession("run the version probe before talking to the engine".into())
        })
    }
}
