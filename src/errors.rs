//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum PlotError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Executable discovery could not run or found nothing.
    Discovery(String),
    /// Version probe produced no output line within the read timeout.
    ///
    /// The probe child process is intentionally abandoned in this case;
    /// see `engine::probe` for the rationale.
    ProbeHung(String),
    /// Command or data operation attempted before a successful probe.
    NoSession(String),
    /// Plot command is empty or too short to be meaningful.
    InvalidCommand(String),
    /// The tabular data source failed to produce a usable result.
    Query(String),
    /// The engine subprocess could not be spawned or its pipe failed.
    Engine(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for PlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Discovery(msg) => write!(f, "discovery: {msg}"),
            Self::ProbeHung(msg) => write!(f, "probe hung: {msg}"),
            Self::NoSession(msg) => write!(f, "no session: {msg}"),
            Self::InvalidCommand(msg) => write!(f, "invalid command: {msg}"),
            Self::Query(msg) => write!(f, "query: {msg}"),
            Self::Engine(msg) => write!(f, "engine: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<toml::de::Error> for PlotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for PlotError {
    fn from(err: sqlx::Error) -> Self {
        Self::Query(err.to_string())
    }
}
