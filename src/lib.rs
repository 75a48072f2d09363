#![forbid(unsafe_code)]

//! `plotpipe` — stream SQL query results to a persistent gnuplot subprocess.
//!
//! The library locates the plotting engine on the host (`whereis -b`),
//! probes its version (`<path> -V`) with a bounded read so a misbehaving
//! binary cannot hang the caller, keeps a single writable session to the
//! engine's stdin, and replays query results as newline-delimited data
//! blocks terminated by `e` lines — the same text a user would type at the
//! interactive gnuplot prompt.

pub mod config;
pub mod engine;
pub mod errors;
pub mod source;

pub use config::GlobalConfig;
pub use errors::{PlotError, Result};
