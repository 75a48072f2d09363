//! Plotting-engine subprocess management.
//!
//! Modules, leaves first:
//! - [`pipe`] — bounded single-byte reads from a subprocess pipe.
//! - [`locate`] — executable discovery via `whereis -b`.
//! - [`probe`] — version handshake that establishes the session.
//! - [`session`] — the single writable connection to the engine's stdin.
//! - [`stream`] — the plot-and-send row-block protocol.

pub mod locate;
pub mod pipe;
pub mod probe;
pub mod session;
pub mod stream;
