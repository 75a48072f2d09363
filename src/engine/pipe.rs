//! Bounded single-byte reads from a subprocess pipe.
//!
//! Subprocess output may never arrive at all — an interactive engine that
//! was launched with a flag it does not understand sits at its prompt
//! waiting for input it will never receive. Every read of engine output
//! therefore goes through [`read_byte`], which waits at most a fixed
//! timeout before returning a "no data" sentinel distinct from end of
//! stream, so callers can abort instead of blocking forever.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Outcome of one bounded read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One byte arrived within the timeout window.
    Byte(u8),
    /// No data within the window, or the wait itself failed.
    Timeout,
    /// The pipe reached end of stream.
    Eof,
}

/// Read exactly one byte from `reader`, waiting at most `timeout`.
///
/// Wait errors are folded into [`ReadOutcome::Timeout`] — for the caller
/// both mean "no data is coming", and both must be distinguishable from a
/// clean [`ReadOutcome::Eof`].
pub async fn read_byte<R>(reader: &mut R, timeout: Duration) -> ReadOutcome
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1];

    match tokio::time::timeout(timeout, reader.read(&mut buf)).await {
        Ok(Ok(0)) => ReadOutcome::Eof,
        Ok(Ok(_)) => ReadOutcome::Byte(buf[0]),
        Ok(Err(_)) | Err(_) => ReadOutcome::Timeout,
    }
}
