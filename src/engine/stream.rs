//! The plot-and-send protocol.
//!
//! A plot command goes to the engine first, verbatim. When a query is
//! supplied, its rows follow as inline data blocks: one line per row with
//! columns joined by two spaces, each block closed by a single `e` line —
//! exactly what the engine expects a user to type after a plot command
//! whose data source is `'-'` (stdin). One full pass of the rows is
//! replayed per `'-'` marker in the command.

use tracing::{info, warn};

use crate::engine::session::EngineLink;
use crate::source::RowSource;
use crate::{PlotError, Result};

/// Marker in a plot command telling the engine to read one inline data
/// block from its stdin.
pub const INLINE_DATA_MARKER: &str = "'-'";

/// Line terminating one inline data block.
pub const BLOCK_TERMINATOR: &str = "e";

/// Separator between columns within a row line.
pub const COLUMN_SEPARATOR: &str = "  ";

/// Command that, after being forwarded to the engine, tears down the
/// local session.
pub const QUIT_COMMAND: &str = "quit";

/// Shortest plot command the engine could meaningfully execute.
const MIN_COMMAND_LEN: usize = 4;

/// Rows between progress log lines within a block.
const PROGRESS_INTERVAL_ROWS: usize = 10_000;

/// Count the inline-data markers in a plot command.
///
/// The count is the number of full row-block replays the engine will
/// expect after the command line.
#[must_use]
pub fn count_inline_markers(command: &str) -> usize {
    command.matches(INLINE_DATA_MARKER).count()
}

/// Send a plot command and stream the query's rows to the engine.
///
/// - With an empty `query`, only the command is sent; `quit` additionally
///   closes the session after being forwarded.
/// - With a non-empty `query`, the result rows are replayed once per
///   [`INLINE_DATA_MARKER`] occurrence in `command`, each pass closed by a
///   [`BLOCK_TERMINATOR`] line. A command without markers sends no data.
///
/// Returns the total number of row lines written across all blocks.
///
/// # Errors
///
/// - `PlotError::NoSession` — no engine session; nothing is written.
/// - `PlotError::InvalidCommand` — `command` is shorter than 4 characters;
///   nothing is written.
/// - `PlotError::Query` — the source failed; a single terminator line is
///   written first (best effort) so the engine is not left mid-block.
/// - `PlotError::Engine` — a pipe write failed.
pub async fn plot<S>(
    link: &mut EngineLink,
    source: &mut S,
    query: &str,
    command: &str,
) -> Result<u64>
where
    S: RowSource,
{
    if !link.is_open() {
        return Err(PlotError::NoSession(
            "run the version probe before plotting".into(),
        ));
    }

    if command.len() < MIN_COMMAND_LEN {
        return Err(PlotError::InvalidCommand(format!(
            "plot command must be at least {MIN_COMMAND_LEN} characters, got {command:?}"
        )));
    }

    link.write_line(command).await?;
    info!(command, "plot command sent to engine");

    if query.is_empty() {
        if command == QUIT_COMMAND {
            link.close().await?;
        }
        info!("plot command done");
        return Ok(0);
    }

    let table = match source.execute(query).await {
        Ok(table) => table,
        Err(err) => {
            // The engine already saw the plot command and is waiting for a
            // data block; close the block before surfacing the failure.
            if let Err(unblock_err) = link.write_line(BLOCK_TERMINATOR).await {
                warn!(%unblock_err, "failed to unblock engine after query failure");
            }
            return Err(err);
        }
    };

    let blocks = count_inline_markers(command);
    info!(
        rows = table.rows.len(),
        columns = table.columns,
        blocks,
        "streaming query results to engine"
    );

    let mut sent: u64 = 0;
    for _ in 0..blocks {
        for (index, row) in table.rows.iter().enumerate() {
            link.write_line(&row.join(COLUMN_SEPARATOR)).await?;
            sent += 1;

            if index > 0 && index % PROGRESS_INTERVAL_ROWS == 0 {
                info!(rows_sent = index, "still streaming rows to engine");
            }
        }
        link.write_line(BLOCK_TERMINATOR).await?;
    }

    info!(rows_sent = sent, "plot command finished");
    Ok(sent)
}
