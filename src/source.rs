//! Tabular data sources feeding the row streamer.
//!
//! The streamer only needs "execute a query string, get back ordered rows
//! of column text" — the [`RowSource`] trait is that seam. Production use
//! goes through [`SqliteSource`]; tests substitute in-memory fakes.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};

use crate::{PlotError, Result};

/// One query result: a fixed column count and ordered rows of column text
/// values. Consumed read-only and discarded after streaming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Number of columns in every row.
    pub columns: usize,
    /// Row-major cell text.
    pub rows: Vec<Vec<String>>,
}

/// A relational source that runs a query string and yields its rows.
pub trait RowSource {
    /// Execute `query` and return its result as text rows.
    ///
    /// # Errors
    ///
    /// Returns `PlotError::Query` when the query cannot be executed or its
    /// result cannot be rendered as text.
    async fn execute(&mut self, query: &str) -> Result<Table>;
}

/// A source with no database behind it.
///
/// Stands in where a [`RowSource`] value is required but no query will run
/// (command-only plots); any actual execution fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl RowSource for NullSource {
    async fn execute(&mut self, _query: &str) -> Result<Table> {
        Err(PlotError::Query("no database configured".into()))
    }
}

/// `SQLite`-backed source over an `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    /// Connect to a `SQLite` database URL (e.g. `sqlite://data.db` or
    /// `sqlite::memory:`).
    ///
    /// # Errors
    ///
    /// Returns `PlotError::Config` when the database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        // One connection: the design is single-caller, and a larger pool
        // would give every in-memory database URL a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(url)
            .await
            .map_err(|err| PlotError::Config(format!("failed to open database {url}: {err}")))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RowSource for SqliteSource {
    async fn execute(&mut self, query: &str) -> Result<Table> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let columns = rows.first().map_or(0, |row| row.columns().len());
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut cells = Vec::with_capacity(columns);
            for index in 0..row.columns().len() {
                cells.push(column_text(row, index)?);
            }
            out.push(cells);
        }

        Ok(Table { columns, rows: out })
    }
}

/// Render one column value as text, the way it would print in a query
/// result: integers and reals in their decimal form, NULL as empty text.
fn column_text(row: &SqliteRow, index: usize) -> Result<String> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(String::new());
    }
    let type_name = raw.type_info().name().to_owned();

    match type_name.as_str() {
        "INTEGER" => Ok(row.try_get::<i64, _>(index)?.to_string()),
        "REAL" => Ok(row.try_get::<f64, _>(index)?.to_string()),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(index)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Ok(row.try_get::<String, _>(index)?),
    }
}
