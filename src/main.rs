#![forbid(unsafe_code)]

//! `plotpipe` — stream SQL query results to a gnuplot subprocess.
//!
//! Bootstraps configuration and logging, probes the plotting engine to
//! establish the session, and either prints the engine version or streams
//! a query's rows to a plot command.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use plotpipe::engine::session::EngineLink;
use plotpipe::engine::{probe, stream};
use plotpipe::source::{NullSource, SqliteSource};
use plotpipe::{GlobalConfig, PlotError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "plotpipe", about = "Stream SQL query results to a gnuplot subprocess", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Probe the plotting engine and print its version string.
    Version,
    /// Probe the engine, then send a plot command with query results.
    Plot {
        /// SQL query supplying the rows; empty sends the command alone.
        #[arg(long, default_value = "")]
        query: String,
        /// Plot command forwarded verbatim to the engine; use `'-'`
        /// markers where the engine should read inline data blocks.
        #[arg(long)]
        command: String,
        /// `SQLite` database URL; overrides the configured one.
        #[arg(long)]
        db: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| PlotError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };

    let mut link = EngineLink::new();

    match args.command {
        CliCommand::Version => {
            let version = probe::probe(&mut link, &config).await?;
            println!("{version}");
            Ok(())
        }
        CliCommand::Plot { query, command, db } => {
            let version = probe::probe(&mut link, &config).await?;
            info!(version, "engine ready");

            let sent = if query.is_empty() {
                stream::plot(&mut link, &mut NullSource, &query, &command).await?
            } else {
                let url = db.or_else(|| config.database_url.clone()).ok_or_else(|| {
                    PlotError::Config(
                        "no database configured: pass --db or set database_url".into(),
                    )
                })?;
                let mut source = SqliteSource::connect(&url).await?;
                stream::plot(&mut link, &mut source, &query, &command).await?
            };

            println!("{sent} rows sent");
            Ok(())
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| PlotError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| PlotError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
