//! Style profile worker
//!
//! Reads a PGN file, extracts opening and mid-game style features for every game
//! and writes one JSON record per game to stdout.

mod batch;
mod config;
mod error;
mod profile;

use chess_core::pgn::{parse_pgn, split_games};
use tracing::info;

use crate::batch::profile_batch;
use crate::config::{CliArgs, WorkerConfig};
use crate::error::WorkerError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse(std::env::args().skip(1));
    let config = WorkerConfig::load(&args)?;
    let extractor_config = config.extractor_config()?;
    info!(
        pgn_path = %config.pgn_path.display(),
        opening_length = config.opening_length,
        max_workers = config.max_workers,
        "Worker config loaded"
    );

    let text = tokio::fs::read_to_string(&config.pgn_path)
        .await
        .map_err(|source| WorkerError::Io {
            path: config.pgn_path.display().to_string(),
            source,
        })?;

    let chunks = split_games(&text);
    let total = chunks.len();
    info!(games = total, "PGN file split");

    // Games are parsed lazily as the batch pulls them
    let games = chunks.into_iter().filter_map(parse_pgn);
    let mut out = std::io::stdout().lock();
    let summary = profile_batch(games, extractor_config, config.max_workers, &mut out).await?;

    let skipped = total as u32 - summary.profiled - summary.failed;
    info!(
        profiled = summary.profiled,
        failed = summary.failed,
        skipped,
        "Batch complete"
    );
    Ok(())
}
