//! Bounded, order-preserving batch profiling.
//!
//! At most `max_workers` games run at once and at most twice that many results wait
//! to be written, so memory stays flat however long the PGN file is. Records are
//! written in input order.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use chess_core::game_data::{GameData, GameMetadata};
use style_features::ExtractorConfig;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::WorkerError;
use crate::profile::{profile_game, GameProfile};

type PendingGame = JoinHandle<(GameMetadata, Result<GameProfile, WorkerError>)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub profiled: u32,
    pub failed: u32,
}

/// Profile every game and write one JSON line per successful game to `out`.
pub async fn profile_batch<I, W>(
    games: I,
    config: ExtractorConfig,
    max_workers: usize,
    out: &mut W,
) -> Result<BatchSummary, WorkerError>
where
    I: IntoIterator<Item = GameData>,
    W: Write,
{
    let max_workers = max_workers.max(1);
    let semaphore = Arc::new(Semaphore::new(max_workers));
    let mut pending: VecDeque<PendingGame> = VecDeque::with_capacity(max_workers * 2);
    let mut summary = BatchSummary::default();

    for game in games {
        if pending.len() >= max_workers * 2 {
            if let Some(handle) = pending.pop_front() {
                emit(handle, out, &mut summary).await?;
            }
        }

        let permit = semaphore.clone().acquire_owned().await?;
        pending.push_back(tokio::task::spawn_blocking(move || {
            let _permit = permit; // Hold until done
            let outcome = profile_game(&game, config);
            (game.metadata, outcome)
        }));
    }

    while let Some(handle) = pending.pop_front() {
        emit(handle, out, &mut summary).await?;
    }

    out.flush().map_err(WorkerError::Output)?;
    Ok(summary)
}

async fn emit<W: Write>(
    handle: PendingGame,
    out: &mut W,
    summary: &mut BatchSummary,
) -> Result<(), WorkerError> {
    let (metadata, outcome) = handle.await?;
    match outcome {
        Ok(profile) => {
            serde_json::to_writer(&mut *out, &profile)?;
            writeln!(out).map_err(WorkerError::Output)?;
            summary.profiled += 1;
        }
        Err(e) => {
            warn!(white = %metadata.white, black = %metadata.black, error = %e, "Game skipped");
            summary.failed += 1;
        }
    }
    Ok(())
}
