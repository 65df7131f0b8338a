//! Behavioural style features for a single chess game.
//!
//! The extractor replays a game move by move on a shakmaty position, classifies each
//! move into tactical and positional patterns, and snapshots the tallies into
//! activity and aggression scores for an opening window and a mid-game window.
//! The main entry point is `extract_game_features()`.

pub mod board_utils;
pub mod classify;
pub mod config;
pub mod counters;
pub mod error;
pub mod extractor;
pub mod position;
pub mod score;

pub use config::{ExtractorConfig, KingPressureBonus};
pub use counters::{FeatureCounters, SideCounters};
pub use error::FeatureError;
pub use extractor::{FeatureExtractor, GameFeatures, StepOutcome};
pub use position::{GamePosition, PlayedMove};
pub use score::{ScoreCalculator, ScorePair, StyleScores};

use shakmaty::{Chess, Move};

/// Extract the four score series and the opening hash for a game played from `start`.
pub fn extract_game_features(
    start: Chess,
    moves: &[Move],
    config: ExtractorConfig,
) -> Result<GameFeatures, FeatureError> {
    FeatureExtractor::new(start, config).extract(moves)
}
