//! Feature extraction error types

use shakmaty::Color;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Move list is empty")]
    EmptyMoveList,

    #[error("Opening length must be a positive even ply count, got {0}")]
    InvalidOpeningLength(u32),

    #[error("Illegal move {uci} at ply {ply}")]
    IllegalMove { ply: usize, uci: String },

    #[error("No {0:?} king on the board")]
    MissingKing(Color),
}
