//! Shared game records and PGN plumbing used by the style profiler.

pub mod game_data;
pub mod pgn;
pub mod replay;
