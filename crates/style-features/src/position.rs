//! Position state owned by one extraction run.

use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Board, Chess, Color, EnPassantMode, Move, Position};

/// A move together with the side that played it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub color: Color,
}

/// A position that only moves forward, remembering every move played on it.
#[derive(Clone, Debug)]
pub struct GamePosition {
    chess: Chess,
    history: Vec<PlayedMove>,
}

impl GamePosition {
    pub fn new(chess: Chess) -> Self {
        Self {
            chess,
            history: Vec::new(),
        }
    }

    pub fn chess(&self) -> &Chess {
        &self.chess
    }

    pub fn board(&self) -> &Board {
        self.chess.board()
    }

    /// Plies played on this position so far.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn fullmoves(&self) -> u32 {
        self.chess.fullmoves().get()
    }

    /// Play a move that the caller has already checked for legality.
    pub fn play(&mut self, mv: &Move) {
        let color = self.chess.turn();
        self.chess.play_unchecked(mv.clone());
        self.history.push(PlayedMove {
            mv: mv.clone(),
            color,
        });
    }

    /// The last `n` moves in play order, or nothing if fewer than `n` have been played.
    pub fn previous_moves(&self, n: usize) -> &[PlayedMove] {
        if n > self.history.len() {
            return &[];
        }
        &self.history[self.history.len() - n..]
    }

    /// Polyglot-compatible Zobrist hash of the current position.
    pub fn zobrist_hash(&self) -> u64 {
        self.chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
    }
}
