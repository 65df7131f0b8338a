use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Move};

use chess_core::replay::decode_san_moves;

/// Parse a FEN into a playable position.
pub fn position(fen: &str) -> Chess {
    fen.parse::<Fen>()
        .expect("invalid FEN")
        .into_position(CastlingMode::Standard)
        .expect("illegal position")
}

/// Decode a SAN line from the start position; every move must be legal.
pub fn line(san: &[&str]) -> Vec<Move> {
    let sans: Vec<String> = san.iter().map(|s| s.to_string()).collect();
    let moves = decode_san_moves(&sans);
    assert_eq!(moves.len(), san.len(), "test line must be legal");
    moves
}
