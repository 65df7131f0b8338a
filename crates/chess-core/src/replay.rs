//! Turn SAN movetext into engine moves.

use shakmaty::{san::San, Chess, Move, Position};

/// Parse SAN moves against a running position from the standard start.
/// Returns the legal prefix; stops at the first unparsable or illegal move.
pub fn decode_san_moves(san_moves: &[String]) -> Vec<Move> {
    decode_san_moves_from(Chess::default(), san_moves)
}

/// Same as [`decode_san_moves`], starting from an arbitrary position.
pub fn decode_san_moves_from(mut pos: Chess, san_moves: &[String]) -> Vec<Move> {
    let mut moves = Vec::with_capacity(san_moves.len());
    for san_str in san_moves {
        let Ok(san) = san_str.parse::<San>() else {
            break;
        };
        let Ok(mv) = san.to_move(&pos) else {
            break;
        };
        pos.play_unchecked(mv.clone());
        moves.push(mv);
    }
    moves
}
