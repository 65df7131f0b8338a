//! Per-move pattern classifiers.
//!
//! Each classifier looks at the board after the move has been played, plus whatever
//! was captured from the board before it. None of them mutate anything; the extractor
//! owns the position and the counters.

use shakmaty::{attacks, Bitboard, Board, Color, Piece, Role, Square};

use crate::board_utils::{is_attacked_by, king_zone, xray_targets, SliderKind};
use crate::config::{KingPressureBonus, PAWN_STORM_MIN_ADVANCES};
use crate::position::PlayedMove;

const KINGSIDE_FILES: [u32; 3] = [5, 6, 7];
const QUEENSIDE_FILES: [u32; 3] = [0, 1, 2];

/// A piece removed by the move, with the squares it covered just before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturedPiece {
    pub piece: Piece,
    pub square: Square,
    pub defended: Bitboard,
}

/// What one move did. Lives for a single iteration of the extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveClassification {
    pub mover: Piece,
    pub from: Square,
    pub to: Square,
    pub is_retreat: bool,
    pub is_check: bool,
    pub is_castling: bool,
    pub is_capture: bool,
    pub is_pawn_break: bool,
    pub is_active_move: bool,
    pub captured: Option<CapturedPiece>,
}

impl MoveClassification {
    /// Neither active, a capture, nor a retreat.
    pub fn is_patient(&self) -> bool {
        !self.is_active_move && !self.is_capture && !self.is_retreat
    }
}

/// A pawn move that now hits an enemy pawn.
pub fn is_pawn_break(board: &Board, mover: Piece, attacked_after: Bitboard) -> bool {
    mover.role == Role::Pawn
        && (attacked_after & board.pawns() & board.by_color(!mover.color)).any()
}

/// The moved piece attacks an enemy piece it did not attack from its old square.
pub fn is_unique_attack(
    board: &Board,
    color: Color,
    attacked_before: Bitboard,
    attacked_after: Bitboard,
) -> bool {
    (attacked_after & board.by_color(!color) & !attacked_before).any()
}

/// The piece crossed the midline into the opponent's half.
pub fn is_infiltration(color: Color, from: Square, to: Square) -> bool {
    let (from, to) = (from as u32, to as u32);
    match color {
        Color::White => to > 31 && from < 32,
        Color::Black => to < 32 && from > 31,
    }
}

/// King-pressure points earned by `color` with this move against the king on `enemy_king`.
///
/// 1 for touching the enemy king or its neighbours (2 with check), plus the configured
/// bonus when the move also captured an enemy piece that was guarding the king's neighbours.
pub fn king_pressure(
    color: Color,
    enemy_king: Square,
    is_check: bool,
    captured: Option<&CapturedPiece>,
    attacked_after: Bitboard,
    bonus: KingPressureBonus,
) -> u32 {
    if !attacked_after.intersects(king_zone(enemy_king)) {
        return 0;
    }

    let mut points = if is_check { 2 } else { 1 };
    if let Some(captured) = captured {
        if captured.piece.color == !color
            && captured.defended.intersects(attacks::king_attacks(enemy_king))
        {
            points += bonus.for_color(color);
        }
    }
    points
}

/// A rook, bishop or queen on `to` x-rays an enemy piece through an enemy blocker.
pub fn has_xray_attack(board: &Board, to: Square, mover: Piece) -> bool {
    SliderKind::from_role(mover.role)
        .map(|kind| xray_targets(board, to, kind, mover.color).any())
        .unwrap_or(false)
}

/// Friendly non-king pieces the move newly protects while the opponent attacks them.
pub fn active_defenses(
    board: &Board,
    color: Color,
    attacked_before: Bitboard,
    attacked_after: Bitboard,
) -> u32 {
    let defended = attacked_after & board.by_color(color) & !board.kings() & !attacked_before;
    defended
        .into_iter()
        .filter(|&sq| is_attacked_by(board, !color, sq))
        .count() as u32
}

/// Did `color` push at least two pawns forward on one wing within `recent`?
pub fn is_pawn_storm(recent: &[PlayedMove], color: Color) -> bool {
    let mut kingside = 0;
    let mut queenside = 0;

    for played in recent
        .iter()
        .filter(|p| p.color == color && p.mv.role() == Role::Pawn)
    {
        let Some(from) = played.mv.from() else {
            continue;
        };
        let to = played.mv.to();
        if !pawn_advances(color, from, to) {
            continue;
        }

        let (from_file, to_file) = (from.file() as u32, to.file() as u32);
        if KINGSIDE_FILES.contains(&from_file) && KINGSIDE_FILES.contains(&to_file) {
            kingside += 1;
        } else if QUEENSIDE_FILES.contains(&from_file) && QUEENSIDE_FILES.contains(&to_file) {
            queenside += 1;
        }
    }

    kingside >= PAWN_STORM_MIN_ADVANCES || queenside >= PAWN_STORM_MIN_ADVANCES
}

fn pawn_advances(color: Color, from: Square, to: Square) -> bool {
    match color {
        Color::White => to.rank() > from.rank(),
        Color::Black => to.rank() < from.rank(),
    }
}
