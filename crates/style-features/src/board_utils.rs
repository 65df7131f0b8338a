/// Board utility functions shared by the move classifiers

use shakmaty::{attacks, Bitboard, Board, Color, File, Move, Piece, Rank, Role, Square};

use crate::config::ENDGAME_PIECE_LIMIT;
use crate::error::FeatureError;

const CENTRAL_SQUARES: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

const SUPPORTING_SQUARES: [Square; 8] = [
    Square::C3,
    Square::C4,
    Square::C5,
    Square::C6,
    Square::F3,
    Square::F4,
    Square::F5,
    Square::F6,
];

/// Back-rank roles by file, a to h.
const HOME_ROLES: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// Sliding piece families that can x-ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderKind {
    Rook,
    Bishop,
    Queen,
}

impl SliderKind {
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Rook => Some(SliderKind::Rook),
            Role::Bishop => Some(SliderKind::Bishop),
            Role::Queen => Some(SliderKind::Queen),
            _ => None,
        }
    }

    /// Slide attacks from `square` given an occupancy.
    pub fn attacks(self, square: Square, occupied: Bitboard) -> Bitboard {
        match self {
            SliderKind::Rook => attacks::rook_attacks(square, occupied),
            SliderKind::Bishop => attacks::bishop_attacks(square, occupied),
            SliderKind::Queen => attacks::queen_attacks(square, occupied),
        }
    }
}

/// Pieces that are neither pawns nor kings, both colors.
pub fn minor_and_major_count(board: &Board) -> u32 {
    (board.occupied() & !board.pawns() & !board.kings()).count() as u32
}

/// Endgame: at most six non-pawn, non-king pieces left on the board.
pub fn is_endgame(board: &Board) -> bool {
    minor_and_major_count(board) <= ENDGAME_PIECE_LIMIT
}

/// Square of the `color` king.
pub fn king_square(board: &Board, color: Color) -> Result<Square, FeatureError> {
    board.king_of(color).ok_or(FeatureError::MissingKing(color))
}

/// Does `color` attack `square`?
pub fn is_attacked_by(board: &Board, color: Color, square: Square) -> bool {
    board.attacks_to(square, color, board.occupied()).any()
}

/// Squared euclidean distance between two squares.
pub fn square_distance_sq(a: Square, b: Square) -> u32 {
    let df = (a.file() as i32 - b.file() as i32).unsigned_abs();
    let dr = (a.rank() as i32 - b.rank() as i32).unsigned_abs();
    df * df + dr * dr
}

/// Is the piece on `from` stepping away from the enemy pieces that attack it?
///
/// Pawns and kings never retreat. Every attacker must end up at least as far from
/// `to` as it was from `from`, and at least one strictly farther.
pub fn is_retreating_from_attack(board: &Board, from: Square, to: Square, piece: Piece) -> bool {
    if matches!(piece.role, Role::Pawn | Role::King) {
        return false;
    }

    let attackers = board.attacks_to(from, !piece.color, board.occupied());
    if attackers.is_empty() {
        return false;
    }

    let mut farther = false;
    for attacker in attackers {
        let before = square_distance_sq(from, attacker);
        let after = square_distance_sq(to, attacker);
        if after < before {
            return false;
        }
        if after > before {
            farther = true;
        }
    }
    farther
}

/// Where the moving piece lands. For castling this is the king's square, not the rook's.
pub fn destination(mv: &Move, color: Color) -> Square {
    match mv.castling_side() {
        Some(side) => side.king_to(color),
        None => mv.to(),
    }
}

/// Square of the piece removed by a capture (differs from the target for en passant).
pub fn captured_square(mv: &Move) -> Option<Square> {
    match *mv {
        Move::Normal {
            capture: Some(_),
            to,
            ..
        } => Some(to),
        Move::EnPassant { from, to } => Some(Square::from_coords(to.file(), from.rank())),
        _ => None,
    }
}

/// The enemy king together with its neighbouring squares.
pub fn king_zone(king: Square) -> Bitboard {
    attacks::king_attacks(king).with(king)
}

/// Enemy non-pawn pieces a slider on `square` hits once the nearest enemy blocker on
/// each ray is taken out of the occupancy.
pub fn xray_targets(board: &Board, square: Square, kind: SliderKind, color: Color) -> Bitboard {
    let occupied = board.occupied();
    let enemy = board.by_color(!color);

    let direct = kind.attacks(square, occupied);
    let blockers = direct & enemy;
    if blockers.is_empty() {
        return Bitboard::EMPTY;
    }

    let through = kind.attacks(square, occupied ^ blockers);
    through & !direct & enemy & !board.pawns()
}

/// Pieces of `color` standing on their original back-rank square.
pub fn pieces_at_home(board: &Board, color: Color) -> u32 {
    let rank = match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };

    HOME_ROLES
        .iter()
        .zip(File::ALL)
        .filter(|&(&role, file)| {
            board.piece_at(Square::from_coords(file, rank)) == Some(Piece { color, role })
        })
        .count() as u32
}

/// Central control: 2 per attacked centre square, 1 per attacked supporting square.
pub fn central_control(board: &Board, color: Color) -> u32 {
    let central = CENTRAL_SQUARES
        .iter()
        .filter(|&&sq| is_attacked_by(board, color, sq))
        .count() as u32;
    let supporting = SUPPORTING_SQUARES
        .iter()
        .filter(|&&sq| is_attacked_by(board, color, sq))
        .count() as u32;
    2 * central + supporting
}

/// Space: attacked squares in the opponent's half, weighted by depth.
/// White earns rank - 3 for ranks 5-8, black earns 4 - rank for ranks 1-4 (0-based ranks).
pub fn space_advantage(board: &Board, color: Color) -> u32 {
    Square::ALL
        .iter()
        .filter(|&&sq| is_attacked_by(board, color, sq))
        .map(|sq| {
            let rank = sq.rank() as u32;
            match color {
                Color::White if rank >= 4 => rank - 3,
                Color::Black if rank <= 3 => 4 - rank,
                _ => 0,
            }
        })
        .sum()
}
