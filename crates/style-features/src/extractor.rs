//! Move-by-move feature extraction for one game.
//!
//! The extractor owns a [`GamePosition`] and a [`FeatureCounters`] for the lifetime of
//! one game. For every move it classifies the move against the position before and
//! after it is played, bumps the mover's counters, and at fixed ply thresholds
//! snapshots the counters into score series:
//!
//! - at `opening_length` plies the opening scores are taken, the opening position is
//!   hashed and the phase-scoped counters are cleared;
//! - after that, central control and space are sampled every 4 plies;
//! - when the game finishes (or an endgame is reached) the samples are averaged and the
//!   mid-game scores are taken.

use serde::Serialize;
use shakmaty::{CastlingMode, Chess, Color, Move, Position, Role};
use tracing::{debug, trace};

use crate::board_utils::{
    self, captured_square, destination, is_endgame, is_retreating_from_attack,
};
use crate::classify::{self, CapturedPiece, MoveClassification};
use crate::config::{ExtractorConfig, PAWN_STORM_LOOKBACK, SAMPLE_INTERVAL};
use crate::counters::FeatureCounters;
use crate::error::FeatureError;
use crate::position::GamePosition;
use crate::score::{ScoreCalculator, ScorePair};

/// Result of feeding one move to the extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Processed(MoveClassification),
    /// The position was already an endgame; the move was not processed.
    Endgame,
}

/// Everything the extractor produces for a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GameFeatures {
    pub opening_activity: Vec<ScorePair>,
    pub opening_aggression: Vec<ScorePair>,
    pub mid_activity: Vec<ScorePair>,
    pub mid_aggression: Vec<ScorePair>,
    /// Zobrist hash of the position at the end of the opening window.
    pub opening_hash: Option<u64>,
    pub plies_processed: usize,
    pub reached_endgame: bool,
    /// Counters behind the mid-game scores, with control and space averaged.
    pub final_counters: FeatureCounters,
}

pub struct FeatureExtractor {
    position: GamePosition,
    config: ExtractorConfig,
    counters: FeatureCounters,
    opening_activity: Vec<ScorePair>,
    opening_aggression: Vec<ScorePair>,
    opening_hash: Option<u64>,
    samples: u32,
    reached_endgame: bool,
}

impl FeatureExtractor {
    pub fn new(start: Chess, config: ExtractorConfig) -> Self {
        Self {
            position: GamePosition::new(start),
            config,
            counters: FeatureCounters::new(),
            opening_activity: Vec::new(),
            opening_aggression: Vec::new(),
            opening_hash: None,
            samples: 0,
            reached_endgame: false,
        }
    }

    pub fn counters(&self) -> &FeatureCounters {
        &self.counters
    }

    /// Plies processed so far.
    pub fn ply(&self) -> usize {
        self.position.ply()
    }

    pub fn opening_hash(&self) -> Option<u64> {
        self.opening_hash
    }

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    /// Run a whole move list, stopping at the first endgame position.
    pub fn extract(mut self, moves: &[Move]) -> Result<GameFeatures, FeatureError> {
        if moves.is_empty() {
            return Err(FeatureError::EmptyMoveList);
        }

        for mv in moves {
            if self.step(mv)? == StepOutcome::Endgame {
                break;
            }
        }

        Ok(self.finish())
    }

    /// Classify and play one move.
    pub fn step(&mut self, mv: &Move) -> Result<StepOutcome, FeatureError> {
        if self.reached_endgame || is_endgame(self.position.board()) {
            if !self.reached_endgame {
                debug!(
                    ply = self.position.ply(),
                    pieces = board_utils::minor_and_major_count(self.position.board()),
                    "Endgame reached, stopping extraction"
                );
            }
            self.reached_endgame = true;
            return Ok(StepOutcome::Endgame);
        }

        let ply = self.position.ply() + 1;
        let illegal = || FeatureError::IllegalMove {
            ply,
            uci: mv.to_uci(CastlingMode::Standard).to_string(),
        };
        if !self.position.chess().is_legal(mv.clone()) {
            return Err(illegal());
        }

        // Everything that must be read before the move is played
        let board = self.position.board();
        let from = mv.from().ok_or_else(illegal)?;
        let mover = board.piece_at(from).ok_or_else(illegal)?;
        let color = mover.color;
        // The opponent's king stays put for the whole move.
        let enemy_king = board_utils::king_square(board, !color)?;
        let to = destination(mv, color);
        let attacked_before = board.attacks_from(from);
        let is_retreat = is_retreating_from_attack(board, from, to, mover);
        let is_castling = mv.is_castle();
        let is_capture = mv.is_capture();
        let captured = captured_square(mv).and_then(|square| {
            board.piece_at(square).map(|piece| CapturedPiece {
                piece,
                square,
                defended: board.attacks_from(square),
            })
        });

        if is_castling {
            self.counters.side_mut(color).castle_turn = self.position.fullmoves();
        }
        if is_retreat {
            self.counters.side_mut(color).retreats += 1;
        }

        self.position.play(mv);

        let board = self.position.board();
        let is_check = self.position.chess().is_check();
        let attacked_after = board.attacks_from(to);
        let side = self.counters.side_mut(color);
        let mut is_active_move = false;

        let is_pawn_break = classify::is_pawn_break(board, mover, attacked_after);
        if is_pawn_break {
            side.pawn_breaks += 1;
            is_active_move = true;
        } else if classify::is_unique_attack(board, color, attacked_before, attacked_after) {
            side.attacks += 1;
            is_active_move = true;
        }

        if classify::is_infiltration(color, from, to) {
            side.infiltrations += 1;
        }

        side.king_attacks += classify::king_pressure(
            color,
            enemy_king,
            is_check,
            captured.as_ref(),
            attacked_after,
            self.config.king_pressure_bonus,
        );

        if classify::has_xray_attack(board, to, mover) {
            side.xray_attacks += 1;
        }

        let defenses = classify::active_defenses(board, color, attacked_before, attacked_after);
        if defenses > 0 {
            side.active_defense += defenses;
            is_active_move = true;
        }

        if !matches!(mover.role, Role::Pawn | Role::King) {
            side.piece_moves += 1;
        }

        let class = MoveClassification {
            mover,
            from,
            to,
            is_retreat,
            is_check,
            is_castling,
            is_capture,
            is_pawn_break,
            is_active_move,
            captured,
        };

        if class.is_patient() {
            side.patient_moves += 1;
        }

        trace!(
            ply,
            from = %from,
            to = %to,
            retreat = is_retreat,
            check = is_check,
            capture = is_capture,
            pawn_break = is_pawn_break,
            active = is_active_move,
            "Classified move"
        );

        self.advance_windows(ply, color);

        Ok(StepOutcome::Processed(class))
    }

    /// Average the mid-game samples and take the final scores.
    pub fn finish(mut self) -> GameFeatures {
        self.counters.average_samples(self.samples);
        let calc = ScoreCalculator::new(&self.counters);
        let mid_activity = vec![calc.activity_score()];
        let mid_aggression = vec![calc.aggression_score()];

        GameFeatures {
            mid_activity,
            mid_aggression,
            opening_activity: self.opening_activity,
            opening_aggression: self.opening_aggression,
            opening_hash: self.opening_hash,
            plies_processed: self.position.ply(),
            reached_endgame: self.reached_endgame,
            final_counters: self.counters,
        }
    }

    fn advance_windows(&mut self, ply: usize, mover: Color) {
        let opening = self.config.opening_length;

        if ply == opening {
            self.close_opening_window(ply);
        } else if ply > opening && ply % SAMPLE_INTERVAL == 0 {
            self.sample_board_control();
            self.samples += 1;
        }

        // Storm lookbacks never straddle the opening boundary.
        let in_opening = ply >= PAWN_STORM_LOOKBACK && ply < opening;
        let in_middlegame = ply >= opening + PAWN_STORM_LOOKBACK;
        if (in_opening || in_middlegame)
            && classify::is_pawn_storm(self.position.previous_moves(PAWN_STORM_LOOKBACK), mover)
        {
            self.counters.side_mut(mover).pawn_storms += 1;
        }
    }

    fn close_opening_window(&mut self, ply: usize) {
        self.sample_board_control();

        let board = self.position.board();
        for color in Color::ALL {
            self.counters.side_mut(color).pieces_at_home =
                board_utils::pieces_at_home(board, color);
        }

        let calc = ScoreCalculator::new(&self.counters);
        self.opening_activity.push(calc.activity_score());
        self.opening_aggression.push(calc.aggression_score());

        let hash = self.position.zobrist_hash();
        self.opening_hash = Some(hash);
        debug!(ply, hash = %format_args!("{hash:016x}"), "Opening window closed");

        self.counters.reset_phase();
    }

    fn sample_board_control(&mut self) {
        let board = self.position.board();
        for color in Color::ALL {
            let side = self.counters.side_mut(color);
            side.central_control += f64::from(board_utils::central_control(board, color));
            side.space_advantage += f64::from(board_utils::space_advantage(board, color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::replay::decode_san_moves;

    fn moves(san: &[&str]) -> Vec<Move> {
        let sans: Vec<String> = san.iter().map(|s| s.to_string()).collect();
        let decoded = decode_san_moves(&sans);
        assert_eq!(decoded.len(), san.len(), "test line must be legal");
        decoded
    }

    fn extractor(opening_length: u32) -> FeatureExtractor {
        FeatureExtractor::new(Chess::default(), ExtractorConfig::new(opening_length).unwrap())
    }

    #[test]
    fn test_empty_move_list_is_an_error() {
        assert_eq!(
            extractor(6).extract(&[]),
            Err(FeatureError::EmptyMoveList)
        );
    }

    #[test]
    fn test_illegal_move_is_an_error() {
        let mut ex = extractor(6);
        let bogus = Move::Normal {
            role: Role::Queen,
            from: shakmaty::Square::D1,
            capture: None,
            to: shakmaty::Square::D5,
            promotion: None,
        };
        assert!(matches!(
            ex.step(&bogus),
            Err(FeatureError::IllegalMove { ply: 1, .. })
        ));
    }

    #[test]
    fn test_illegal_move_leaves_no_partial_state() {
        let line = moves(&["e4", "e5"]);
        let mut ex = extractor(6);
        ex.step(&line[0]).unwrap();
        let before = ex.counters().clone();

        // e2-e4 again, with black to move.
        assert!(ex.step(&line[0]).is_err());
        assert_eq!(ex.ply(), 1);
        assert_eq!(ex.counters(), &before);
        assert!(matches!(ex.step(&line[1]).unwrap(), StepOutcome::Processed(_)));
    }

    #[test]
    fn test_pawn_break_counted_then_reset_at_boundary() {
        // 2. e4 on ply 3 hits the d5 pawn; the opening window closes at ply 6.
        let line = moves(&["Nf3", "d5", "e4", "dxe4", "Ng5", "Nf6", "Nxe4", "Nxe4"]);
        let mut ex = extractor(6);

        for mv in &line[..3] {
            ex.step(mv).unwrap();
        }
        assert_eq!(ex.counters().white.pawn_breaks, 1);
        assert_eq!(ex.counters().black.pawn_breaks, 0);

        for mv in &line[3..6] {
            ex.step(mv).unwrap();
        }
        assert_eq!(ex.ply(), 6);
        assert_eq!(ex.counters().white.pawn_breaks, 0);
        assert_eq!(ex.counters().black.pawn_breaks, 0);
        assert!(ex.opening_hash().is_some());

        let features = ex.extract(&line[6..]).unwrap();
        assert_eq!(features.opening_activity.len(), 1);
        assert_eq!(features.plies_processed, 8);
    }

    #[test]
    fn test_pawn_break_is_not_also_an_attack() {
        let line = moves(&["e4", "d5"]);
        let mut ex = extractor(10);
        ex.step(&line[0]).unwrap();
        let StepOutcome::Processed(class) = ex.step(&line[1]).unwrap() else {
            panic!("move should be processed");
        };
        assert!(class.is_pawn_break);
        assert!(class.is_active_move);
        assert_eq!(ex.counters().black.pawn_breaks, 1);
        assert_eq!(ex.counters().black.attacks, 0);
    }

    #[test]
    fn test_boundary_reset_keeps_castle_turns() {
        let line = moves(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O", "Nf6"]);
        let mut ex = extractor(8);
        for mv in &line[..7] {
            ex.step(mv).unwrap();
        }
        assert_eq!(ex.counters().white.castle_turn, 4);
        assert!(ex.counters().white.piece_moves > 0);

        ex.step(&line[7]).unwrap();
        let white = &ex.counters().white;
        assert_eq!(white.castle_turn, 4);
        assert_eq!(white.piece_moves, 0);
        assert_eq!(white.patient_moves, 0);
        assert_eq!(white.central_control, 0.0);
        assert_eq!(white.pieces_at_home, 0);
        assert_eq!(ex.counters().black.castle_turn, 0);
    }

    #[test]
    fn test_short_game_has_no_opening_series() {
        let line = moves(&["e4", "e5", "Nf3"]);
        let features = extractor(10).extract(&line).unwrap();
        assert!(features.opening_activity.is_empty());
        assert!(features.opening_aggression.is_empty());
        assert_eq!(features.mid_activity.len(), 1);
        assert_eq!(features.mid_aggression.len(), 1);
        assert_eq!(features.opening_hash, None);
        assert_eq!(features.plies_processed, 3);
    }

    #[test]
    fn test_opening_series_has_one_snapshot() {
        let line = moves(&[
            "e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6", "O-O", "Be7", "Re1", "b5",
        ]);
        let features = extractor(4).extract(&line).unwrap();
        assert_eq!(features.opening_activity.len(), 1);
        assert_eq!(features.opening_aggression.len(), 1);
        assert_eq!(features.mid_activity.len(), 1);
        assert_eq!(features.mid_aggression.len(), 1);
        assert_eq!(features.plies_processed, 12);
        assert!(!features.reached_endgame);
    }

    #[test]
    fn test_opening_hash_matches_position() {
        let line = moves(&["e4", "e5", "Nf3", "Nc6"]);
        let mut ex = extractor(4);
        for mv in &line {
            ex.step(mv).unwrap();
        }
        assert_eq!(ex.opening_hash(), Some(ex.position().zobrist_hash()));
    }

    #[test]
    fn test_mid_samples_are_averaged() {
        // Opening closes at ply 2; samples fire at plies 4 and 8.
        let line = moves(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "d3", "d6"]);
        let mut ex = extractor(2);
        for mv in &line[..2] {
            ex.step(mv).unwrap();
        }

        let mut control = 0.0;
        let mut space = 0.0;
        for (i, mv) in line[2..].iter().enumerate() {
            ex.step(mv).unwrap();
            if (i + 3) % 4 == 0 {
                let board = ex.position().board();
                control += f64::from(board_utils::central_control(board, Color::White));
                space += f64::from(board_utils::space_advantage(board, Color::Black));
            }
        }
        assert_eq!(ex.samples, 2);
        assert!(control > 0.0);

        let features = ex.finish();
        assert_eq!(features.final_counters.white.central_control, control / 2.0);
        assert_eq!(features.final_counters.black.space_advantage, space / 2.0);
    }

    #[test]
    fn test_no_samples_average_to_zero() {
        // Opening closes at ply 2 and the game ends before the first sample at ply 4.
        let line = moves(&["d4", "d5", "c4"]);
        let features = extractor(2).extract(&line).unwrap();
        assert_eq!(features.final_counters.white.central_control, 0.0);
        assert_eq!(features.final_counters.black.space_advantage, 0.0);
        assert!(features.mid_activity[0].white.is_finite());
    }

    #[test]
    fn test_endgame_stops_processing() {
        use shakmaty::fen::Fen;

        // Six non-pawn, non-king pieces: nothing is processed.
        let six: Chess = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R2QK1NR w KQkq - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let a3 = moves(&["a3"]);
        let mut ex = FeatureExtractor::new(six, ExtractorConfig::new(2).unwrap());
        assert_eq!(ex.step(&a3[0]).unwrap(), StepOutcome::Endgame);
        assert_eq!(ex.ply(), 0);

        // Seven pieces: the move goes through.
        let seven: Chess = "r1b1k2r/pppppppp/8/8/8/8/PPPPPPPP/R2QK1NR w KQkq - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let mut ex = FeatureExtractor::new(seven, ExtractorConfig::new(2).unwrap());
        assert!(matches!(ex.step(&a3[0]).unwrap(), StepOutcome::Processed(_)));
        assert_eq!(ex.ply(), 1);
    }
}
