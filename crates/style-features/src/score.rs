//! Activity and aggression scores from a counter snapshot.

use serde::Serialize;

use crate::counters::{FeatureCounters, SideCounters};

// Activity weights
const ACTIVITY_PAWN_BREAK: f64 = 1.5;
const ACTIVITY_ATTACK: f64 = 1.5;
const ACTIVITY_PIECE_MOVE: f64 = 1.5;
const ACTIVITY_ACTIVE_DEFENSE: f64 = 1.0;
const ACTIVITY_CENTRAL_CONTROL: f64 = 1.5;
const ACTIVITY_SPACE_ADVANTAGE: f64 = 1.5;
const ACTIVITY_PIECE_AT_HOME: f64 = -0.5;

// Aggression weights
const AGGRESSION_PAWN_BREAK: f64 = 1.5;
const AGGRESSION_ATTACK: f64 = 1.5;
const AGGRESSION_INFILTRATION: f64 = 2.5;
const AGGRESSION_KING_ATTACK: f64 = 4.5;
const AGGRESSION_XRAY_ATTACK: f64 = 3.0;
const AGGRESSION_PAWN_STORM: f64 = 4.0;
const AGGRESSION_RETREAT: f64 = -2.0;
const AGGRESSION_PATIENT_MOVE: f64 = -1.0;

/// A (white, black) score pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScorePair {
    pub white: f64,
    pub black: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StyleScores {
    pub white_activity: f64,
    pub black_activity: f64,
    pub white_aggression: f64,
    pub black_aggression: f64,
}

/// Pure scoring over a borrowed counter snapshot.
pub struct ScoreCalculator<'a> {
    counters: &'a FeatureCounters,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(counters: &'a FeatureCounters) -> Self {
        Self { counters }
    }

    pub fn activity_score(&self) -> ScorePair {
        ScorePair {
            white: activity(&self.counters.white),
            black: activity(&self.counters.black),
        }
    }

    pub fn aggression_score(&self) -> ScorePair {
        ScorePair {
            white: aggression(&self.counters.white),
            black: aggression(&self.counters.black),
        }
    }

    pub fn all_scores(&self) -> StyleScores {
        let activity = self.activity_score();
        let aggression = self.aggression_score();
        StyleScores {
            white_activity: activity.white,
            black_activity: activity.black,
            white_aggression: aggression.white,
            black_aggression: aggression.black,
        }
    }
}

fn activity(side: &SideCounters) -> f64 {
    ACTIVITY_PAWN_BREAK * f64::from(side.pawn_breaks)
        + ACTIVITY_ATTACK * f64::from(side.attacks)
        + ACTIVITY_PIECE_MOVE * f64::from(side.piece_moves)
        + ACTIVITY_ACTIVE_DEFENSE * f64::from(side.active_defense)
        + ACTIVITY_CENTRAL_CONTROL * side.central_control
        + ACTIVITY_SPACE_ADVANTAGE * side.space_advantage
        + ACTIVITY_PIECE_AT_HOME * f64::from(side.pieces_at_home)
}

fn aggression(side: &SideCounters) -> f64 {
    AGGRESSION_PAWN_BREAK * f64::from(side.pawn_breaks)
        + AGGRESSION_ATTACK * f64::from(side.attacks)
        + AGGRESSION_INFILTRATION * f64::from(side.infiltrations)
        + AGGRESSION_KING_ATTACK * f64::from(side.king_attacks)
        + AGGRESSION_XRAY_ATTACK * f64::from(side.xray_attacks)
        + AGGRESSION_PAWN_STORM * f64::from(side.pawn_storms)
        + AGGRESSION_RETREAT * f64::from(side.retreats)
        + AGGRESSION_PATIENT_MOVE * f64::from(side.patient_moves)
}
