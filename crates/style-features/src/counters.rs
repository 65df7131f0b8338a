//! Per-side feature tallies.

use serde::Serialize;
use shakmaty::Color;

/// Feature tallies for one side.
///
/// Everything except `castle_turn` is phase-scoped and cleared when the opening
/// window closes. `central_control` and `space_advantage` hold running sums that
/// become averages once the game is finished.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SideCounters {
    // Shared by both scores
    pub pawn_breaks: u32,
    pub attacks: u32,

    // Aggression
    pub infiltrations: u32,
    pub king_attacks: u32,
    pub xray_attacks: u32,
    pub pawn_storms: u32,
    pub retreats: u32,
    pub patient_moves: u32,

    // Activity
    pub piece_moves: u32,
    pub active_defense: u32,
    pub central_control: f64,
    pub space_advantage: f64,
    pub pieces_at_home: u32,

    /// Full-move number on which this side castled, 0 if it has not.
    pub castle_turn: u32,
}

impl SideCounters {
    /// Clear every phase-scoped tally, keeping the castle turn.
    pub fn reset_phase(&mut self) {
        *self = SideCounters {
            castle_turn: self.castle_turn,
            ..SideCounters::default()
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeatureCounters {
    pub white: SideCounters,
    pub black: SideCounters,
}

impl FeatureCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, color: Color) -> &SideCounters {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn side_mut(&mut self, color: Color) -> &mut SideCounters {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Reset both sides at the opening/mid-game boundary.
    pub fn reset_phase(&mut self) {
        self.white.reset_phase();
        self.black.reset_phase();
    }

    /// Turn the central-control and space sums into averages over `samples`.
    /// With no samples both become zero.
    pub fn average_samples(&mut self, samples: u32) {
        for side in [&mut self.white, &mut self.black] {
            if samples == 0 {
                side.central_control = 0.0;
                side.space_advantage = 0.0;
            } else {
                side.central_control /= f64::from(samples);
                side.space_advantage /= f64::from(samples);
            }
        }
    }
}
