//! Extractor configuration

use shakmaty::Color;

use crate::error::FeatureError;

/// Non-pawn, non-king pieces (both sides) at or below which the game counts as an endgame.
pub const ENDGAME_PIECE_LIMIT: u32 = 6;

/// Plies between central-control / space samples after the opening window.
pub const SAMPLE_INTERVAL: usize = 4;

/// How many plies the pawn-storm detector looks back.
pub const PAWN_STORM_LOOKBACK: usize = 6;

/// Pawn advances on one wing needed to call it a storm.
pub const PAWN_STORM_MIN_ADVANCES: usize = 2;

/// Extra king-pressure credit for capturing a piece that guarded the enemy king's zone.
///
/// The historical scoring awards white +2 and black +3. That asymmetry is kept as the
/// default so results stay comparable with earlier runs; use [`KingPressureBonus::symmetric`]
/// to score both sides alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KingPressureBonus {
    pub white: u32,
    pub black: u32,
}

impl KingPressureBonus {
    pub fn symmetric(bonus: u32) -> Self {
        Self {
            white: bonus,
            black: bonus,
        }
    }

    pub fn for_color(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

impl Default for KingPressureBonus {
    fn default() -> Self {
        Self { white: 2, black: 3 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Length of the opening window in plies (full moves x 2).
    pub opening_length: usize,

    pub king_pressure_bonus: KingPressureBonus,
}

impl ExtractorConfig {
    /// Build a config with the default king-pressure bonus.
    /// The opening length must be a positive, even ply count.
    pub fn new(opening_length: u32) -> Result<Self, FeatureError> {
        if opening_length == 0 || opening_length % 2 != 0 {
            return Err(FeatureError::InvalidOpeningLength(opening_length));
        }
        Ok(Self {
            opening_length: opening_length as usize,
            king_pressure_bonus: KingPressureBonus::default(),
        })
    }

    pub fn with_king_pressure_bonus(mut self, bonus: KingPressureBonus) -> Self {
        self.king_pressure_bonus = bonus;
        self
    }
}
