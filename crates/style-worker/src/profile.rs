//! Per-game profiling: replay the movetext and extract style features.

use chess_core::game_data::GameData;
use chess_core::pgn::{extract_header, extract_header_int};
use chess_core::replay::decode_san_moves;
use serde::Serialize;
use shakmaty::Chess;
use style_features::{extract_game_features, ExtractorConfig, GameFeatures};
use tracing::warn;

use crate::error::WorkerError;

/// One output record: game identity plus its features.
#[derive(Debug, Clone, Serialize)]
pub struct GameProfile {
    pub white: String,
    pub black: String,
    pub result: String,
    pub white_elo: Option<i32>,
    pub black_elo: Option<i32>,
    pub white_title: Option<String>,
    pub black_title: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub date: Option<String>,
    pub features: GameFeatures,
}

pub fn profile_game(game: &GameData, config: ExtractorConfig) -> Result<GameProfile, WorkerError> {
    let moves = decode_san_moves(&game.moves);
    if moves.len() < game.ply_count() {
        warn!(
            white = %game.metadata.white,
            black = %game.metadata.black,
            decoded = moves.len(),
            recorded = game.ply_count(),
            "Movetext has an unplayable move, profiling the legal prefix"
        );
    }

    let features = extract_game_features(Chess::default(), &moves, config)?;
    let meta = &game.metadata;

    Ok(GameProfile {
        white: meta.white.clone(),
        black: meta.black.clone(),
        result: meta.result.clone(),
        white_elo: extract_header_int(&game.pgn, "WhiteElo"),
        black_elo: extract_header_int(&game.pgn, "BlackElo"),
        white_title: extract_header(&game.pgn, "WhiteTitle"),
        black_title: extract_header(&game.pgn, "BlackTitle"),
        eco: meta.eco.clone(),
        opening: meta.opening.clone(),
        date: meta.date.clone(),
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::pgn::parse_pgn;
    use style_features::FeatureError;

    const RUY_LOPEZ: &str = r#"[Event "Club match"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]
[WhiteElo "1850"]
[BlackTitle "FM"]
[ECO "C65"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6 4. O-O Be7 5. Re1 d6 6. c3 O-O 1-0"#;

    #[test]
    fn test_profile_carries_metadata() {
        let game = parse_pgn(RUY_LOPEZ).unwrap();
        let profile = profile_game(&game, ExtractorConfig::new(8).unwrap()).unwrap();

        assert_eq!(profile.white, "Alice");
        assert_eq!(profile.white_elo, Some(1850));
        assert_eq!(profile.black_elo, None);
        assert_eq!(profile.white_title, None);
        assert_eq!(profile.black_title.as_deref(), Some("FM"));
        assert_eq!(profile.eco.as_deref(), Some("C65"));
        assert_eq!(profile.features.plies_processed, 12);
        assert_eq!(profile.features.opening_activity.len(), 1);
    }

    #[test]
    fn test_truncated_movetext_uses_legal_prefix() {
        let pgn = r#"[Event "Casual"]
[White "A"]
[Black "B"]

1. e4 e5 2. Ke3 Nc6 *"#;
        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.ply_count(), 4);

        let profile = profile_game(&game, ExtractorConfig::new(8).unwrap()).unwrap();
        assert_eq!(profile.features.plies_processed, 2);
    }

    #[test]
    fn test_unplayable_first_move_is_an_error() {
        let pgn = r#"[Event "Casual"]

1. e5 d5 *"#;
        let game = parse_pgn(pgn).unwrap();
        let err = profile_game(&game, ExtractorConfig::new(16).unwrap()).unwrap_err();
        assert!(matches!(err, WorkerError::Features(FeatureError::EmptyMoveList)));
    }

    #[test]
    fn test_profile_serializes_to_json() {
        let game = parse_pgn(RUY_LOPEZ).unwrap();
        let profile = profile_game(&game, ExtractorConfig::new(8).unwrap()).unwrap();
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["result"], "1-0");
        assert!(json["features"]["opening_hash"].is_u64());
        assert_eq!(json["features"]["mid_activity"].as_array().unwrap().len(), 1);
    }
}
