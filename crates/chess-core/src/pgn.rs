//! Lightweight regex-based PGN parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::game_data::{GameData, GameMetadata};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("header regex"));
static HEADER_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("header block regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("comment regex"));
static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("variation regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O")
        .expect("move regex")
});

/// Parse a single-game PGN string into a GameData struct.
///
/// Returns `None` for games that start from a custom position or carry no moves.
pub fn parse_pgn(pgn: &str) -> Option<GameData> {
    let mut white = "Unknown".to_string();
    let mut black = "Unknown".to_string();
    let mut result = "*".to_string();
    let mut date = None;
    let mut eco = None;
    let mut opening = None;
    let mut variation = None;
    let mut event = None;
    let mut site = None;
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => white = value,
            "Black" => black = value,
            "Result" => result = value,
            "Date" => date = Some(value),
            "ECO" => eco = Some(value),
            "Opening" => opening = Some(value),
            "Variation" => variation = Some(value),
            "Event" => event = Some(value),
            "Site" => site = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Filter non-standard positions
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return None;
            }
        }
    }

    let moves = extract_moves(pgn);
    if moves.is_empty() {
        return None;
    }

    Some(GameData {
        metadata: GameMetadata {
            white,
            black,
            result,
            date,
            eco,
            opening,
            variation,
            event,
            site,
        },
        moves,
        pgn: pgn.to_string(),
    })
}

/// Split a multi-game PGN file into one slice per game.
///
/// A new game starts at every line beginning with an `[Event ` header. Text before
/// the first header is dropped.
pub fn split_games(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("[Event ") {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .filter(|game| !game.is_empty())
        .collect()
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_BLOCK_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = VARIATION_RE.replace_all(&no_comments, "");

    MOVE_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract a string value from a PGN header (e.g. WhiteTitle, BlackTitle).
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Extract an integer value from a PGN header.
pub fn extract_header_int(pgn: &str, header_name: &str) -> Option<i32> {
    let pattern = format!(r#"\[{}\s+"(\d+)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(pgn)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GAMES: &str = r#"[Event "Rated Blitz game"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[ECO "C20"]
[Opening "King's Pawn Game"]

1. e4 e5 2. Nf3 { a comment } Nc6 (2... d6 3. d4) 3. Bb5 1-0

[Event "Rated Blitz game"]
[White "Player2"]
[Black "Player1"]
[Result "0-1"]

1. d4 d5 0-1
"#;

    #[test]
    fn test_parse_pgn_basic() {
        let games = split_games(TWO_GAMES);
        let game = parse_pgn(games[0]).unwrap();
        assert_eq!(game.metadata.white, "Player1");
        assert_eq!(game.metadata.black, "Player2");
        assert_eq!(game.metadata.result, "1-0");
        assert_eq!(game.metadata.eco.as_deref(), Some("C20"));
        assert_eq!(game.metadata.opening.as_deref(), Some("King's Pawn Game"));
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(game.ply_count(), 5);
    }

    #[test]
    fn test_split_games() {
        let games = split_games(TWO_GAMES);
        assert_eq!(games.len(), 2);
        assert!(games[1].contains("1. d4 d5"));
        assert!(!games[0].contains("1. d4 d5"));
    }

    #[test]
    fn test_custom_start_position_is_skipped() {
        let pgn = r#"[Event "Odds"]
[SetUp "1"]
[FEN "4k3/8/8/8/8/8/8/4K3 w - - 0 1"]

1. Kd2 Kd7 *"#;
        assert!(parse_pgn(pgn).is_none());
    }

    #[test]
    fn test_game_without_moves_is_skipped() {
        assert!(parse_pgn(r#"[Event "Empty"]"#).is_none());
    }

    #[test]
    fn test_game_data_serializes() {
        let game = parse_pgn(split_games(TWO_GAMES)[1]).unwrap();
        let json = serde_json::to_value(&game.metadata).unwrap();
        assert_eq!(json["white"], "Player2");
        assert_eq!(json["eco"], serde_json::Value::Null);
    }

    #[test]
    fn test_extract_header_int() {
        let pgn = r#"[WhiteElo "1500"]
[BlackElo "1600"]"#;

        assert_eq!(extract_header_int(pgn, "WhiteElo"), Some(1500));
        assert_eq!(extract_header_int(pgn, "BlackElo"), Some(1600));
        assert_eq!(extract_header_int(pgn, "Missing"), None);
    }

    #[test]
    fn test_extract_header() {
        let pgn = r#"[WhiteTitle "GM"]
[BlackTitle ""]"#;
        assert_eq!(extract_header(pgn, "WhiteTitle").as_deref(), Some("GM"));
        assert_eq!(extract_header(pgn, "BlackTitle"), None);
    }
}
