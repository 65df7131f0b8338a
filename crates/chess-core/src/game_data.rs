use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2"
    pub date: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub variation: Option<String>,
    pub event: Option<String>,
    pub site: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub moves: Vec<String>, // SAN notation
    pub pgn: String,
}

impl GameData {
    /// Number of half-moves recorded in the movetext.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }
}
