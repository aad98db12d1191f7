//! Difficulty and game mode
//!
//! Chosen on the character creation screen and stored with the save.

use serde::{Deserialize, Serialize};

/// Game difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Whether death is permanent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Softcore,
    Hardcore,
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Softcore => "Softcore",
            GameMode::Hardcore => "Hardcore",
        }
    }

    /// Hardcore characters are lost for good when they die
    pub fn permadeath(&self) -> bool {
        matches!(self, GameMode::Hardcore)
    }
}
