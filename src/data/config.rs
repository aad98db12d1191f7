//! Runtime configuration
//!
//! Read from `config.ron` in the data directory; every field has a default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::items::DEFAULT_VAULT_CAPACITY;

/// Maximum number of save documents kept on disk
pub const DEFAULT_MAX_SAVE_FILES: usize = 7;
/// Maximum characters in one roster
pub const DEFAULT_MAX_CHARACTERS: usize = 16;
/// Capacity of the skill-gem vault
pub const DEFAULT_GEM_VAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where saves live. `None` means the per-user data directory.
    pub save_dir: Option<PathBuf>,
    pub max_save_files: usize,
    pub vault_capacity: usize,
    pub gem_vault_capacity: usize,
    pub max_characters: usize,
    /// Directory holding `items.ron` and `config.ron`
    pub data_dir: PathBuf,
    /// Directory scanned for item icons
    pub icon_dir: PathBuf,
    /// Stock portraits, one subdirectory per race
    pub portrait_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_dir: None,
            max_save_files: DEFAULT_MAX_SAVE_FILES,
            vault_capacity: DEFAULT_VAULT_CAPACITY,
            gem_vault_capacity: DEFAULT_GEM_VAULT_CAPACITY,
            max_characters: DEFAULT_MAX_CHARACTERS,
            data_dir: PathBuf::from("assets/data"),
            icon_dir: PathBuf::from("assets/sprites/items"),
            portrait_dir: PathBuf::from("assets/sprites/portraits"),
        }
    }
}

impl GameConfig {
    /// Config rooted at a save directory, everything else default
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: Some(save_dir.into()),
            ..Self::default()
        }
    }
}
