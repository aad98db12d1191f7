//! Game save/load system
//!
//! Handles saving and loading game state to/from disk. One JSON document
//! per save name, capped at a configured number of files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::GameConfig;
use crate::game::GameState;

/// Save file version for compatibility checking
const SAVE_VERSION: u32 = 1;

/// Extension of save documents
const SAVE_EXTENSION: &str = "json";

/// Appended to a character name to form its autosave name
pub const AUTOSAVE_SUFFIX: &str = "_autoSave";

/// Complete save data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: GameState,
}

/// Just enough of a document to check its version before a full parse
#[derive(Deserialize)]
struct SaveHeader {
    version: u32,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save name cannot be empty")]
    EmptyName,
    #[error("maximum number of save files ({max}) reached")]
    LimitReached { max: usize },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not serialize game state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("save '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SaveError + '_ {
    move |source| SaveError::Io { path: path.to_path_buf(), source }
}

/// Brief summary of a save for the load menu
#[derive(Debug, Clone)]
pub struct SaveSummary {
    /// Display name (file stem)
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
}

impl SaveSummary {
    /// Short date and time, e.g. `03/14/2026 18:05`
    pub fn display_timestamp(&self) -> String {
        self.modified.format("%m/%d/%Y %H:%M").to_string()
    }
}

/// Default save directory: per-user data dir, or `./SaveFiles`
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "guildvault", "GuildVault") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("SaveFiles");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./SaveFiles")
    }
}

/// Turn a user-supplied name into a file stem. Spaces become underscores;
/// anything other than letters, digits, `_` and `-` is dropped. Distinct
/// names can therefore map to the same stem.
pub fn sanitize_save_name(name: &str) -> Result<String, SaveError> {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if stem.is_empty() {
        return Err(SaveError::EmptyName);
    }
    Ok(stem)
}

/// Save name used for a character's automatic save
pub fn autosave_name(character_name: &str) -> String {
    format!("{}{}", character_name.trim(), AUTOSAVE_SUFFIX)
}

/// Directory of save documents
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
    max_files: usize,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>, max_files: usize) -> Self {
        Self {
            dir: dir.into(),
            max_files,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let dir = config.save_dir.clone().unwrap_or_else(save_directory);
        Self::new(dir, config.max_save_files)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Path of the document for a save name
    pub fn save_path(&self, name: &str) -> Result<PathBuf, SaveError> {
        let stem = sanitize_save_name(name)?;
        Ok(self.dir.join(format!("{}.{}", stem, SAVE_EXTENSION)))
    }

    pub fn save_exists(&self, name: &str) -> bool {
        self.save_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn ensure_dir(&self) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))
    }

    /// Save documents on disk, sorted by file name
    fn save_files(&self) -> Result<Vec<PathBuf>, SaveError> {
        self.ensure_dir()?;
        let entries = fs::read_dir(&self.dir).map_err(io_error(&self.dir))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(SAVE_EXTENSION))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Number of save documents on disk
    pub fn count(&self) -> Result<usize, SaveError> {
        Ok(self.save_files()?.len())
    }

    /// Write `state` under `name`, replacing any save of the same name.
    ///
    /// Refused once `max_files` saves exist, even when `name` is one of
    /// them. Names are sanitized first, so names differing only in spaces
    /// versus underscores or in dropped characters (`"My Save"` and
    /// `"My_Save"`, `"a.b"` and `"ab"`) share one document.
    pub fn save_game(&self, name: &str, state: &GameState) -> Result<PathBuf, SaveError> {
        let path = self.save_path(name)?;
        self.ensure_dir()?;

        if self.count()? >= self.max_files {
            log::warn!("Maximum number of save files reached.");
            return Err(SaveError::LimitReached { max: self.max_files });
        }

        let save_data = SaveData {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&save_data).map_err(SaveError::Serialize)?;

        // Write beside the target, then swap it in
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_error(&tmp_path))?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SaveError::Io { path, source: e });
        }

        log::info!("Game saved to: {}", path.display());
        Ok(path)
    }

    /// Save under the character's autosave name
    pub fn autosave(&self, character_name: &str, state: &GameState) -> Result<PathBuf, SaveError> {
        let path = self.save_game(&autosave_name(character_name), state)?;
        log::info!("Game auto-saved for {}", character_name.trim());
        Ok(path)
    }

    /// Read a save. `Ok(None)` when no save of that name exists.
    pub fn load_game(&self, name: &str) -> Result<Option<GameState>, SaveError> {
        let path = self.save_path(name)?;
        if !path.exists() {
            log::warn!("Save file not found: {}", path.display());
            return Ok(None);
        }

        let data = fs::read_to_string(&path).map_err(io_error(&path))?;
        let corrupt = |e: serde_json::Error| SaveError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        };

        let header: SaveHeader = serde_json::from_str(&data).map_err(corrupt)?;
        if header.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: header.version,
            });
        }
        let save: SaveData = serde_json::from_str(&data).map_err(corrupt)?;
        if let Err(reason) = save.state.validate() {
            return Err(SaveError::Corrupt {
                name: name.to_string(),
                reason,
            });
        }

        log::info!("Game loaded from {}", path.display());
        Ok(Some(save.state))
    }

    /// Up to `max_files` saves, sorted by name
    pub fn list_saves(&self) -> Result<Vec<SaveSummary>, SaveError> {
        let summaries = self
            .save_files()?
            .into_iter()
            .take(self.max_files)
            .filter_map(|path| {
                let name = path.file_stem()?.to_str()?.to_string();
                let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
                    Ok(time) => DateTime::<Local>::from(time),
                    Err(e) => {
                        log::warn!("Could not read timestamp of {}: {}", path.display(), e);
                        return None;
                    }
                };
                Some(SaveSummary { name, path, modified })
            })
            .collect();
        Ok(summaries)
    }

    /// Remove a save. Returns `false` if there was nothing to remove.
    pub fn delete_save(&self, name: &str) -> Result<bool, SaveError> {
        let path = self.save_path(name)?;
        if !path.exists() {
            log::warn!("Save file not found: {}", name);
            return Ok(false);
        }
        fs::remove_file(&path).map_err(io_error(&path))?;
        log::info!("Deleted save {}", name);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipSlot, ItemCode};
    use crate::game::{Difficulty, GameMode};
    use crate::roster::{CharacterRecord, Class, Portrait, Race};
    use tempfile::TempDir;

    fn store(max: usize) -> (TempDir, SaveStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("SaveFiles"), max);
        (dir, store)
    }

    fn sample_state() -> GameState {
        let mut state = GameState::default();
        state.stage = 4;
        state.difficulty = Difficulty::Hard;
        state.game_mode = GameMode::Hardcore;
        let mut c = CharacterRecord::new(0, "Aria", Race::Elf, Class::Ranger)
            .with_portrait(Portrait::from_png(vec![137, 80, 78, 71, 0, 255]));
        c.equipment.set(EquipSlot::Top, ItemCode(2));
        c.skill_gems.set(1, ItemCode(100));
        state.characters.add(c, 16).unwrap();
        state.seed_starter_vault();
        state.skill_gem_vault.add(ItemCode(101));
        state
    }

    #[test]
    fn test_sanitize_save_name() {
        assert_eq!(sanitize_save_name("My Save").unwrap(), "My_Save");
        assert_eq!(sanitize_save_name("  run-2 ").unwrap(), "run-2");
        assert_eq!(sanitize_save_name("../../etc/passwd").unwrap(), "etcpasswd");
        assert!(matches!(sanitize_save_name("   "), Err(SaveError::EmptyName)));
        assert!(matches!(sanitize_save_name("///"), Err(SaveError::EmptyName)));
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store(7);
        let state = sample_state();

        store.save_game("X", &state).unwrap();
        let loaded = store.load_game("X").unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = store(7);
        assert!(store.load_game("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_dir, store) = store(7);
        assert!(matches!(store.save_game("", &GameState::default()), Err(SaveError::EmptyName)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_count_ceiling() {
        let (_dir, store) = store(3);
        let state = GameState::default();
        for name in ["a", "b", "c"] {
            store.save_game(name, &state).unwrap();
        }

        let err = store.save_game("d", &state).unwrap_err();
        assert!(matches!(err, SaveError::LimitReached { max: 3 }));
        assert_eq!(store.count().unwrap(), 3);
        assert!(!store.save_exists("d"));

        // existing names are refused too
        let err = store.save_game("b", &sample_state()).unwrap_err();
        assert!(matches!(err, SaveError::LimitReached { max: 3 }));
        assert_eq!(store.load_game("b").unwrap().unwrap().stage, 0);

        store.delete_save("a").unwrap();
        store.save_game("b", &sample_state()).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.load_game("b").unwrap().unwrap().stage, 4);
    }

    #[test]
    fn test_sanitized_names_share_a_document() {
        let (_dir, store) = store(7);
        store.save_game("My Save", &GameState::default()).unwrap();
        store.save_game("My_Save", &sample_state()).unwrap();
        store.save_game("a.b", &GameState::default()).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.save_path("My Save").unwrap(), store.save_path("My_Save").unwrap());
        assert_eq!(store.load_game("My Save").unwrap().unwrap().stage, 4);
        assert!(store.save_exists("ab"));
    }

    #[test]
    fn test_load_rejects_broken_invariants() {
        let (_dir, store) = store(7);
        let path = store.save_game("d", &sample_state()).unwrap();

        let mut doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = doc["state"]["characters"][0].clone();
        doc["state"]["characters"].as_array_mut().unwrap().push(first);
        fs::write(&path, doc.to_string()).unwrap();
        assert!(matches!(store.load_game("d"), Err(SaveError::Corrupt { .. })));

        let path = store.save_game("v", &sample_state()).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        doc["state"]["equipment_vault"]["capacity"] = serde_json::json!(2);
        fs::write(&path, doc.to_string()).unwrap();
        let err = store.load_game("v").unwrap_err();
        assert!(matches!(err, SaveError::Corrupt { ref reason, .. } if reason.contains("equipment vault")));
    }

    #[test]
    fn test_autosave_name() {
        let (_dir, store) = store(7);
        let path = store.autosave("Aria", &sample_state()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Aria_autoSave.json");
        assert!(store.load_game("Aria_autoSave").unwrap().is_some());
        assert!(store.load_game("Aria").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_save() {
        let (_dir, store) = store(7);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(store.load_game("broken"), Err(SaveError::Corrupt { .. })));

        fs::write(store.dir().join("partial.json"), r#"{"version": 1, "state": {"stage": "x"}}"#).unwrap();
        assert!(matches!(store.load_game("partial"), Err(SaveError::Corrupt { .. })));
    }

    #[test]
    fn test_version_mismatch() {
        let (_dir, store) = store(7);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("future.json"), r#"{"version": 99}"#).unwrap();
        assert!(matches!(
            store.load_game("future"),
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));
    }

    #[test]
    fn test_list_saves_sorted_and_capped() {
        let (_dir, store) = store(2);
        let state = GameState::default();
        store.save_game("beta", &state).unwrap();
        store.save_game("alpha", &state).unwrap();
        // stray files that are not saves
        fs::write(store.dir().join("notes.txt"), "hi").unwrap();
        fs::write(store.dir().join("gamma.json.tmp"), "{}").unwrap();
        fs::write(store.dir().join("zeta.json"), "{}").unwrap();

        let saves = store.list_saves().unwrap();
        let names: Vec<&str> = saves.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(saves[0].display_timestamp().len(), 16);
    }

    #[test]
    fn test_delete_save() {
        let (_dir, store) = store(7);
        store.save_game("gone", &GameState::default()).unwrap();
        assert!(store.delete_save("gone").unwrap());
        assert!(!store.save_exists("gone"));
        assert!(!store.delete_save("gone").unwrap());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (_dir, store) = store(7);
        store.save_game("clean", &GameState::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
