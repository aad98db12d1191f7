//! RON data loader
//!
//! Loads item data and configuration from external RON files, with fallback
//! to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::items::{EquipSlot, ItemDefinition};
use super::config::GameConfig;
use super::items::{default_item_templates, ItemTemplates};

/// Default location of the data files
pub const DEFAULT_DATA_DIR: &str = "assets/data";

/// External game data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Item seed set
    pub items: ItemTemplates,
    /// Runtime configuration
    pub config: GameConfig,
}

impl DataManager {
    /// Create a new DataManager, loading from the default data directory
    pub fn new() -> Self {
        Self::load_from(Path::new(DEFAULT_DATA_DIR))
    }

    /// Load data from `base_path`. Missing or broken files fall back to
    /// defaults individually.
    pub fn load_from(base_path: &Path) -> Self {
        let mut config: GameConfig = load_ron(&base_path.join("config.ron")).unwrap_or_default();
        config.data_dir = base_path.to_path_buf();

        let items = Self::load_items(base_path);

        Self { items, config }
    }

    /// Load item templates from RON file
    fn load_items(base_path: &Path) -> ItemTemplates {
        match load_ron::<ItemTemplates>(&base_path.join("items.ron")) {
            Some(mut templates) => {
                for item in &mut templates.items {
                    if item.slot != EquipSlot::Weapon && item.weapon_type.is_some() {
                        log::warn!("Ignoring weapon type on non-weapon item {}", item.name);
                        item.weapon_type = None;
                    }
                }
                templates
            }
            None => default_item_templates(),
        }
    }

    /// Item definitions to seed the catalog with
    pub fn seed_items(&self) -> &[ItemDefinition] {
        &self.items.items
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            items: default_item_templates(),
            config: GameConfig::default(),
        }
    }
}

/// Read and parse a RON file. Absence is silent; read and parse failures
/// are logged. Either way the caller gets `None` and uses its default.
fn load_ron<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<Vec<PathBuf>, String> {
    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create {}: {}", base_path.display(), e))?;
    }

    let pretty = ron::ser::PrettyConfig::default();

    let items_path = base_path.join("items.ron");
    let items_ron = ron::ser::to_string_pretty(&default_item_templates(), pretty.clone())
        .map_err(|e| format!("Failed to serialize items: {}", e))?;
    fs::write(&items_path, items_ron)
        .map_err(|e| format!("Failed to write items.ron: {}", e))?;

    let config_path = base_path.join("config.ron");
    let config_ron = ron::ser::to_string_pretty(&GameConfig::default(), pretty)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(&config_path, config_ron)
        .map_err(|e| format!("Failed to write config.ron: {}", e))?;

    Ok(vec![items_path, config_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemCode;

    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_default_data(dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("items.ron").exists());
        assert!(dir.path().join("config.ron").exists());

        let manager = DataManager::load_from(dir.path());
        assert_eq!(manager.seed_items().len(), 4);
        assert_eq!(manager.config.max_save_files, 7);
        assert_eq!(manager.config.data_dir, dir.path());
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DataManager::load_from(&dir.path().join("nowhere"));
        assert_eq!(manager.seed_items().len(), 4);
        assert_eq!(manager.config.max_characters, 16);
    }

    #[test]
    fn test_broken_items_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("items.ron"), "this is not ron (").unwrap();
        let manager = DataManager::load_from(dir.path());
        assert_eq!(manager.seed_items().len(), 4);
    }

    #[test]
    fn test_custom_items_file() {
        let dir = tempfile::tempdir().unwrap();
        let ron = r#"(items: [
            (code: 10, name: "Oak Staff", slot: Weapon, rarity: Rare, required_level: 3,
             weapon_type: Some(Staff), attack: 7),
            (code: 11, name: "Boots", slot: Shoes, rarity: Common, required_level: 1,
             weapon_type: Some(Bow), defense: 2),
        ])"#;
        fs::write(dir.path().join("items.ron"), ron).unwrap();

        let manager = DataManager::load_from(dir.path());
        let items = manager.seed_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].code, ItemCode(10));
        assert_eq!(items[0].attack, 7);
        assert!(items[1].weapon_type.is_none());
    }
}
