//! Item catalog
//!
//! Resolves item codes to their definitions and owns the association
//! between codes and icon assets.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::item::{IconRef, ItemCode, ItemDefinition};

/// File extensions recognised as icon images
const ICON_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Code -> definition table, built once per session
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemCode, ItemDefinition>,
    /// Icons keyed by the code parsed from their asset name
    icons: HashMap<ItemCode, IconRef>,
    initialized: bool,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog already initialized with `seed` and no icons
    pub fn with_items(seed: &[ItemDefinition]) -> Self {
        let mut catalog = Self::new();
        catalog.initialize(seed, Vec::new());
        catalog
    }

    /// Populate the table from `seed` and attach matching icons.
    ///
    /// Only the first call does anything; later calls return `false`.
    pub fn initialize(&mut self, seed: &[ItemDefinition], icons: Vec<IconRef>) -> bool {
        if self.initialized {
            log::debug!("Item catalog already initialized, skipping");
            return false;
        }
        self.initialized = true;

        log::info!("Initializing item catalog...");
        self.items.clear();
        self.icons.clear();

        let loaded = self.add_icons(icons);
        log::info!("Loaded {} item icons", loaded);

        for item in seed {
            self.register(item.clone());
        }

        log::info!("Item catalog initialized with {} items", self.items.len());
        true
    }

    /// Index icons by the item code embedded in their name.
    /// Icons whose name is not an integer are skipped.
    pub fn add_icons(&mut self, icons: impl IntoIterator<Item = IconRef>) -> usize {
        let mut added = 0;
        for icon in icons {
            match icon.name.trim().parse::<i32>() {
                Ok(code) => {
                    log::debug!("Loaded icon for item code {}: {}", code, icon.name);
                    self.icons.insert(ItemCode(code), icon);
                    added += 1;
                }
                Err(_) => log::warn!("Skipping invalid icon name: {}", icon.name),
            }
        }
        added
    }

    /// Add a definition. Returns `false` (and leaves the table untouched)
    /// if the code is already registered.
    pub fn register(&mut self, item: ItemDefinition) -> bool {
        if self.items.contains_key(&item.code) {
            log::warn!("Item with code {} already exists!", item.code.0);
            return false;
        }

        let item = match self.icons.get(&item.code) {
            Some(icon) => item.with_icon(icon.clone()),
            None => {
                log::warn!("No icon found for item {} (code {})", item.name, item.code.0);
                item
            }
        };

        log::debug!("Added new item: {}", item.name);
        self.items.insert(item.code, item);
        true
    }

    /// Resolve a code. Unknown codes and `EMPTY` resolve to `None`.
    pub fn lookup(&self, code: ItemCode) -> Option<&ItemDefinition> {
        self.items.get(&code)
    }

    pub fn contains(&self, code: ItemCode) -> bool {
        self.items.contains_key(&code)
    }

    /// Icon registered for a code, whether or not the item exists
    pub fn icon(&self, code: ItemCode) -> Option<&IconRef> {
        self.icons.get(&code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All definitions ordered by code
    pub fn items(&self) -> Vec<&ItemDefinition> {
        let mut items: Vec<&ItemDefinition> = self.items.values().collect();
        items.sort_by_key(|item| item.code);
        items
    }
}

/// Collect icon assets from a directory.
///
/// A missing or unreadable directory yields no icons.
pub fn scan_icon_dir(dir: &Path) -> Vec<IconRef> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not read icon directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut icons: Vec<IconRef> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ICON_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|path| {
            let name = path.file_stem()?.to_str()?.to_string();
            Some(IconRef { name, path })
        })
        .collect();

    icons.sort_by(|a, b| a.name.cmp(&b.name));
    icons
}
