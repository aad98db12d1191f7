//! Data loading and configuration
//!
//! Item seed data and runtime configuration, loaded from external RON files
//! with built-in fallbacks.

pub mod loader;
pub mod items;
pub mod config;

pub use loader::{DataManager, export_default_data, DEFAULT_DATA_DIR};
pub use items::{ItemTemplates, default_seed_items, default_item_templates, STARTER_EQUIPMENT, STARTER_VAULT};
pub use config::{GameConfig, DEFAULT_MAX_SAVE_FILES, DEFAULT_MAX_CHARACTERS, DEFAULT_GEM_VAULT_CAPACITY};
