//! Save/load system
//!
//! Handles saving, loading, listing and deleting game saves.

pub mod save_game;

pub use save_game::{
    SaveData, SaveError, SaveSummary, SaveStore,
    save_directory, sanitize_save_name, autosave_name, AUTOSAVE_SUFFIX,
};
