//! Guildvault - party roster, item catalog and equipment vault
//!
//! Characters wear catalog items in typed slots, trade them with a shared
//! vault through drag-style transfers, and the whole state round-trips
//! through named JSON save documents.

pub mod items;
pub mod data;
pub mod roster;
pub mod game;
pub mod transfer;
pub mod save;

// Re-export commonly used types
pub use game::{GameState, Session, SessionError};
pub use items::{EquipSlot, ItemCatalog, ItemCode, ItemDefinition, Vault};
pub use roster::{CharacterDraft, CharacterRecord};
pub use transfer::{Location, TransferEngine, TransferError, TransferOutcome};
