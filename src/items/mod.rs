//! Item system

pub mod item;
pub mod catalog;
pub mod equipment;
pub mod vault;

pub use item::{ItemCode, ItemDefinition, EquipSlot, Rarity, WeaponType, IconRef};
pub use catalog::{ItemCatalog, scan_icon_dir};
pub use equipment::{Equipment, SkillGems, SKILL_GEM_SOCKETS};
pub use vault::{Vault, DEFAULT_VAULT_CAPACITY};
