//! Item definitions
//!
//! Item codes, equipment slots, rarities and the immutable definitions the
//! catalog hands out.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Integer key identifying an item definition in the catalog.
///
/// `ItemCode::EMPTY` (-1) marks a slot that holds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(pub i32);

impl ItemCode {
    /// Sentinel for "no item"
    pub const EMPTY: ItemCode = ItemCode(-1);

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// `None` for the empty sentinel, otherwise the code itself
    pub fn non_empty(self) -> Option<ItemCode> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl Default for ItemCode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<i32> for ItemCode {
    fn from(code: i32) -> Self {
        ItemCode(code)
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "empty")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Unique,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Unique => "Unique",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Body location an item is worn in. Every character has exactly one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Head,
    Top,
    Bottom,
    Shoes,
    Ring,
    Necklace,
    Bracelet,
}

/// Weapon subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Sword,
    Bow,
    Wand,
    Staff,
}

/// Handle to an externally loaded icon asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef {
    /// Asset name (the numeric part identifies the item code)
    pub name: String,
    /// Where the asset was loaded from
    pub path: PathBuf,
}

/// Immutable description of an item, keyed by its code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub code: ItemCode,
    pub name: String,
    pub slot: EquipSlot,
    pub rarity: Rarity,
    /// Level required to equip
    pub required_level: u32,
    /// Only meaningful for weapons
    #[serde(default)]
    pub weapon_type: Option<WeaponType>,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    /// Attached by the catalog at registration, never persisted
    #[serde(skip)]
    pub icon: Option<IconRef>,
}

impl ItemDefinition {
    /// Create a definition. A weapon type on a non-weapon item is discarded.
    pub fn new(
        code: i32,
        name: impl Into<String>,
        slot: EquipSlot,
        rarity: Rarity,
        required_level: u32,
        weapon_type: Option<WeaponType>,
        attack: i32,
        defense: i32,
    ) -> Self {
        Self {
            code: ItemCode(code),
            name: name.into(),
            slot,
            rarity,
            required_level,
            weapon_type: if slot == EquipSlot::Weapon { weapon_type } else { None },
            attack,
            defense,
            icon: None,
        }
    }

    /// Copy with an icon attached
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Whether this item may be worn in `slot`
    pub fn fits(&self, slot: EquipSlot) -> bool {
        self.slot == slot
    }

    pub fn is_weapon(&self) -> bool {
        self.slot == EquipSlot::Weapon
    }
}
