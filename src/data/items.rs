//! Built-in item data
//!
//! The seed set every catalog starts from when no `items.ron` overrides it.

use serde::{Deserialize, Serialize};

use crate::items::{EquipSlot, ItemDefinition, Rarity};

/// Item definitions as stored in `items.ron`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTemplates {
    pub items: Vec<ItemDefinition>,
}

/// Codes equipped on every freshly created character: (slot, code)
pub const STARTER_EQUIPMENT: &[(EquipSlot, i32)] = &[
    (EquipSlot::Top, 0),
    (EquipSlot::Head, 3),
];

/// Codes placed in an empty equipment vault when the first character is created
pub const STARTER_VAULT: &[i32] = &[2, 1, 0];

/// The fixed seed set
pub fn default_seed_items() -> Vec<ItemDefinition> {
    vec![
        ItemDefinition::new(0, "Common Tunic", EquipSlot::Top, Rarity::Common, 1, None, 0, 1),
        ItemDefinition::new(1, "Rare Tunic", EquipSlot::Top, Rarity::Rare, 1, None, 0, 2),
        ItemDefinition::new(2, "Unique Tunic", EquipSlot::Top, Rarity::Unique, 1, None, 0, 3),
        ItemDefinition::new(3, "Common Helm", EquipSlot::Head, Rarity::Common, 1, None, 0, 1),
    ]
}

pub fn default_item_templates() -> ItemTemplates {
    ItemTemplates { items: default_seed_items() }
}
