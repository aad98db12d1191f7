//! Equipment system
//!
//! Per-character equipped item codes and skill-gem sockets.

use serde::{Deserialize, Serialize};

use super::catalog::ItemCatalog;
use super::item::{EquipSlot, ItemCode, ItemDefinition};

/// Number of skill-gem sockets per character
pub const SKILL_GEM_SOCKETS: usize = 5;

/// One item code per body slot; `ItemCode::EMPTY` when nothing is worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: ItemCode,
    pub head: ItemCode,
    pub top: ItemCode,
    pub bottom: ItemCode,
    pub shoes: ItemCode,
    pub ring: ItemCode,
    pub necklace: ItemCode,
    pub bracelet: ItemCode,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            weapon: ItemCode::EMPTY,
            head: ItemCode::EMPTY,
            top: ItemCode::EMPTY,
            bottom: ItemCode::EMPTY,
            shoes: ItemCode::EMPTY,
            ring: ItemCode::EMPTY,
            necklace: ItemCode::EMPTY,
            bracelet: ItemCode::EMPTY,
        }
    }
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code worn in a slot
    pub fn get(&self, slot: EquipSlot) -> ItemCode {
        match slot {
            EquipSlot::Weapon => self.weapon,
            EquipSlot::Head => self.head,
            EquipSlot::Top => self.top,
            EquipSlot::Bottom => self.bottom,
            EquipSlot::Shoes => self.shoes,
            EquipSlot::Ring => self.ring,
            EquipSlot::Necklace => self.necklace,
            EquipSlot::Bracelet => self.bracelet,
        }
    }

    fn field_mut(&mut self, slot: EquipSlot) -> &mut ItemCode {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Head => &mut self.head,
            EquipSlot::Top => &mut self.top,
            EquipSlot::Bottom => &mut self.bottom,
            EquipSlot::Shoes => &mut self.shoes,
            EquipSlot::Ring => &mut self.ring,
            EquipSlot::Necklace => &mut self.necklace,
            EquipSlot::Bracelet => &mut self.bracelet,
        }
    }

    /// Put a code in a slot, returning the code that was there before.
    /// No slot-type check happens here; that is the transfer engine's job.
    pub fn set(&mut self, slot: EquipSlot, code: ItemCode) -> ItemCode {
        std::mem::replace(self.field_mut(slot), code)
    }

    /// Empty a slot, returning what it held
    pub fn clear(&mut self, slot: EquipSlot) -> ItemCode {
        self.set(slot, ItemCode::EMPTY)
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        self.get(slot).is_empty()
    }

    /// Empty every slot holding `code`. Returns how many slots were cleared.
    pub fn unequip_code(&mut self, code: ItemCode) -> usize {
        if code.is_empty() {
            return 0;
        }
        let mut cleared = 0;
        for &slot in EquipSlot::all() {
            if self.get(slot) == code {
                self.clear(slot);
                cleared += 1;
            }
        }
        cleared
    }

    /// Slot/code pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, ItemCode)> + '_ {
        EquipSlot::all().iter().map(move |&slot| (slot, self.get(slot)))
    }

    /// Resolve a slot through the catalog. Unknown codes read as empty.
    pub fn resolve<'a>(&self, slot: EquipSlot, catalog: &'a ItemCatalog) -> Option<&'a ItemDefinition> {
        catalog.lookup(self.get(slot))
    }

    /// Total attack of everything worn that the catalog knows about
    pub fn total_attack(&self, catalog: &ItemCatalog) -> i32 {
        self.iter()
            .filter_map(|(_, code)| catalog.lookup(code))
            .map(|item| item.attack)
            .sum()
    }

    /// Total defense of everything worn that the catalog knows about
    pub fn total_defense(&self, catalog: &ItemCatalog) -> i32 {
        self.iter()
            .filter_map(|(_, code)| catalog.lookup(code))
            .map(|item| item.defense)
            .sum()
    }
}

/// Skill-gem sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillGems([ItemCode; SKILL_GEM_SOCKETS]);

impl Default for SkillGems {
    fn default() -> Self {
        Self([ItemCode::EMPTY; SKILL_GEM_SOCKETS])
    }
}

impl SkillGems {
    pub fn get(&self, socket: usize) -> Option<ItemCode> {
        self.0.get(socket).copied()
    }

    /// Set a socket, returning the previous gem. `None` if the socket
    /// index is out of range.
    pub fn set(&mut self, socket: usize, code: ItemCode) -> Option<ItemCode> {
        self.0.get_mut(socket).map(|slot| std::mem::replace(slot, code))
    }

    pub fn as_slice(&self) -> &[ItemCode] {
        &self.0
    }

    /// Number of occupied sockets
    pub fn socketed(&self) -> usize {
        self.0.iter().filter(|code| !code.is_empty()).count()
    }
}

/// Equipment slot display info
impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "Weapon",
            EquipSlot::Head => "Head",
            EquipSlot::Top => "Top",
            EquipSlot::Bottom => "Bottom",
            EquipSlot::Shoes => "Shoes",
            EquipSlot::Ring => "Ring",
            EquipSlot::Necklace => "Necklace",
            EquipSlot::Bracelet => "Bracelet",
        }
    }

    /// Get all slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Weapon,
            EquipSlot::Head,
            EquipSlot::Top,
            EquipSlot::Bottom,
            EquipSlot::Shoes,
            EquipSlot::Ring,
            EquipSlot::Necklace,
            EquipSlot::Bracelet,
        ]
    }
}
