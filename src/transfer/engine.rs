//! Drag-and-drop transfer rules
//!
//! Moves one item code between a vault position and a character's
//! equipment slot (or between two vault positions). Every successful move
//! is a swap with whatever occupied the destination, so the set of codes
//! in the game state never changes. A failed move changes nothing.

use std::fmt;

use thiserror::Error;

use crate::game::GameState;
use crate::items::{EquipSlot, ItemCatalog, ItemCode, ItemDefinition};

/// Somewhere an item can be dragged from or dropped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Position in the equipment vault
    Vault(usize),
    /// Slot on the character the request targets
    Equipment(EquipSlot),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Vault(index) => write!(f, "vault slot {}", index),
            Location::Equipment(slot) => write!(f, "{} slot", slot.name()),
        }
    }
}

/// One drag-release from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Character whose equipment is involved, if any
    pub character: Option<u32>,
    /// Code of the dragged item
    pub item: ItemCode,
    /// Where the drag started
    pub source: Option<Location>,
    /// Where it was released; `None` when released over nothing
    pub destination: Option<Location>,
}

impl TransferRequest {
    pub fn new(item: ItemCode, source: Location, destination: Location) -> Self {
        Self {
            character: None,
            item,
            source: Some(source),
            destination: Some(destination),
        }
    }

    pub fn for_character(mut self, number: u32) -> Self {
        self.character = Some(number);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    VaultToVault,
    EquipmentToVault,
    VaultToEquipment,
}

/// A move that was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub kind: TransferKind,
    /// The dragged code, now at the destination
    pub item: ItemCode,
    /// What the destination held before, now at the source
    pub displaced: ItemCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// State changed; the UI should redraw
    Applied(Transfer),
    /// Nothing changed; the dragged icon goes back where it came from
    Returned,
}

impl TransferOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransferOutcome::Applied(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("{item} is a {} item and cannot go in the {} slot", .item_slot.name(), .target.name())]
    SlotMismatch {
        item: ItemCode,
        item_slot: EquipSlot,
        target: EquipSlot,
    },
    #[error("item {0} is not in the catalog")]
    UnknownItem(ItemCode),
    #[error("expected {expected} at {location}, found {found}")]
    ItemNotAtSource {
        location: Location,
        expected: ItemCode,
        found: ItemCode,
    },
    /// The drag carried no source. Logged by `apply` like every rejection
    /// and also returned, so callers can tell it apart from a drop onto
    /// nothing (`TransferOutcome::Returned`).
    #[error("dragged item has no source location")]
    MissingSource,
    #[error("no character selected")]
    NoCharacterSelected,
    #[error("no character with number {0}")]
    NoSuchCharacter(u32),
    #[error("vault slot {index} is outside the vault (capacity {capacity})")]
    VaultIndexOutOfRange { index: usize, capacity: usize },
    #[error("the vault is full")]
    VaultFull,
    #[error("cannot move an item from {from} to {to}")]
    UnsupportedMove { from: Location, to: Location },
}

/// Applies transfer requests against a game state
pub struct TransferEngine<'a> {
    catalog: &'a ItemCatalog,
}

impl<'a> TransferEngine<'a> {
    pub fn new(catalog: &'a ItemCatalog) -> Self {
        Self { catalog }
    }

    /// Carry out a request. Rejected requests are logged and leave the
    /// state untouched.
    pub fn apply(&self, state: &mut GameState, request: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let result = self.try_apply(state, request);
        match &result {
            Ok(TransferOutcome::Applied(t)) => {
                log::info!("Transfer {:?}: {} in, {} out", t.kind, t.item, t.displaced);
            }
            Ok(TransferOutcome::Returned) => {
                log::debug!("Item {} returned to original position", request.item);
            }
            Err(e) => log::warn!("Transfer rejected: {}", e),
        }
        result
    }

    fn try_apply(&self, state: &mut GameState, request: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let Some(destination) = request.destination else {
            return Ok(TransferOutcome::Returned);
        };
        let source = request.source.ok_or(TransferError::MissingSource)?;
        let item = self.resolve(request.item)?;

        let found = self.code_at(state, request.character, source)?;
        if found != item.code {
            return Err(TransferError::ItemNotAtSource {
                location: source,
                expected: item.code,
                found,
            });
        }

        match (source, destination) {
            (Location::Vault(from), Location::Vault(to)) => {
                self.vault_to_vault(state, item.code, from, to)
            }
            (Location::Equipment(slot), Location::Vault(to)) => {
                let number = request.character.ok_or(TransferError::NoCharacterSelected)?;
                self.equipment_to_vault(state, number, item, slot, to)
            }
            (Location::Vault(from), Location::Equipment(slot)) => {
                let number = request.character.ok_or(TransferError::NoCharacterSelected)?;
                self.vault_to_equipment(state, number, item, from, slot)
            }
            (Location::Equipment(from), Location::Equipment(to)) => {
                if from == to {
                    Ok(TransferOutcome::Returned)
                } else if !item.fits(to) {
                    Err(mismatch(item, to))
                } else {
                    Err(TransferError::UnsupportedMove { from: source, to: destination })
                }
            }
        }
    }

    fn resolve(&self, code: ItemCode) -> Result<&'a ItemDefinition, TransferError> {
        self.catalog.lookup(code).ok_or(TransferError::UnknownItem(code))
    }

    /// Code currently stored at a location
    fn code_at(&self, state: &GameState, character: Option<u32>, location: Location) -> Result<ItemCode, TransferError> {
        match location {
            Location::Vault(index) => Self::check_vault_index(state, index),
            Location::Equipment(slot) => {
                let number = character.ok_or(TransferError::NoCharacterSelected)?;
                let record = state.character(number).ok_or(TransferError::NoSuchCharacter(number))?;
                Ok(record.equipped(slot))
            }
        }
    }

    /// Code at a vault position, or an error if the position is outside the vault
    fn check_vault_index(state: &GameState, index: usize) -> Result<ItemCode, TransferError> {
        state.equipment_vault.get(index).ok_or(TransferError::VaultIndexOutOfRange {
            index,
            capacity: state.equipment_vault.capacity(),
        })
    }

    /// Two-way swap between vault positions
    fn vault_to_vault(&self, state: &mut GameState, item: ItemCode, from: usize, to: usize) -> Result<TransferOutcome, TransferError> {
        let displaced = Self::check_vault_index(state, to)?;
        if from == to {
            return Ok(TransferOutcome::Returned);
        }
        state.equipment_vault.swap(from, to);
        Ok(TransferOutcome::Applied(Transfer {
            kind: TransferKind::VaultToVault,
            item,
            displaced,
        }))
    }

    /// The source slot is emptied first; whatever sat in the vault position
    /// is then worn in that slot, which requires it to fit.
    fn equipment_to_vault(
        &self,
        state: &mut GameState,
        number: u32,
        item: &ItemDefinition,
        slot: EquipSlot,
        to: usize,
    ) -> Result<TransferOutcome, TransferError> {
        let displaced = Self::check_vault_index(state, to)?;
        if let Some(code) = displaced.non_empty() {
            let occupant = self.resolve(code)?;
            if !occupant.fits(slot) {
                return Err(mismatch(occupant, slot));
            }
        }

        let record = state.characters.find_mut(number).ok_or(TransferError::NoSuchCharacter(number))?;
        record.equipment.clear(slot);
        state.equipment_vault.set(to, item.code);
        if !displaced.is_empty() {
            record.equipment.set(slot, displaced);
        }

        Ok(TransferOutcome::Applied(Transfer {
            kind: TransferKind::EquipmentToVault,
            item: item.code,
            displaced,
        }))
    }

    /// Equip from the vault; the previously worn item takes the vacated
    /// vault position
    fn vault_to_equipment(
        &self,
        state: &mut GameState,
        number: u32,
        item: &ItemDefinition,
        from: usize,
        slot: EquipSlot,
    ) -> Result<TransferOutcome, TransferError> {
        if !item.fits(slot) {
            return Err(mismatch(item, slot));
        }

        let record = state.characters.find_mut(number).ok_or(TransferError::NoSuchCharacter(number))?;
        let displaced = record.equipment.set(slot, item.code);
        state.equipment_vault.set(from, displaced);

        Ok(TransferOutcome::Applied(Transfer {
            kind: TransferKind::VaultToEquipment,
            item: item.code,
            displaced,
        }))
    }
}

fn mismatch(item: &ItemDefinition, target: EquipSlot) -> TransferError {
    TransferError::SlotMismatch {
        item: item.code,
        item_slot: item.slot,
        target,
    }
}
