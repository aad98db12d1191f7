//! Aggregate game state
//!
//! Everything a save file holds: progression, settings, the roster and
//! both vaults. Replaced wholesale on load, written wholesale on save.

use serde::{Deserialize, Serialize};

use crate::data::{GameConfig, DEFAULT_GEM_VAULT_CAPACITY, STARTER_VAULT};
use crate::items::{EquipSlot, ItemCode, Vault, DEFAULT_VAULT_CAPACITY};
use crate::roster::{CharacterRecord, Roster};
use super::difficulty::{Difficulty, GameMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Furthest stage reached
    pub stage: u32,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub characters: Roster,
    pub equipment_vault: Vault,
    pub skill_gem_vault: Vault,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_capacities(DEFAULT_VAULT_CAPACITY, DEFAULT_GEM_VAULT_CAPACITY)
    }
}

impl GameState {
    /// Fresh state sized by the config
    pub fn new(config: &GameConfig) -> Self {
        Self::with_capacities(config.vault_capacity, config.gem_vault_capacity)
    }

    pub fn with_capacities(vault_capacity: usize, gem_vault_capacity: usize) -> Self {
        Self {
            stage: 0,
            difficulty: Difficulty::default(),
            game_mode: GameMode::default(),
            characters: Roster::new(),
            equipment_vault: Vault::new(vault_capacity),
            skill_gem_vault: Vault::new(gem_vault_capacity),
        }
    }

    pub fn character(&self, number: u32) -> Option<&CharacterRecord> {
        self.characters.find(number)
    }

    /// Move on to the next stage, returning the new stage number
    pub fn advance_stage(&mut self) -> u32 {
        self.stage += 1;
        log::info!("Advanced to stage {}", self.stage);
        self.stage
    }

    /// Fill an empty equipment vault with the starter items.
    /// Returns `false` if the vault already held anything.
    pub fn seed_starter_vault(&mut self) -> bool {
        if !self.equipment_vault.is_empty() {
            return false;
        }
        log::info!("Adding default items to vault.");
        for &code in STARTER_VAULT {
            if self.equipment_vault.add(ItemCode(code)).is_none() {
                log::warn!("Vault full while adding starter item {}", code);
                break;
            }
        }
        true
    }

    /// Check what a damaged or hand-edited document can break: unique
    /// character numbers and vaults within their capacity
    pub fn validate(&self) -> Result<(), String> {
        if let Some(number) = self.characters.duplicate_number() {
            return Err(format!("character number {} appears more than once", number));
        }
        for (label, vault) in [("equipment vault", &self.equipment_vault), ("skill gem vault", &self.skill_gem_vault)] {
            if !vault.within_capacity() {
                return Err(format!(
                    "{} stores {} positions but its capacity is {}",
                    label,
                    vault.len(),
                    vault.capacity()
                ));
            }
        }
        Ok(())
    }

    /// Every non-empty equipment code in the state (equipped and vaulted),
    /// sorted. Transfers must leave this unchanged.
    pub fn equipment_codes(&self) -> Vec<ItemCode> {
        let mut codes: Vec<ItemCode> = self
            .characters
            .iter()
            .flat_map(|c| EquipSlot::all().iter().map(move |&slot| c.equipped(slot)))
            .chain(self.equipment_vault.codes().iter().copied())
            .filter(|code| !code.is_empty())
            .collect();
        codes.sort();
        codes
    }
}
