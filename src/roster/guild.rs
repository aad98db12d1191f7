//! Guild roster
//!
//! The ordered list of characters in one game state, keyed by character
//! number.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::character::{CharacterRecord, Class, Race};
use super::portrait::{Portrait, PortraitPool};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("character name cannot be empty")]
    EmptyName,
    #[error("no portrait selected")]
    MissingPortrait,
    #[error("no portrait available for race {}", .0.name())]
    NoPortraitForRace(Race),
    #[error("character limit of {max} reached")]
    RosterFull { max: usize },
    #[error("character number {0} is already taken")]
    DuplicateNumber(u32),
    #[error("no character with number {0}")]
    NoSuchCharacter(u32),
    #[error("no character numbers left")]
    NumbersExhausted,
}

/// Trimmed name, or `EmptyName` if nothing is left
pub fn validate_name(name: &str) -> Result<String, CharacterError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CharacterError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Characters of one game state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    characters: Vec<CharacterRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.characters.iter()
    }

    /// Number the next character should get: one past the highest in use
    pub fn next_number(&self) -> Result<u32, CharacterError> {
        match self.characters.iter().map(|c| c.number).max() {
            None => Ok(0),
            Some(highest) => highest.checked_add(1).ok_or(CharacterError::NumbersExhausted),
        }
    }

    /// First character number that appears more than once
    pub fn duplicate_number(&self) -> Option<u32> {
        let mut seen = HashSet::new();
        self.characters.iter().map(|c| c.number).find(|&n| !seen.insert(n))
    }

    /// Append a character, enforcing unique numbers and the roster limit
    pub fn add(&mut self, character: CharacterRecord, max: usize) -> Result<(), CharacterError> {
        if self.characters.len() >= max {
            log::warn!("Character limit reached. Cannot add {}", character.name);
            return Err(CharacterError::RosterFull { max });
        }
        if self.find(character.number).is_some() {
            return Err(CharacterError::DuplicateNumber(character.number));
        }
        log::info!("Added character {}", character.summary());
        self.characters.push(character);
        Ok(())
    }

    pub fn find(&self, number: u32) -> Option<&CharacterRecord> {
        self.characters.iter().find(|c| c.number == number)
    }

    pub fn find_mut(&mut self, number: u32) -> Option<&mut CharacterRecord> {
        self.characters.iter_mut().find(|c| c.number == number)
    }

    pub fn rename(&mut self, number: u32, name: &str) -> Result<(), CharacterError> {
        let name = validate_name(name)?;
        let character = self.find_mut(number).ok_or(CharacterError::NoSuchCharacter(number))?;
        log::info!("Renamed character {} from {} to {}", number, character.name, name);
        character.name = name;
        Ok(())
    }

    pub fn set_portrait(&mut self, number: u32, portrait: Portrait) -> Result<(), CharacterError> {
        let character = self.find_mut(number).ok_or(CharacterError::NoSuchCharacter(number))?;
        character.portrait = portrait;
        Ok(())
    }

    /// Build and add a character with random race and class, named after
    /// its number, wearing a random stock portrait for its race
    pub fn recruit_random<R: Rng>(
        &mut self,
        rng: &mut R,
        portraits: &PortraitPool,
        max: usize,
    ) -> Result<&CharacterRecord, CharacterError> {
        if self.characters.len() >= max {
            log::warn!("Character limit reached. Cannot generate more characters.");
            return Err(CharacterError::RosterFull { max });
        }

        let number = self.next_number()?;
        let race = Race::random(rng);
        let class = Class::random(rng);
        let portrait = portraits
            .random_for(race, rng)
            .cloned()
            .ok_or(CharacterError::NoPortraitForRace(race))?;

        let character = CharacterRecord::new(number, format!("Character{}", number), race, class)
            .with_portrait(portrait);
        self.add(character, max)?;

        // just pushed
        Ok(&self.characters[self.characters.len() - 1])
    }
}
