//! Character records
//!
//! Identity, race/class, level, equipped codes and skill gems of one
//! guild member.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Difficulty, GameMode};
use crate::items::{EquipSlot, Equipment, ItemCode, SkillGems};
use super::portrait::Portrait;

/// Playable races
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Orc,
    Undead,
    Dragonborn,
}

impl Race {
    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Orc => "Orc",
            Race::Undead => "Undead",
            Race::Dragonborn => "Dragonborn",
        }
    }

    pub fn all() -> &'static [Race] {
        &[Race::Human, Race::Elf, Race::Orc, Race::Undead, Race::Dragonborn]
    }

    pub fn random<R: Rng>(rng: &mut R) -> Race {
        let all = Self::all();
        all[rng.gen_range(0..all.len())]
    }
}

/// Playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Warrior,
    Ranger,
    Caster,
    Priest,
}

impl Class {
    pub fn name(&self) -> &'static str {
        match self {
            Class::Warrior => "Warrior",
            Class::Ranger => "Ranger",
            Class::Caster => "Caster",
            Class::Priest => "Priest",
        }
    }

    pub fn all() -> &'static [Class] {
        &[Class::Warrior, Class::Ranger, Class::Caster, Class::Priest]
    }

    pub fn random<R: Rng>(rng: &mut R) -> Class {
        let all = Self::all();
        all[rng.gen_range(0..all.len())]
    }
}

/// A guild member as stored in the save document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Unique within one game state
    pub number: u32,
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub level: u32,
    pub equipment: Equipment,
    pub skill_gems: SkillGems,
    pub portrait: Portrait,
}

impl CharacterRecord {
    /// Level 1 character with nothing equipped
    pub fn new(number: u32, name: impl Into<String>, race: Race, class: Class) -> Self {
        Self {
            number,
            name: name.into(),
            race,
            class,
            level: 1,
            equipment: Equipment::new(),
            skill_gems: SkillGems::default(),
            portrait: Portrait::default(),
        }
    }

    pub fn with_portrait(mut self, portrait: Portrait) -> Self {
        self.portrait = portrait;
        self
    }

    /// Code worn in a slot
    pub fn equipped(&self, slot: EquipSlot) -> ItemCode {
        self.equipment.get(slot)
    }

    /// One-line description for listings
    pub fn summary(&self) -> String {
        format!("#{} {} - Lv.{} {} {}", self.number, self.name, self.level, self.race.name(), self.class.name())
    }
}

/// Everything the creation screen collects before a character exists
#[derive(Debug, Clone)]
pub struct CharacterDraft {
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub portrait: Option<Portrait>,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
}

impl CharacterDraft {
    /// Draft with the creation screen's default selections
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            race: Race::Human,
            class: Class::Warrior,
            portrait: None,
            difficulty: Difficulty::Normal,
            game_mode: GameMode::Softcore,
        }
    }

    pub fn race(mut self, race: Race) -> Self {
        self.race = race;
        self
    }

    pub fn class(mut self, class: Class) -> Self {
        self.class = class;
        self
    }

    pub fn portrait(mut self, portrait: Portrait) -> Self {
        self.portrait = Some(portrait);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn game_mode(mut self, game_mode: GameMode) -> Self {
        self.game_mode = game_mode;
        self
    }
}
