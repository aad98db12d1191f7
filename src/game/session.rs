//! Session controller
//!
//! Owns the catalog, the active game state and the save store for one play
//! session, and exposes the commands a front end issues. After every
//! successful mutation the registered observer is told to redraw.

use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;

use crate::data::{DataManager, GameConfig, STARTER_EQUIPMENT};
use crate::items::{scan_icon_dir, EquipSlot, ItemCatalog, ItemCode, ItemDefinition};
use crate::roster::{
    validate_name, CharacterDraft, CharacterError, CharacterRecord, Portrait, PortraitError, PortraitPool,
};
use crate::save::{SaveError, SaveStore, SaveSummary};
use crate::transfer::{Location, TransferEngine, TransferError, TransferOutcome, TransferRequest};
use super::difficulty::{Difficulty, GameMode};
use super::state::GameState;

/// Receives the "state changed, please redraw" notification
pub trait StateObserver {
    fn state_changed(&mut self, state: &GameState);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Character(#[from] CharacterError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Portrait(#[from] PortraitError),
}

/// Result of creating a character
#[derive(Debug, Clone)]
pub struct CreatedCharacter {
    pub number: u32,
    /// Where the autosave went; `None` if it failed (the character still exists)
    pub autosave: Option<PathBuf>,
}

pub struct Session {
    config: GameConfig,
    catalog: ItemCatalog,
    saves: SaveStore,
    portraits: PortraitPool,
    state: GameState,
    selected: Option<u32>,
    observer: Option<Box<dyn StateObserver>>,
}

impl Session {
    /// Assemble a session from already-built parts
    pub fn new(config: GameConfig, catalog: ItemCatalog, saves: SaveStore, portraits: PortraitPool) -> Self {
        let state = GameState::new(&config);
        Self {
            config,
            catalog,
            saves,
            portraits,
            state,
            selected: None,
            observer: None,
        }
    }

    /// Build everything from loaded data: catalog with icons, save store
    /// and stock portraits from the configured directories
    pub fn from_data(data: &DataManager) -> Self {
        let config = data.config().clone();

        let mut catalog = ItemCatalog::new();
        catalog.initialize(data.seed_items(), scan_icon_dir(&config.icon_dir));

        let saves = SaveStore::from_config(&config);
        log::info!("Save files are stored at: {}", saves.dir().display());

        let portraits = PortraitPool::load_dir(&config.portrait_dir);
        Self::new(config, catalog, saves, portraits)
    }

    pub fn set_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observer = Some(observer);
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed(&self.state);
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn saves(&self) -> &SaveStore {
        &self.saves
    }

    pub fn lookup(&self, code: ItemCode) -> Option<&ItemDefinition> {
        self.catalog.lookup(code)
    }

    // ---------------------------------------------------------------------
    // Characters
    // ---------------------------------------------------------------------

    pub fn selected_number(&self) -> Option<u32> {
        self.selected
    }

    /// The selected character, if it still exists
    pub fn selected_character(&self) -> Option<&CharacterRecord> {
        self.selected.and_then(|n| self.state.character(n))
    }

    pub fn select_character(&mut self, number: u32) -> Result<(), SessionError> {
        if self.state.character(number).is_none() {
            return Err(CharacterError::NoSuchCharacter(number).into());
        }
        self.selected = Some(number);
        self.notify();
        Ok(())
    }

    /// Create a character from the creation screen, give it starter gear,
    /// stock the vault if it is empty, select it and autosave
    pub fn create_character(&mut self, draft: CharacterDraft) -> Result<CreatedCharacter, SessionError> {
        let name = validate_name(&draft.name)?;
        let portrait = draft.portrait.ok_or(CharacterError::MissingPortrait)?;

        let number = self.state.characters.next_number()?;
        let mut character = CharacterRecord::new(number, name, draft.race, draft.class).with_portrait(portrait);
        for &(slot, code) in STARTER_EQUIPMENT {
            character.equipment.set(slot, ItemCode(code));
        }
        let name = character.name.clone();

        self.state.characters.add(character, self.config.max_characters)?;
        self.state.difficulty = draft.difficulty;
        self.state.game_mode = draft.game_mode;
        self.state.seed_starter_vault();
        self.selected = Some(number);
        log::info!("Character created: {}", name);

        let autosave = match self.saves.autosave(&name, &self.state) {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Autosave after creating {} failed: {}", name, e);
                None
            }
        };

        self.notify();
        Ok(CreatedCharacter { number, autosave })
    }

    /// Add a random recruit with a stock portrait
    pub fn recruit_random<R: Rng>(&mut self, rng: &mut R) -> Result<u32, SessionError> {
        let number = self
            .state
            .characters
            .recruit_random(rng, &self.portraits, self.config.max_characters)?
            .number;
        self.notify();
        Ok(number)
    }

    pub fn rename_character(&mut self, number: u32, name: &str) -> Result<(), SessionError> {
        self.state.characters.rename(number, name)?;
        self.notify();
        Ok(())
    }

    /// Replace a portrait with an uploaded image (resized before storing)
    pub fn upload_portrait(&mut self, number: u32, image_bytes: &[u8]) -> Result<(), SessionError> {
        let portrait = Portrait::from_upload(image_bytes)?;
        self.state.characters.set_portrait(number, portrait)?;
        self.notify();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Equipment and vault
    // ---------------------------------------------------------------------

    /// Apply a drag-release for the selected character
    pub fn request_transfer(
        &mut self,
        item: ItemCode,
        source: Option<Location>,
        destination: Option<Location>,
    ) -> Result<TransferOutcome, SessionError> {
        let request = TransferRequest {
            character: self.selected,
            item,
            source,
            destination,
        };
        let outcome = TransferEngine::new(&self.catalog).apply(&mut self.state, &request)?;
        if outcome.is_applied() {
            self.notify();
        }
        Ok(outcome)
    }

    /// Take every copy of `code` off the selected character and put it in
    /// the vault. Fails without changes if the vault lacks room.
    pub fn unequip_code(&mut self, code: ItemCode) -> Result<usize, SessionError> {
        let number = self.selected.ok_or(TransferError::NoCharacterSelected)?;
        let character = self.state.character(number).ok_or(TransferError::NoSuchCharacter(number))?;

        let worn = character.equipment.iter().filter(|&(_, c)| c == code && !c.is_empty()).count();
        if worn == 0 {
            return Ok(0);
        }
        if self.state.equipment_vault.free() < worn {
            return Err(TransferError::VaultFull.into());
        }

        // Stage the vault first so a failed add leaves everything untouched
        let mut vault = self.state.equipment_vault.clone();
        for _ in 0..worn {
            vault.add(code).ok_or(TransferError::VaultFull)?;
        }

        let character = self.state.characters.find_mut(number).ok_or(TransferError::NoSuchCharacter(number))?;
        character.equipment.unequip_code(code);
        self.state.equipment_vault = vault;
        self.notify();
        Ok(worn)
    }

    /// Selected character's slots resolved through the catalog
    pub fn equipped_items(&self) -> Vec<(EquipSlot, Option<&ItemDefinition>)> {
        match self.selected_character() {
            Some(character) => character
                .equipment
                .iter()
                .map(|(slot, code)| (slot, self.catalog.lookup(code)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every vault position up to capacity, resolved through the catalog.
    /// Empty positions and unknown codes are `None`.
    pub fn vault_items(&self) -> Vec<Option<&ItemDefinition>> {
        let vault = &self.state.equipment_vault;
        (0..vault.capacity())
            .map(|i| vault.get(i).and_then(|code| self.catalog.lookup(code)))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Progression
    // ---------------------------------------------------------------------

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
        self.notify();
    }

    pub fn set_game_mode(&mut self, game_mode: GameMode) {
        self.state.game_mode = game_mode;
        self.notify();
    }

    pub fn advance_stage(&mut self) -> u32 {
        let stage = self.state.advance_stage();
        self.notify();
        stage
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    pub fn request_save(&self, name: &str) -> Result<PathBuf, SessionError> {
        Ok(self.saves.save_game(name, &self.state)?)
    }

    /// Replace the active state with a saved one. `Ok(None)` when no such
    /// save exists; the active state is then left as it was.
    pub fn request_load(&mut self, name: &str) -> Result<Option<&GameState>, SessionError> {
        let Some(state) = self.saves.load_game(name)? else {
            return Ok(None);
        };
        self.replace_state(state);
        Ok(Some(&self.state))
    }

    /// Load a save, or start from a fresh state if it does not exist.
    /// Returns whether a save was loaded.
    pub fn load_or_default(&mut self, name: &str) -> Result<bool, SessionError> {
        match self.saves.load_game(name)? {
            Some(state) => {
                self.replace_state(state);
                Ok(true)
            }
            None => {
                self.replace_state(GameState::new(&self.config));
                Ok(false)
            }
        }
    }

    fn replace_state(&mut self, state: GameState) {
        self.state = state;
        if let Some(number) = self.selected {
            if self.state.character(number).is_none() {
                self.selected = None;
            }
        }
        self.notify();
    }

    pub fn list_saves(&self) -> Result<Vec<SaveSummary>, SessionError> {
        Ok(self.saves.list_saves()?)
    }

    pub fn delete_save(&self, name: &str) -> Result<bool, SessionError> {
        Ok(self.saves.delete_save(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    use crate::data::default_seed_items;
    use crate::roster::{Class, Race};

    struct Counter(Rc<Cell<usize>>);

    impl StateObserver for Counter {
        fn state_changed(&mut self, _state: &GameState) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn session() -> (TempDir, Session, Rc<Cell<usize>>) {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::with_save_dir(dir.path().join("saves"));
        let catalog = ItemCatalog::with_items(&default_seed_items());
        let saves = SaveStore::from_config(&config);
        let mut portraits = PortraitPool::new();
        for &race in Race::all() {
            portraits.add(race, Portrait::from_png(vec![1, 2, 3]));
        }
        let mut session = Session::new(config, catalog, saves, portraits);
        let count = Rc::new(Cell::new(0));
        session.set_observer(Box::new(Counter(count.clone())));
        (dir, session, count)
    }

    fn draft(name: &str) -> CharacterDraft {
        CharacterDraft::new(name)
            .race(Race::Dragonborn)
            .class(Class::Priest)
            .portrait(Portrait::from_png(vec![9, 9]))
            .difficulty(Difficulty::Hard)
            .game_mode(GameMode::Hardcore)
    }

    #[test]
    fn test_create_character() {
        let (_dir, mut session, count) = session();
        let created = session.create_character(draft("Aria")).unwrap();

        assert_eq!(created.number, 0);
        assert_eq!(session.selected_number(), Some(0));
        let c = session.selected_character().unwrap();
        assert_eq!(c.equipped(EquipSlot::Top), ItemCode(0));
        assert_eq!(c.equipped(EquipSlot::Head), ItemCode(3));
        assert_eq!(session.state().difficulty, Difficulty::Hard);
        assert_eq!(session.state().game_mode, GameMode::Hardcore);
        assert_eq!(session.state().equipment_vault.codes(), &[ItemCode(2), ItemCode(1), ItemCode(0)]);

        let path = created.autosave.unwrap();
        assert!(path.ends_with("Aria_autoSave.json"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_second_character_does_not_restock_vault() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        let second = session.create_character(draft("Brom")).unwrap();
        assert_eq!(second.number, 1);
        assert_eq!(session.state().equipment_vault.count(), 3);
        assert_eq!(session.state().characters.len(), 2);
    }

    #[test]
    fn test_create_character_validation() {
        let (_dir, mut session, count) = session();
        let err = session.create_character(draft("   ")).unwrap_err();
        assert!(matches!(err, SessionError::Character(CharacterError::EmptyName)));

        let err = session.create_character(CharacterDraft::new("NoFace")).unwrap_err();
        assert!(matches!(err, SessionError::Character(CharacterError::MissingPortrait)));

        assert!(session.state().characters.is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_create_character_survives_full_save_dir() {
        let (_dir, mut session, _) = session();
        for i in 0..session.config().max_save_files {
            session.request_save(&format!("slot{}", i)).unwrap();
        }
        let created = session.create_character(draft("Late")).unwrap();
        assert!(created.autosave.is_none());
        assert!(session.state().character(created.number).is_some());
    }

    #[test]
    fn test_equip_scenario() {
        let (_dir, mut session, count) = session();
        session.create_character(draft("Aria")).unwrap();
        // wear the unique top (code 2) from vault slot 0; the common top goes there
        session
            .request_transfer(ItemCode(2), Some(Location::Vault(0)), Some(Location::Equipment(EquipSlot::Top)))
            .unwrap();
        assert_eq!(session.selected_character().unwrap().equipped(EquipSlot::Top), ItemCode(2));
        assert_eq!(session.state().equipment_vault.get(0), Some(ItemCode(0)));

        // vault slot 2 holds code 0 as well; drag it onto the top slot
        let outcome = session
            .request_transfer(ItemCode(0), Some(Location::Vault(2)), Some(Location::Equipment(EquipSlot::Top)))
            .unwrap();
        assert!(outcome.is_applied());
        assert_eq!(session.selected_character().unwrap().equipped(EquipSlot::Top), ItemCode(0));
        assert_eq!(session.state().equipment_vault.get(2), Some(ItemCode(2)));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_rejected_transfer_does_not_notify() {
        let (_dir, mut session, count) = session();
        session.create_character(draft("Aria")).unwrap();
        let before = session.state().clone();

        let err = session
            .request_transfer(ItemCode(2), Some(Location::Vault(0)), Some(Location::Equipment(EquipSlot::Head)))
            .unwrap_err();
        assert!(matches!(err, SessionError::Transfer(TransferError::SlotMismatch { .. })));
        assert_eq!(session.state(), &before);

        let outcome = session.request_transfer(ItemCode(2), Some(Location::Vault(0)), None).unwrap();
        assert_eq!(outcome, TransferOutcome::Returned);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        session.advance_stage();
        let saved = session.state().clone();
        session.request_save("X").unwrap();

        session.advance_stage();
        session.set_difficulty(Difficulty::Easy);
        let loaded = session.request_load("X").unwrap().unwrap();
        assert_eq!(loaded, &saved);
    }

    #[test]
    fn test_load_nonexistent_keeps_state() {
        let (_dir, mut session, count) = session();
        session.create_character(draft("Aria")).unwrap();
        let before = session.state().clone();
        let notified = count.get();

        assert!(session.request_load("nonexistent").unwrap().is_none());
        assert_eq!(session.state(), &before);
        assert_eq!(session.selected_number(), Some(0));
        assert_eq!(count.get(), notified);
    }

    #[test]
    fn test_load_or_default() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();

        assert!(!session.load_or_default("nothing").unwrap());
        assert!(session.state().characters.is_empty());
        assert_eq!(session.selected_number(), None);

        assert!(session.load_or_default("Aria_autoSave").unwrap());
        assert_eq!(session.state().characters.len(), 1);
    }

    #[test]
    fn test_list_and_delete_saves() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        session.request_save("manual").unwrap();

        let names: Vec<String> = session.list_saves().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Aria_autoSave".to_string(), "manual".to_string()]);

        assert!(session.delete_save("manual").unwrap());
        assert!(!session.delete_save("manual").unwrap());
        assert_eq!(session.list_saves().unwrap().len(), 1);
    }

    #[test]
    fn test_select_character() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        session.create_character(draft("Brom")).unwrap();

        session.select_character(0).unwrap();
        assert_eq!(session.selected_character().unwrap().name, "Aria");
        assert!(matches!(
            session.select_character(7),
            Err(SessionError::Character(CharacterError::NoSuchCharacter(7)))
        ));
        assert_eq!(session.selected_number(), Some(0));
    }

    #[test]
    fn test_recruit_random() {
        let (_dir, mut session, count) = session();
        let mut rng = StdRng::seed_from_u64(3);
        let number = session.recruit_random(&mut rng).unwrap();
        assert_eq!(number, 0);
        assert_eq!(session.state().character(0).unwrap().name, "Character0");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_roster_limit() {
        let (_dir, mut session, _) = session();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..session.config().max_characters {
            session.recruit_random(&mut rng).unwrap();
        }
        let err = session.recruit_random(&mut rng).unwrap_err();
        assert!(matches!(err, SessionError::Character(CharacterError::RosterFull { max: 16 })));
    }

    #[test]
    fn test_unequip_code() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();

        assert_eq!(session.unequip_code(ItemCode(3)).unwrap(), 1);
        assert!(session.selected_character().unwrap().equipment.is_empty(EquipSlot::Head));
        assert_eq!(session.state().equipment_vault.count_of(ItemCode(3)), 1);
        assert_eq!(session.unequip_code(ItemCode(3)).unwrap(), 0);
    }

    #[test]
    fn test_unequip_code_into_full_vault() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        while session.state.equipment_vault.add(ItemCode(1)).is_some() {}
        let before = session.state().clone();

        let err = session.unequip_code(ItemCode(3)).unwrap_err();
        assert!(matches!(err, SessionError::Transfer(TransferError::VaultFull)));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_load_overfull_vault_is_corrupt() {
        let (_dir, mut session, _) = session();
        let path = session.create_character(draft("Aria")).unwrap().autosave.unwrap();

        let mut doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["state"]["equipment_vault"]["capacity"] = serde_json::json!(2);
        std::fs::write(&path, doc.to_string()).unwrap();

        let before = session.state().clone();
        let err = session.request_load("Aria_autoSave").unwrap_err();
        assert!(matches!(err, SessionError::Save(SaveError::Corrupt { .. })));
        assert_eq!(session.state(), &before);

        // the active state still unequips normally
        assert_eq!(session.unequip_code(ItemCode(3)).unwrap(), 1);
    }

    #[test]
    fn test_views_resolve_through_catalog() {
        let (_dir, mut session, _) = session();
        assert!(session.equipped_items().is_empty());
        session.create_character(draft("Aria")).unwrap();

        let equipped = session.equipped_items();
        assert_eq!(equipped.len(), 8);
        assert_eq!(equipped[2].1.unwrap().name, "Common Tunic");
        assert!(equipped[0].1.is_none());

        let vault = session.vault_items();
        assert_eq!(vault.len(), session.state().equipment_vault.capacity());
        assert_eq!(vault[0].unwrap().code, ItemCode(2));
        assert!(vault[3].is_none());
    }

    #[test]
    fn test_rename_and_upload_portrait() {
        let (_dir, mut session, _) = session();
        session.create_character(draft("Aria")).unwrap();
        session.rename_character(0, "Arianne").unwrap();
        assert_eq!(session.selected_character().unwrap().name, "Arianne");

        let err = session.upload_portrait(0, b"garbage").unwrap_err();
        assert!(matches!(err, SessionError::Portrait(_)));
    }
}
