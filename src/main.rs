//! Guildvault - Entry Point
//!
//! Small command-line front end over a `Session`: list and inspect saves,
//! create or recruit characters, and move items between vault and gear.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use guildvault::data::{export_default_data, DataManager, DEFAULT_DATA_DIR};
use guildvault::game::{GameState, Session, SessionError, StateObserver};
use guildvault::items::{EquipSlot, ItemCode};
use guildvault::roster::{CharacterDraft, Class, Portrait, Race};
use guildvault::save::SaveError;
use guildvault::transfer::Location;

const USAGE: &str = "\
usage: guildvault <command> [args]

  list                                   list save files
  show <save>                            print roster and vault of a save
  new <name> <race> <class> <portrait>   create a character (autosaves)
  recruit <save>                         add a random character to a save
  move <save> <char#> <item> <from> <to> move an item; locations are
                                         `vault:N` or a slot name
  delete <save>                          delete a save file
  export-data [dir]                      write default data files";

/// Logs every redraw request; a graphical front end would repaint here
struct LogObserver;

impl StateObserver for LogObserver {
    fn state_changed(&mut self, state: &GameState) {
        log::debug!(
            "State changed: {} characters, {} items in vault",
            state.characters.len(),
            state.equipment_vault.count()
        );
    }
}

fn main() -> Result<()> {
    // Log to a file so command output stays clean
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("guildvault.log")
        .context("could not open guildvault.log")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .target(env_logger::Target::Pipe(Box::new(log_file)))
    .init();

    log::info!("Starting Guildvault v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = run(&args);

    if let Err(ref e) = result {
        log::error!("Command failed: {:#}", e);
    }
    result
}

fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    if command == "export-data" {
        let dir = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DATA_DIR);
        let written = export_default_data(Path::new(dir)).map_err(|e| anyhow!(e))?;
        for path in written {
            println!("wrote {}", path.display());
        }
        return Ok(());
    }

    let data = DataManager::load_from(Path::new(DEFAULT_DATA_DIR));
    let mut session = Session::from_data(&data);
    session.set_observer(Box::new(LogObserver));

    match (command.as_str(), &args[1..]) {
        ("list", []) => {
            for save in session.list_saves()? {
                println!("{:<24} {}", save.name, save.display_timestamp());
            }
        }
        ("show", [save]) => {
            load(&mut session, save)?;
            print_state(&session);
        }
        ("new", [name, race, class, portrait]) => {
            let race = parse_race(race)?;
            let class = parse_class(class)?;
            let bytes = fs::read(portrait).with_context(|| format!("could not read {}", portrait))?;
            let draft = CharacterDraft::new(name.as_str())
                .race(race)
                .class(class)
                .portrait(Portrait::from_upload(&bytes)?);

            let created = session.create_character(draft)?;
            match created.autosave {
                Some(path) => println!("created #{}, saved to {}", created.number, path.display()),
                None => println!("created #{} (autosave failed, see log)", created.number),
            }
        }
        ("recruit", [save]) => {
            load(&mut session, save)?;
            let number = session.recruit_random(&mut rand::thread_rng())?;
            write_back(&session, save)?;
            if let Some(c) = session.state().character(number) {
                println!("recruited {}", c.summary());
            }
        }
        ("move", [save, number, item, from, to]) => {
            load(&mut session, save)?;
            session.select_character(number.parse().context("character number")?)?;
            let item = ItemCode(item.parse().context("item code")?);
            let outcome = session.request_transfer(item, Some(parse_location(from)?), Some(parse_location(to)?))?;
            if outcome.is_applied() {
                write_back(&session, save)?;
                println!("moved {} from {} to {}", item, from, to);
            } else {
                println!("nothing to do");
            }
        }
        ("delete", [save]) => {
            if session.delete_save(save)? {
                println!("deleted {}", save);
            } else {
                println!("no save named {}", save);
            }
        }
        _ => bail!("unrecognised command\n\n{}", USAGE),
    }

    Ok(())
}

fn load(session: &mut Session, save: &str) -> Result<()> {
    if session.request_load(save)?.is_none() {
        bail!("no save named {}", save);
    }
    Ok(())
}

/// Store the modified state under its save name. The file ceiling applies
/// to existing names too, so a full directory is reported instead.
fn write_back(session: &Session, save: &str) -> Result<()> {
    match session.request_save(save) {
        Ok(_) => Ok(()),
        Err(SessionError::Save(SaveError::LimitReached { max })) => {
            bail!("{} saves already exist (the maximum); delete one before updating {}", max, save)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_state(session: &Session) {
    let state = session.state();
    println!(
        "stage {} | {} | {}",
        state.stage,
        state.difficulty.name(),
        state.game_mode.name()
    );

    for character in state.characters.iter() {
        println!("{}", character.summary());
        for (slot, code) in character.equipment.iter() {
            if let Some(item) = session.lookup(code) {
                println!("  {:<9} {} ({})", slot.name(), item.name, item.rarity.name());
            }
        }
    }

    println!("vault:");
    for (index, code) in state.equipment_vault.occupied() {
        let name = session.lookup(code).map_or("unknown item", |item| item.name.as_str());
        println!("  {:>3} {} {}", index, code, name);
    }
}

fn parse_race(s: &str) -> Result<Race> {
    Race::all()
        .iter()
        .copied()
        .find(|race| race.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| anyhow!("unknown race {}", s))
}

fn parse_class(s: &str) -> Result<Class> {
    Class::all()
        .iter()
        .copied()
        .find(|class| class.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| anyhow!("unknown class {}", s))
}

fn parse_location(s: &str) -> Result<Location> {
    if let Some(index) = s.strip_prefix("vault:") {
        return Ok(Location::Vault(index.parse().context("vault index")?));
    }
    EquipSlot::all()
        .iter()
        .copied()
        .find(|slot| slot.name().eq_ignore_ascii_case(s))
        .map(Location::Equipment)
        .ok_or_else(|| anyhow!("unknown location {}", s))
}
