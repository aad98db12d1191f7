//! Game module - session state, settings and the command surface

mod difficulty;
mod session;
mod state;

pub use difficulty::{Difficulty, GameMode};
pub use session::{CreatedCharacter, Session, SessionError, StateObserver};
pub use state::GameState;
