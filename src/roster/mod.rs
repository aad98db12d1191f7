//! Guild roster: characters, portraits and recruiting

pub mod character;
pub mod portrait;
pub mod guild;

pub use character::{CharacterRecord, CharacterDraft, Race, Class};
pub use portrait::{Portrait, PortraitPool, PortraitError, PORTRAIT_SIZE};
pub use guild::{Roster, CharacterError, validate_name};
