//! tirage core - shared data model and draw history storage
//!
//! Participants, pots, groups and draw results live here, together with the
//! SQLite-backed history that finished draws are handed to.

pub mod error;
pub mod storage;
pub mod types;

pub use error::{Result, TirageError};
pub use storage::{DrawRepository, DrawStore, Storage};
pub use types::{
    DrawConfig, DrawMode, DrawResult, Group, NamingFormat, Participant, Pot, MAX_GROUPS,
    MAX_LETTER_GROUPS, MAX_PER_GROUP, MIN_GROUPS, MIN_PARTICIPANTS, MIN_PER_GROUP, MIN_POTS,
};
