use thiserror::Error;
use uuid::Uuid;

use crate::validation::ConfigError;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("tirage core error: {0}")]
    Core(#[from] tirage_core::TirageError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("A participant named \"{0}\" is already in the draw")]
    DuplicateParticipant(String),

    #[error("Participant name cannot be empty")]
    EmptyName,

    #[error("Participant not found: {0}")]
    ParticipantNotFound(Uuid),

    #[error("Pot not found: {0}")]
    PotNotFound(usize),
}
