//! Drawability checks for a [`DrawConfig`].
//!
//! Rules run in a fixed order and stop at the first failure, so the most
//! fundamental problem is the one reported:
//!
//! 1. participant count
//! 2. group count range
//! 3. group size range
//! 4. total capacity
//! 5. naming format constraints
//! 6. pot constraints (pots mode only)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tirage_core::{
    DrawConfig, DrawMode, NamingFormat, MAX_GROUPS, MAX_LETTER_GROUPS, MAX_PER_GROUP, MIN_GROUPS,
    MIN_PARTICIPANTS, MIN_PER_GROUP, MIN_POTS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A draw needs a minimum {} participants (currently {count})", MIN_PARTICIPANTS)]
    TooFewParticipants { count: usize },

    #[error("Number of groups must be between {} and {} (got {count})", MIN_GROUPS, MAX_GROUPS)]
    GroupCountOutOfRange { count: usize },

    #[error(
        "Participants per group must be between {} and {} (got {size})",
        MIN_PER_GROUP,
        MAX_PER_GROUP
    )]
    GroupSizeOutOfRange { size: usize },

    #[error(
        "Not enough places: {groups} groups x {per_group} = {capacity} places for {participants} participants"
    )]
    InsufficientCapacity {
        groups: usize,
        per_group: usize,
        capacity: usize,
        participants: usize,
    },

    #[error("A-Z naming supports at most {} groups (got {count})", MAX_LETTER_GROUPS)]
    TooManyLetterGroups { count: usize },

    #[error("1-30 naming supports at most {} groups (got {count})", MAX_GROUPS)]
    TooManyNumberedGroups { count: usize },

    #[error("Custom naming needs {needed} group names ({provided} provided)")]
    MissingCustomNames { needed: usize, provided: usize },

    #[error("Custom group name #{position} is blank")]
    BlankCustomName { position: usize },

    #[error("Custom group name \"{name}\" is used more than once")]
    DuplicateCustomName { name: String },

    #[error("Pots mode needs at least {} pots (got {count})", MIN_POTS)]
    TooFewPots { count: usize },

    #[error("{name} is empty")]
    EmptyPot { name: String },

    #[error(
        "All pots must hold the same number of participants: {reference} has {expected}, {name} has {size}"
    )]
    UnequalPots {
        reference: String,
        expected: usize,
        name: String,
        size: usize,
    },

    #[error(
        "{name} has {size} participants but there are {groups} groups; each pot needs at least one participant per group"
    )]
    PotSmallerThanGroupCount {
        name: String,
        size: usize,
        groups: usize,
    },
}

/// Outcome of [`validate_config`], in the `{ valid, error }` shape callers
/// display or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(err: &ConfigError) -> Self {
        Self {
            valid: false,
            error: Some(err.to_string()),
        }
    }
}

pub fn validate_config(config: &DrawConfig) -> ValidationReport {
    match check_config(config) {
        Ok(()) => ValidationReport::valid(),
        Err(err) => ValidationReport::invalid(&err),
    }
}

/// Typed form of [`validate_config`]; returns the first violated rule.
pub fn check_config(config: &DrawConfig) -> Result<(), ConfigError> {
    let participants = config.entrant_count();
    let groups = config.number_of_groups;
    let per_group = config.participants_per_group;

    if participants < MIN_PARTICIPANTS {
        return Err(ConfigError::TooFewParticipants {
            count: participants,
        });
    }

    if !(MIN_GROUPS..=MAX_GROUPS).contains(&groups) {
        return Err(ConfigError::GroupCountOutOfRange { count: groups });
    }

    if !(MIN_PER_GROUP..=MAX_PER_GROUP).contains(&per_group) {
        return Err(ConfigError::GroupSizeOutOfRange { size: per_group });
    }

    let capacity = config.capacity();
    if capacity < participants {
        return Err(ConfigError::InsufficientCapacity {
            groups,
            per_group,
            capacity,
            participants,
        });
    }

    check_naming(config)?;

    if config.draw_mode == DrawMode::Pots {
        check_pots(config)?;
    }

    Ok(())
}

fn check_naming(config: &DrawConfig) -> Result<(), ConfigError> {
    let groups = config.number_of_groups;

    match config.group_naming_format {
        NamingFormat::Letters if groups > MAX_LETTER_GROUPS => {
            Err(ConfigError::TooManyLetterGroups { count: groups })
        }
        NamingFormat::Numbers if groups > MAX_GROUPS => {
            Err(ConfigError::TooManyNumberedGroups { count: groups })
        }
        NamingFormat::Custom => {
            let names = config.custom_group_names.as_deref().unwrap_or_default();
            if names.len() < groups {
                return Err(ConfigError::MissingCustomNames {
                    needed: groups,
                    provided: names.len(),
                });
            }
            check_custom_names(&names[..groups])
        }
        _ => Ok(()),
    }
}

/// Names in use must be non-blank and unique, ignoring case.
pub(crate) fn check_custom_names(names: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (i, name) in names.iter().enumerate() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::BlankCustomName { position: i + 1 });
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::DuplicateCustomName {
                name: trimmed.to_string(),
            });
        }
    }
    Ok(())
}

fn check_pots(config: &DrawConfig) -> Result<(), ConfigError> {
    let pots = &config.pots;

    if pots.len() < MIN_POTS {
        return Err(ConfigError::TooFewPots { count: pots.len() });
    }

    if let Some(empty) = pots.iter().find(|pot| pot.is_empty()) {
        return Err(ConfigError::EmptyPot {
            name: empty.name.clone(),
        });
    }

    let reference = &pots[0];
    if let Some(odd) = pots.iter().find(|pot| pot.len() != reference.len()) {
        return Err(ConfigError::UnequalPots {
            reference: reference.name.clone(),
            expected: reference.len(),
            name: odd.name.clone(),
            size: odd.len(),
        });
    }

    // Sizes are equal from here on; pots larger than the group count are
    // accepted and their extra members sit out the draw.
    if let Some(short) = pots.iter().find(|pot| pot.len() < config.number_of_groups) {
        return Err(ConfigError::PotSmallerThanGroupCount {
            name: short.name.clone(),
            size: short.len(),
            groups: config.number_of_groups,
        });
    }

    Ok(())
}
