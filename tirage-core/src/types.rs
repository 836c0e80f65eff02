use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TirageError;

pub const MIN_PARTICIPANTS: usize = 4;
pub const MIN_GROUPS: usize = 2;
pub const MAX_GROUPS: usize = 30;
pub const MIN_PER_GROUP: usize = 1;
pub const MAX_PER_GROUP: usize = 50;
pub const MAX_LETTER_GROUPS: usize = 26;
pub const MIN_POTS: usize = 2;

/// Someone (or some team) taking part in a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A seeding tier. Pots own their membership; a participant's pot is looked
/// up through [`DrawConfig::pot_index_of`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Pot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: Self::name_for(index),
            participants: Vec::new(),
        }
    }

    pub fn name_for(index: usize) -> String {
        format!("Pot {}", index + 1)
    }

    /// Move the pot to `index`, regenerating its display name.
    pub fn reindex(&mut self, index: usize) {
        self.index = index;
        self.name = Self::name_for(index);
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub participants: Vec<Participant>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            participants: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Random,
    Pots,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::Random => write!(f, "random"),
            DrawMode::Pots => write!(f, "pots"),
        }
    }
}

impl FromStr for DrawMode {
    type Err = TirageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(DrawMode::Random),
            "pots" => Ok(DrawMode::Pots),
            other => Err(TirageError::config(format!(
                "Invalid draw mode: {}. Supported modes: random, pots",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingFormat {
    #[default]
    #[serde(rename = "A-Z")]
    Letters,
    #[serde(rename = "1-30")]
    Numbers,
    #[serde(rename = "custom")]
    Custom,
}

impl fmt::Display for NamingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingFormat::Letters => write!(f, "A-Z"),
            NamingFormat::Numbers => write!(f, "1-30"),
            NamingFormat::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for NamingFormat {
    type Err = TirageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a-z" | "letters" => Ok(NamingFormat::Letters),
            "1-30" | "numbers" => Ok(NamingFormat::Numbers),
            "custom" => Ok(NamingFormat::Custom),
            other => Err(TirageError::config(format!(
                "Invalid naming format: {}. Supported formats: A-Z, 1-30, custom",
                other
            ))),
        }
    }
}

/// Everything the validator and the allocation engine need to run a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawConfig {
    pub title: String,
    pub draw_mode: DrawMode,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub pots: Vec<Pot>,
    pub number_of_groups: usize,
    pub participants_per_group: usize,
    pub group_naming_format: NamingFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_group_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            draw_mode: DrawMode::Random,
            participants: Vec::new(),
            pots: Vec::new(),
            number_of_groups: 4,
            participants_per_group: 4,
            group_naming_format: NamingFormat::Letters,
            custom_group_names: None,
            seed: None,
        }
    }
}

impl DrawConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> usize {
        self.number_of_groups.saturating_mul(self.participants_per_group)
    }

    /// Everyone taking part under the current mode: the flat participant
    /// list in random mode, the pot members (pot by pot) in pots mode.
    pub fn entrants(&self) -> Vec<&Participant> {
        match self.draw_mode {
            DrawMode::Random => self.participants.iter().collect(),
            DrawMode::Pots => self.pots.iter().flat_map(|pot| &pot.participants).collect(),
        }
    }

    pub fn entrant_count(&self) -> usize {
        match self.draw_mode {
            DrawMode::Random => self.participants.len(),
            DrawMode::Pots => self.pots.iter().map(Pot::len).sum(),
        }
    }

    /// Re-number pots by position so indices are contiguous and names match.
    pub fn reindex_pots(&mut self) {
        for (index, pot) in self.pots.iter_mut().enumerate() {
            pot.reindex(index);
        }
    }

    /// Pot holding the participant, derived from pot membership.
    pub fn pot_index_of(&self, participant_id: Uuid) -> Option<usize> {
        self.pots
            .iter()
            .find(|pot| pot.participants.iter().any(|p| p.id == participant_id))
            .map(|pot| pot.index)
    }

    pub fn has_participant_named(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.entrants()
            .iter()
            .any(|p| p.name.trim().to_lowercase() == needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub draw_mode: DrawMode,
    pub groups: Vec<Group>,
    pub total_participants: usize,
    pub created_at: DateTime<Utc>,
    pub config: DrawConfig,
    pub seed: u64,
}

impl DrawResult {
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Participants that ended up in a group. Lower than `total_participants`
    /// when pots hold more entrants than there are groups.
    pub fn placed_participants(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pot_reindex_renames() {
        let mut pot = Pot::new(3);
        assert_eq!(pot.name, "Pot 4");

        pot.reindex(1);
        assert_eq!(pot.index, 1);
        assert_eq!(pot.name, "Pot 2");
    }

    #[test]
    fn test_pot_index_is_derived_from_membership() {
        let alice = Participant::new("Alice");
        let bob = Participant::new("Bob");

        let mut first = Pot::new(0);
        first.participants.push(alice.clone());
        let mut second = Pot::new(1);
        second.participants.push(bob.clone());

        let config = DrawConfig {
            draw_mode: DrawMode::Pots,
            participants: vec![Participant::new("ignored in pots mode")],
            pots: vec![first, second],
            ..DrawConfig::new("seeded")
        };

        assert_eq!(config.pot_index_of(alice.id), Some(0));
        assert_eq!(config.pot_index_of(bob.id), Some(1));
        assert_eq!(config.pot_index_of(Uuid::new_v4()), None);
        assert_eq!(config.entrant_count(), 2);
        assert!(!config.has_participant_named("ignored in pots mode"));
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{
            "title": "Coupe",
            "drawMode": "random",
            "participants": [],
            "numberOfGroups": 2,
            "participantsPerGroup": 4,
            "groupNamingFormat": "A-Z"
        }"#;

        let config: DrawConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.draw_mode, DrawMode::Random);
        assert_eq!(config.group_naming_format, NamingFormat::Letters);
        assert_eq!(config.capacity(), 8);
        assert!(config.pots.is_empty());
        assert!(config.custom_group_names.is_none());

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["groupNamingFormat"], "A-Z");
        assert_eq!(back["drawMode"], "random");
    }

    #[test]
    fn test_hand_written_pots_get_ids_and_names() {
        let json = r#"{
            "title": "Seeded",
            "drawMode": "pots",
            "pots": [
                { "participants": [{ "name": "PSG" }, { "name": "OM" }] },
                { "participants": [{ "name": "Brest" }, { "name": "Lens" }] }
            ],
            "numberOfGroups": 2,
            "participantsPerGroup": 2,
            "groupNamingFormat": "1-30"
        }"#;

        let mut config: DrawConfig = serde_json::from_str(json).unwrap();
        config.reindex_pots();

        let names: Vec<&str> = config.pots.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pot 1", "Pot 2"]);
        assert_eq!(config.pots[1].index, 1);
        assert_ne!(config.pots[0].participants[0].id, config.pots[0].participants[1].id);
        assert_eq!(config.entrant_count(), 4);
    }

    #[test]
    fn test_naming_format_parsing() {
        assert_eq!("A-Z".parse::<NamingFormat>().unwrap(), NamingFormat::Letters);
        assert_eq!("1-30".parse::<NamingFormat>().unwrap(), NamingFormat::Numbers);
        assert_eq!("Custom".parse::<NamingFormat>().unwrap(), NamingFormat::Custom);
        assert!("roman".parse::<NamingFormat>().is_err());
        assert_eq!("POTS".parse::<DrawMode>().unwrap(), DrawMode::Pots);
    }

    #[test]
    fn test_duplicate_name_lookup_ignores_case() {
        let config = DrawConfig {
            participants: vec![Participant::new("Lyon")],
            ..DrawConfig::default()
        };
        assert!(config.has_participant_named("  lyon "));
        assert!(!config.has_participant_named("Nice"));
    }
}
