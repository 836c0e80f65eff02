use serde::Serialize;
use tirage_core::{
    DrawConfig, DrawMode, NamingFormat, MAX_GROUPS, MAX_LETTER_GROUPS, MIN_GROUPS, MIN_PARTICIPANTS,
};

use crate::naming::generate_group_names;
use crate::validation::{check_custom_names, check_config, ConfigError};

/// Something to flag while a draw is still being configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConfigIssue {
    NeedMoreParticipants { missing: usize },
    GroupCountOutOfRange { count: usize },
    Overflow { extra: usize },
    TooManyLetterGroups,
    CustomName { message: String },
    PotSizes { sizes: Vec<usize> },
    PotBelowGroupCount { pot: String },
}

/// Live view of a configuration in progress.
///
/// Unlike the validator, every issue is collected at once so an editing
/// surface can show them all. Drawability is still decided by
/// [`crate::validate_config`]; `drawable` mirrors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPreview {
    pub participants: usize,
    pub capacity: usize,
    pub free_slots: usize,
    pub group_names: Vec<String>,
    pub issues: Vec<ConfigIssue>,
    pub drawable: bool,
}

impl ConfigPreview {
    pub fn of(config: &DrawConfig) -> Self {
        let participants = config.entrant_count();
        let capacity = config.capacity();
        let mut issues = Vec::new();

        if participants < MIN_PARTICIPANTS {
            issues.push(ConfigIssue::NeedMoreParticipants {
                missing: MIN_PARTICIPANTS - participants,
            });
        }

        let groups_in_range = (MIN_GROUPS..=MAX_GROUPS).contains(&config.number_of_groups);
        if !groups_in_range {
            issues.push(ConfigIssue::GroupCountOutOfRange {
                count: config.number_of_groups,
            });
        }

        if participants > capacity {
            issues.push(ConfigIssue::Overflow {
                extra: participants - capacity,
            });
        }

        match config.group_naming_format {
            NamingFormat::Letters if config.number_of_groups > MAX_LETTER_GROUPS => {
                issues.push(ConfigIssue::TooManyLetterGroups);
            }
            NamingFormat::Custom => {
                let names = config.custom_group_names.as_deref().unwrap_or_default();
                let used = &names[..names.len().min(config.number_of_groups)];
                if let Err(err) = check_custom_names(used) {
                    issues.push(ConfigIssue::CustomName {
                        message: err.to_string(),
                    });
                }
                if names.len() < config.number_of_groups {
                    issues.push(ConfigIssue::CustomName {
                        message: ConfigError::MissingCustomNames {
                            needed: config.number_of_groups,
                            provided: names.len(),
                        }
                        .to_string(),
                    });
                }
            }
            _ => {}
        }

        if config.draw_mode == DrawMode::Pots {
            let sizes: Vec<usize> = config.pots.iter().map(|pot| pot.len()).collect();
            if sizes.windows(2).any(|pair| pair[0] != pair[1]) {
                issues.push(ConfigIssue::PotSizes { sizes });
            }
            for pot in &config.pots {
                if pot.len() < config.number_of_groups {
                    issues.push(ConfigIssue::PotBelowGroupCount {
                        pot: pot.name.clone(),
                    });
                }
            }
        }

        Self {
            participants,
            capacity,
            free_slots: capacity.saturating_sub(participants),
            group_names: if groups_in_range {
                generate_group_names(
                    config.number_of_groups,
                    config.group_naming_format,
                    config.custom_group_names.as_deref(),
                )
            } else {
                Vec::new()
            },
            issues,
            drawable: check_config(config).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirage_core::{Participant, Pot};

    fn config(n_people: usize) -> DrawConfig {
        DrawConfig {
            participants: (0..n_people)
                .map(|i| Participant::new(format!("P{}", i)))
                .collect(),
            number_of_groups: 2,
            participants_per_group: 3,
            ..DrawConfig::new("preview")
        }
    }

    #[test]
    fn test_capacity_math() {
        let preview = ConfigPreview::of(&config(5));
        assert_eq!(preview.capacity, 6);
        assert_eq!(preview.free_slots, 1);
        assert_eq!(preview.group_names, vec!["Groupe A", "Groupe B"]);
        assert!(preview.issues.is_empty());
        assert!(preview.drawable);
    }

    #[test]
    fn test_collects_every_issue() {
        let mut cfg = config(2);
        cfg.participants_per_group = 1;
        cfg.group_naming_format = NamingFormat::Custom;
        cfg.custom_group_names = Some(vec!["Est".into()]);

        let preview = ConfigPreview::of(&cfg);

        assert!(!preview.drawable);
        assert!(preview
            .issues
            .contains(&ConfigIssue::NeedMoreParticipants { missing: 2 }));
        assert!(preview
            .issues
            .iter()
            .any(|issue| matches!(issue, ConfigIssue::CustomName { .. })));
        assert_eq!(preview.group_names, vec!["Est"]);
    }

    #[test]
    fn test_overflow_and_blank_custom_name() {
        let mut cfg = config(8);
        cfg.group_naming_format = NamingFormat::Custom;
        cfg.custom_group_names = Some(vec!["Est".into(), " ".into()]);

        let preview = ConfigPreview::of(&cfg);

        assert!(preview.issues.contains(&ConfigIssue::Overflow { extra: 2 }));
        assert!(preview.issues.contains(&ConfigIssue::CustomName {
            message: ConfigError::BlankCustomName { position: 2 }.to_string()
        }));
        assert_eq!(preview.free_slots, 0);
    }

    #[test]
    fn test_out_of_range_group_count_yields_no_names() {
        let mut cfg = config(8);
        cfg.number_of_groups = usize::MAX / 8;
        cfg.group_naming_format = NamingFormat::Numbers;

        let preview = ConfigPreview::of(&cfg);

        assert!(preview.group_names.is_empty());
        assert!(preview.issues.contains(&ConfigIssue::GroupCountOutOfRange {
            count: usize::MAX / 8
        }));
        assert!(!preview.drawable);

        cfg.number_of_groups = 1;
        let preview = ConfigPreview::of(&cfg);
        assert!(preview.group_names.is_empty());
        assert!(preview
            .issues
            .contains(&ConfigIssue::GroupCountOutOfRange { count: 1 }));
    }

    #[test]
    fn test_pot_issues() {
        let mut small = Pot::new(0);
        small.participants.push(Participant::new("A"));
        let mut big = Pot::new(1);
        big.participants = vec![Participant::new("B"), Participant::new("C")];

        let cfg = DrawConfig {
            draw_mode: DrawMode::Pots,
            pots: vec![small, big],
            ..config(0)
        };

        let preview = ConfigPreview::of(&cfg);
        assert!(preview
            .issues
            .contains(&ConfigIssue::PotSizes { sizes: vec![1, 2] }));
        assert!(preview.issues.contains(&ConfigIssue::PotBelowGroupCount {
            pot: "Pot 1".into()
        }));
    }
}
