use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tirage_core::{DrawConfig, DrawMode, DrawResult, Group, Participant, Pot};

use crate::naming::{generate_group_names, number_name};
use crate::shuffle::shuffled;

fn empty_groups(number_of_groups: usize, group_names: &[String]) -> Vec<Group> {
    (0..number_of_groups)
        .map(|i| {
            let name = group_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| number_name(i));
            Group::new(name)
        })
        .collect()
}

/// Shuffle everyone once, then deal round-robin: shuffled index `k` lands in
/// group `k % number_of_groups`. Group sizes differ by at most one.
pub fn random_draw<R: Rng + ?Sized>(
    participants: &[Participant],
    number_of_groups: usize,
    group_names: &[String],
    rng: &mut R,
) -> Vec<Group> {
    let mut groups = empty_groups(number_of_groups, group_names);
    if groups.is_empty() {
        return groups;
    }

    for (k, participant) in shuffled(participants, rng).into_iter().enumerate() {
        groups[k % number_of_groups].participants.push(participant);
    }

    groups
}

/// Shuffle each pot independently and give shuffled index `k` to group `k`.
///
/// Every group receives at most one participant per pot. Pot members past
/// the first `number_of_groups` (after shuffling) are left out of the draw.
pub fn pots_draw<R: Rng + ?Sized>(
    pots: &[Pot],
    number_of_groups: usize,
    group_names: &[String],
    rng: &mut R,
) -> Vec<Group> {
    let mut groups = empty_groups(number_of_groups, group_names);

    for pot in pots {
        let drawn = shuffled(&pot.participants, rng);
        if drawn.len() > number_of_groups {
            tracing::debug!(
                "{}: {} participant(s) beyond the group count stay undrawn",
                pot.name,
                drawn.len() - number_of_groups
            );
        }

        for (group, participant) in groups.iter_mut().zip(drawn) {
            group.participants.push(participant);
        }
    }

    groups
}

/// Seeded draw runner. The seed is kept on every result so a draw can be
/// replayed exactly.
pub struct DrawEngine {
    seed: u64,
    rng: StdRng,
}

impl DrawEngine {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uses the config's own seed when it has one.
    pub fn for_config(config: &DrawConfig) -> Self {
        config.seed.map_or_else(Self::new, Self::with_seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_draw(
        &mut self,
        participants: &[Participant],
        number_of_groups: usize,
        group_names: &[String],
    ) -> Vec<Group> {
        random_draw(participants, number_of_groups, group_names, &mut self.rng)
    }

    pub fn pots_draw(
        &mut self,
        pots: &[Pot],
        number_of_groups: usize,
        group_names: &[String],
    ) -> Vec<Group> {
        pots_draw(pots, number_of_groups, group_names, &mut self.rng)
    }

    /// Run the draw a config describes. Expects a config that already passed
    /// [`crate::validate_config`].
    pub fn draw(&mut self, config: &DrawConfig) -> DrawResult {
        let names = generate_group_names(
            config.number_of_groups,
            config.group_naming_format,
            config.custom_group_names.as_deref(),
        );

        let groups = match config.draw_mode {
            DrawMode::Random => {
                self.random_draw(&config.participants, config.number_of_groups, &names)
            }
            DrawMode::Pots => self.pots_draw(&config.pots, config.number_of_groups, &names),
        };

        tracing::info!(
            "Drew {} group(s) for '{}' ({} mode, seed {})",
            groups.len(),
            config.title,
            config.draw_mode,
            self.seed
        );

        DrawResult {
            id: None,
            title: config.title.clone(),
            draw_mode: config.draw_mode,
            groups,
            total_participants: config.entrant_count(),
            created_at: Utc::now(),
            config: DrawConfig {
                seed: Some(self.seed),
                ..config.clone()
            },
            seed: self.seed,
        }
    }
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tirage_core::NamingFormat;
    use uuid::Uuid;

    fn people(n: usize) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(format!("P{}", i))).collect()
    }

    fn pot(index: usize, size: usize) -> Pot {
        let mut pot = Pot::new(index);
        pot.participants = (0..size)
            .map(|i| Participant::new(format!("pot{}-{}", index, i)))
            .collect();
        pot
    }

    fn names(n: usize) -> Vec<String> {
        generate_group_names(n, NamingFormat::Letters, None)
    }

    #[test]
    fn test_random_draw_places_everyone_once_and_balances() {
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let n_people = 4 + (seed as usize % 40);
            let n_groups = 2 + (seed as usize % 9);
            let participants = people(n_people);

            let groups = random_draw(&participants, n_groups, &names(n_groups), &mut rng);

            assert_eq!(groups.len(), n_groups);
            let placed: Vec<Uuid> = groups
                .iter()
                .flat_map(|g| g.participants.iter().map(|p| p.id))
                .collect();
            assert_eq!(placed.len(), n_people);
            let unique: HashSet<Uuid> = placed.iter().copied().collect();
            let expected: HashSet<Uuid> = participants.iter().map(|p| p.id).collect();
            assert_eq!(unique, expected);

            let sizes: Vec<usize> = groups.iter().map(Group::len).collect();
            let max = sizes.iter().max().unwrap();
            let min = sizes.iter().min().unwrap();
            assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);
        }
    }

    #[test]
    fn test_random_draw_keeps_name_order_and_input() {
        let participants = people(6);
        let snapshot = participants.clone();
        let mut rng = StdRng::seed_from_u64(3);

        let groups = random_draw(&participants, 3, &names(3), &mut rng);

        let got: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(got, vec!["Groupe A", "Groupe B", "Groupe C"]);
        assert_eq!(participants, snapshot);
    }

    #[test]
    fn test_pots_draw_one_per_pot_per_group() {
        for seed in 0..100u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pots = vec![pot(0, 4), pot(1, 4), pot(2, 4)];

            let groups = pots_draw(&pots, 4, &names(4), &mut rng);

            for group in &groups {
                assert_eq!(group.len(), 3);
                for p in &pots {
                    let from_pot = group
                        .participants
                        .iter()
                        .filter(|member| p.participants.contains(*member))
                        .count();
                    assert_eq!(from_pot, 1);
                }
            }
        }
    }

    #[test]
    fn test_pots_draw_drops_extras_beyond_group_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let pots = vec![pot(0, 5), pot(1, 5)];

        let groups = pots_draw(&pots, 3, &names(3), &mut rng);

        assert_eq!(groups.iter().map(Group::len).sum::<usize>(), 6);
        for p in &pots {
            let drawn = groups
                .iter()
                .flat_map(|g| &g.participants)
                .filter(|member| p.participants.contains(*member))
                .count();
            assert_eq!(drawn, 3);
        }
    }

    #[test]
    fn test_pots_draw_tolerates_short_pots() {
        let mut rng = StdRng::seed_from_u64(5);
        let groups = pots_draw(&[pot(0, 2)], 4, &names(4), &mut rng);

        let sizes: Vec<usize> = groups.iter().map(Group::len).collect();
        assert_eq!(sizes, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_missing_names_fall_back_to_numbers() {
        let mut rng = StdRng::seed_from_u64(0);
        let groups = random_draw(&people(4), 3, &["Nord".to_string()], &mut rng);
        let got: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(got, vec!["Nord", "Groupe 2", "Groupe 3"]);
    }

    #[test]
    fn test_engine_replays_with_same_seed() {
        let config = DrawConfig {
            participants: people(10),
            number_of_groups: 3,
            participants_per_group: 4,
            seed: Some(1234),
            ..DrawConfig::new("replay")
        };

        let first = DrawEngine::for_config(&config).draw(&config);
        let second = DrawEngine::for_config(&config).draw(&config);

        let members = |r: &DrawResult| -> Vec<Vec<Uuid>> {
            r.groups
                .iter()
                .map(|g| g.participants.iter().map(|p| p.id).collect())
                .collect()
        };
        assert_eq!(members(&first), members(&second));
        assert_eq!(first.seed, 1234);
        assert_eq!(first.config.seed, Some(1234));
        assert_eq!(first.total_participants, 10);
    }

    #[test]
    fn test_engine_records_generated_seed() {
        let config = DrawConfig {
            participants: people(4),
            number_of_groups: 2,
            participants_per_group: 2,
            ..DrawConfig::new("fresh")
        };

        let mut engine = DrawEngine::new();
        let seed = engine.seed();
        let result = engine.draw(&config);
        assert_eq!(result.seed, seed);
        assert_eq!(result.config.seed, Some(seed));
    }
}
