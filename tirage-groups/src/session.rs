use crate::{
    check_config, validate_config, ConfigError, ConfigPreview, DrawEngine, DrawError, Result,
    ValidationReport,
};
use serde::{Deserialize, Serialize};
use tirage_core::{DrawConfig, DrawMode, DrawResult, Group, NamingFormat, Participant, Pot};
use uuid::Uuid;

/// Where a draw session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawStep {
    ConfigureMode,
    ConfigureParticipants,
    ConfigureGroups,
    Drawing,
    Result,
}

impl DrawStep {
    /// Wizard step number (1-3) for the configuration steps.
    pub fn number(&self) -> Option<u8> {
        match self {
            DrawStep::ConfigureMode => Some(1),
            DrawStep::ConfigureParticipants => Some(2),
            DrawStep::ConfigureGroups => Some(3),
            DrawStep::Drawing | DrawStep::Result => None,
        }
    }

    fn from_number(n: u8) -> Self {
        match n.clamp(1, 3) {
            1 => DrawStep::ConfigureMode,
            2 => DrawStep::ConfigureParticipants,
            _ => DrawStep::ConfigureGroups,
        }
    }

    pub fn is_configuring(&self) -> bool {
        self.number().is_some()
    }
}

/// One draw, from configuration to result.
///
/// The session only sequences steps and guards edits; allocation and
/// validation are delegated to [`DrawEngine`] and [`check_config`].
#[derive(Debug)]
pub struct DrawSession {
    id: Uuid,
    step: DrawStep,
    config: DrawConfig,
    groups: Vec<Group>,
    result: Option<DrawResult>,
    last_error: Option<ConfigError>,
}

impl DrawSession {
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_config(DrawConfig::new(title))
    }

    /// Start from a prepared configuration (e.g. loaded from a file).
    pub fn from_config(mut config: DrawConfig) -> Self {
        config.reindex_pots();
        Self {
            id: Uuid::new_v4(),
            step: DrawStep::ConfigureMode,
            config,
            groups: Vec::new(),
            result: None,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> DrawStep {
        self.step
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn result(&self) -> Option<&DrawResult> {
        self.result.as_ref()
    }

    /// Why the last draw attempt was refused, if it was.
    pub fn last_error(&self) -> Option<&ConfigError> {
        self.last_error.as_ref()
    }

    pub fn preview(&self) -> ConfigPreview {
        ConfigPreview::of(&self.config)
    }

    pub fn validate(&self) -> ValidationReport {
        validate_config(&self.config)
    }

    pub fn next_step(&mut self) {
        if let Some(n) = self.step.number() {
            self.goto(DrawStep::from_number(n.saturating_add(1)));
        }
    }

    pub fn previous_step(&mut self) {
        if let Some(n) = self.step.number() {
            self.goto(DrawStep::from_number(n.saturating_sub(1)));
        }
    }

    fn goto(&mut self, step: DrawStep) {
        if step != self.step {
            tracing::debug!("Session {} moved {:?} -> {:?}", self.id, self.step, step);
            self.step = step;
        }
    }

    fn ensure_configuring(&self) -> Result<()> {
        if !self.step.is_configuring() {
            return Err(DrawError::InvalidState(format!(
                "cannot edit the draw while in {:?}",
                self.step
            )));
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.ensure_configuring()?;
        self.config.title = title.into();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: DrawMode) -> Result<()> {
        self.ensure_configuring()?;
        self.config.draw_mode = mode;
        Ok(())
    }

    fn checked_name(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DrawError::EmptyName);
        }
        if self.config.has_participant_named(name) {
            return Err(DrawError::DuplicateParticipant(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Add an entrant to a random-mode draw. Names are trimmed and must be
    /// unique ignoring case.
    pub fn add_participant(&mut self, name: &str) -> Result<Participant> {
        self.ensure_configuring()?;
        if self.config.draw_mode == DrawMode::Pots {
            return Err(DrawError::InvalidState(
                "participants of a pots draw are added to a pot".to_string(),
            ));
        }

        let participant = Participant::new(self.checked_name(name)?);
        self.config.participants.push(participant.clone());
        tracing::debug!("Added participant {} to session {}", participant.name, self.id);
        Ok(participant)
    }

    /// Remove an entrant, wherever it currently sits.
    pub fn remove_participant(&mut self, participant_id: Uuid) -> Result<Participant> {
        self.ensure_configuring()?;

        if let Some(pos) = self
            .config
            .participants
            .iter()
            .position(|p| p.id == participant_id)
        {
            return Ok(self.config.participants.remove(pos));
        }

        for pot in &mut self.config.pots {
            if let Some(pos) = pot.participants.iter().position(|p| p.id == participant_id) {
                return Ok(pot.participants.remove(pos));
            }
        }

        Err(DrawError::ParticipantNotFound(participant_id))
    }

    /// Append an empty pot and return its index.
    pub fn add_pot(&mut self) -> Result<usize> {
        self.ensure_configuring()?;
        let index = self.config.pots.len();
        self.config.pots.push(Pot::new(index));
        Ok(index)
    }

    /// Remove a pot together with its members; later pots shift down and
    /// are renamed.
    pub fn remove_pot(&mut self, index: usize) -> Result<Pot> {
        self.ensure_configuring()?;
        if index >= self.config.pots.len() {
            return Err(DrawError::PotNotFound(index));
        }

        let removed = self.config.pots.remove(index);
        self.config.reindex_pots();
        Ok(removed)
    }

    pub fn add_participant_to_pot(&mut self, index: usize, name: &str) -> Result<Participant> {
        self.ensure_configuring()?;
        if index >= self.config.pots.len() {
            return Err(DrawError::PotNotFound(index));
        }

        let participant = Participant::new(self.checked_name(name)?);
        self.config.pots[index].participants.push(participant.clone());
        Ok(participant)
    }

    pub fn move_participant_to_pot(&mut self, participant_id: Uuid, index: usize) -> Result<()> {
        self.ensure_configuring()?;
        if index >= self.config.pots.len() {
            return Err(DrawError::PotNotFound(index));
        }

        let from = self
            .config
            .pot_index_of(participant_id)
            .ok_or(DrawError::ParticipantNotFound(participant_id))?;
        if from == index {
            return Ok(());
        }

        let source = &mut self.config.pots[from].participants;
        let pos = source
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(DrawError::ParticipantNotFound(participant_id))?;
        let participant = source.remove(pos);
        self.config.pots[index].participants.push(participant);
        Ok(())
    }

    pub fn set_group_count(&mut self, number_of_groups: usize) -> Result<()> {
        self.ensure_configuring()?;
        self.config.number_of_groups = number_of_groups;
        Ok(())
    }

    pub fn set_group_size(&mut self, participants_per_group: usize) -> Result<()> {
        self.ensure_configuring()?;
        self.config.participants_per_group = participants_per_group;
        Ok(())
    }

    pub fn set_naming_format(&mut self, format: NamingFormat) -> Result<()> {
        self.ensure_configuring()?;
        self.config.group_naming_format = format;
        Ok(())
    }

    pub fn set_custom_group_names(&mut self, names: Vec<String>) -> Result<()> {
        self.ensure_configuring()?;
        self.config.custom_group_names = Some(names);
        Ok(())
    }

    pub fn set_seed(&mut self, seed: Option<u64>) -> Result<()> {
        self.ensure_configuring()?;
        self.config.seed = seed;
        Ok(())
    }

    /// Validate and enter [`DrawStep::Drawing`]. A rejected configuration
    /// leaves the session in [`DrawStep::ConfigureGroups`].
    pub fn begin_draw(&mut self) -> Result<()> {
        if self.step != DrawStep::ConfigureGroups {
            return Err(DrawError::InvalidState(format!(
                "draw can only start from ConfigureGroups, not {:?}",
                self.step
            )));
        }

        if let Err(err) = check_config(&self.config) {
            tracing::warn!("Session {} draw refused: {}", self.id, err);
            self.last_error = Some(err.clone());
            return Err(DrawError::Config(err));
        }

        self.last_error = None;
        self.goto(DrawStep::Drawing);
        Ok(())
    }

    /// Run the allocation and land in [`DrawStep::Result`].
    pub fn complete_draw(&mut self) -> Result<&DrawResult> {
        if self.step != DrawStep::Drawing {
            return Err(DrawError::InvalidState(format!(
                "no draw in progress ({:?})",
                self.step
            )));
        }

        let result = DrawEngine::for_config(&self.config).draw(&self.config);
        self.groups = result.groups.clone();
        self.goto(DrawStep::Result);

        Ok(self.result.insert(result))
    }

    /// [`Self::begin_draw`] then [`Self::complete_draw`], without any pause
    /// in between.
    pub fn perform_draw(&mut self) -> Result<&DrawResult> {
        self.begin_draw()?;
        self.complete_draw()
    }

    /// Back to step 1 with an empty configuration.
    pub fn reset(&mut self) {
        self.config = DrawConfig::default();
        self.groups.clear();
        self.result = None;
        self.last_error = None;
        self.goto(DrawStep::ConfigureMode);
    }
}
