use anyhow::{bail, Result};
use clap::Args;
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tirage_core::{DrawMode, NamingFormat, Storage, MAX_GROUPS, MIN_GROUPS, MIN_POTS};
use tirage_groups::{DrawError, DrawHistory, DrawSession, DrawStep};

use super::{load_draw_config, print_result};
use crate::config::CliConfig;

#[derive(Args)]
pub struct DrawArgs {
    /// Draw configuration file (JSON). Starts the interactive wizard when omitted
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not keep the result in the draw history
    #[arg(long)]
    pub no_save: bool,
}

pub async fn handle_draw_command(args: DrawArgs, config: &CliConfig) -> Result<()> {
    let mut session = match &args.file {
        Some(path) => {
            let mut session = DrawSession::from_config(load_draw_config(path)?);
            session.next_step();
            session.next_step();
            session
        }
        None => run_wizard()?,
    };

    if args.seed.is_some() {
        session.set_seed(args.seed)?;
    }

    session.begin_draw()?;

    println!("Drawing '{}'...", session.config().title);
    if config.reveal_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.reveal_delay_ms)).await;
    }

    let result = session.complete_draw()?.clone();

    let history = if args.no_save {
        DrawHistory::local()
    } else {
        match Storage::new(&config.db_path()).await {
            Ok(storage) => DrawHistory::with_repository(Arc::new(storage)),
            Err(e) => {
                tracing::warn!("Draw history unavailable: {}", e);
                DrawHistory::local()
            }
        }
    };

    let entry = history.record(result).await;

    println!();
    print_result(&entry.result);

    if history.is_persistent() && !entry.is_saved() {
        println!("Warning: the draw could not be saved to the history.");
    }

    Ok(())
}

/// Walk the three configuration steps interactively.
fn run_wizard() -> Result<DrawSession> {
    let title: String = Input::new()
        .with_prompt("Draw title")
        .default("Tirage".to_string())
        .interact_text()?;
    let mut session = DrawSession::new(title.trim());

    while session.step().is_configuring() {
        match session.step() {
            DrawStep::ConfigureMode => {
                println!("Step 1/3: draw mode");
                let modes = ["Random", "Pots (one entrant per pot in each group)"];
                let choice = Select::new()
                    .with_prompt("How should groups be formed?")
                    .items(&modes)
                    .default(0)
                    .interact()?;
                let mode = if choice == 0 {
                    DrawMode::Random
                } else {
                    DrawMode::Pots
                };
                session.set_mode(mode)?;
                session.next_step();
            }
            DrawStep::ConfigureParticipants => {
                println!("Step 2/3: participants");
                match session.config().draw_mode {
                    DrawMode::Random => prompt_participants(&mut session)?,
                    DrawMode::Pots => prompt_pots(&mut session)?,
                }
                println!("{} participants entered.", session.config().entrant_count());
                session.next_step();
            }
            DrawStep::ConfigureGroups => {
                println!("Step 3/3: groups");
                prompt_groups(&mut session)?;

                let preview = session.preview();
                println!(
                    "Groups: {}  Capacity: {}  Free slots: {}",
                    preview.group_names.join(", "),
                    preview.capacity,
                    preview.free_slots
                );

                let report = session.validate();
                if report.valid {
                    return Ok(session);
                }

                println!(
                    "Configuration problem: {}",
                    report.error.unwrap_or_default()
                );
                let back = Confirm::new()
                    .with_prompt("Go back to the participants?")
                    .default(false)
                    .interact()?;
                if back {
                    session.previous_step();
                }
            }
            DrawStep::Drawing | DrawStep::Result => break,
        }
    }

    bail!("Wizard ended in {:?}", session.step())
}

fn prompt_name(prompt: &str) -> Result<String> {
    let name: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(name.trim().to_string())
}

fn prompt_participants(session: &mut DrawSession) -> Result<()> {
    println!("Enter one name per line, empty line to finish.");
    loop {
        let name = prompt_name("Participant")?;
        if name.is_empty() {
            return Ok(());
        }
        match session.add_participant(&name) {
            Ok(_) => {}
            Err(e @ DrawError::DuplicateParticipant(_)) => println!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_pots(session: &mut DrawSession) -> Result<()> {
    let existing = session.config().pots.len();
    let count: usize = Input::new()
        .with_prompt("Number of pots")
        .default(existing.max(MIN_POTS))
        .interact_text()?;

    while session.config().pots.len() < count {
        session.add_pot()?;
    }
    while session.config().pots.len() > count {
        session.remove_pot(session.config().pots.len() - 1)?;
    }

    for index in 0..count {
        let pot_name = session.config().pots[index].name.clone();
        println!("{}: one name per line, empty line to finish.", pot_name);
        loop {
            let name = prompt_name(&pot_name)?;
            if name.is_empty() {
                break;
            }
            match session.add_participant_to_pot(index, &name) {
                Ok(_) => {}
                Err(e @ DrawError::DuplicateParticipant(_)) => println!("{}", e),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn prompt_groups(session: &mut DrawSession) -> Result<()> {
    let groups: usize = Input::new()
        .with_prompt("Number of groups")
        .default(session.config().number_of_groups)
        .validate_with(|count: &usize| check_group_count(*count))
        .interact_text()?;
    session.set_group_count(groups)?;

    let per_group: usize = Input::new()
        .with_prompt("Participants per group")
        .default(session.config().participants_per_group)
        .interact_text()?;
    session.set_group_size(per_group)?;

    let formats = [NamingFormat::Letters, NamingFormat::Numbers, NamingFormat::Custom];
    let labels = ["Groupe A, Groupe B, ...", "Groupe 1, Groupe 2, ...", "Custom names"];
    let choice = Select::new()
        .with_prompt("Group names")
        .items(&labels)
        .default(0)
        .interact()?;
    session.set_naming_format(formats[choice])?;

    if formats[choice] == NamingFormat::Custom {
        let mut names = Vec::with_capacity(groups);
        for position in 1..=groups {
            names.push(prompt_name(&format!("Name of group {}", position))?);
        }
        session.set_custom_group_names(names)?;
    }

    Ok(())
}

/// Group counts the wizard accepts; custom names are asked once per group.
fn check_group_count(count: usize) -> std::result::Result<(), String> {
    if (MIN_GROUPS..=MAX_GROUPS).contains(&count) {
        Ok(())
    } else {
        Err(format!(
            "Number of groups must be between {} and {}",
            MIN_GROUPS, MAX_GROUPS
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wizard_group_count_bounds() {
        assert!(check_group_count(MIN_GROUPS).is_ok());
        assert!(check_group_count(MAX_GROUPS).is_ok());
        assert!(check_group_count(1).is_err());
        assert!(check_group_count(MAX_GROUPS + 1).is_err());
        assert!(check_group_count(usize::MAX / 8).is_err());
    }
}
