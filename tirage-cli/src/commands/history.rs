use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use std::sync::Arc;
use tirage_core::{DrawStore, Storage, TirageError};
use tirage_groups::DrawHistory;
use uuid::Uuid;

use super::print_result;
use crate::config::CliConfig;

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List saved draws, newest first
    List,
    /// Show the groups of a saved draw
    Show {
        /// Draw ID
        id: String,
        /// Print the stored draw as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved draw
    Delete {
        /// Draw ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_history_command(cmd: HistoryCommands, config: &CliConfig) -> Result<()> {
    let storage = Arc::new(
        Storage::new(&config.db_path())
            .await
            .context("Failed to open the draw history")?,
    );
    let history = DrawHistory::with_repository(storage.clone());

    match cmd {
        HistoryCommands::List => {
            history.refresh().await?;
            let entries = history.entries();

            if entries.is_empty() {
                println!("No draws saved yet.");
                println!("Run one with: tirage draw");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Title", "Mode", "Groups", "Participants", "Date"]);

            for entry in entries {
                let result = &entry.result;
                table.add_row(vec![
                    entry.key.to_string(),
                    result.title.clone(),
                    result.draw_mode.to_string(),
                    result.groups.len().to_string(),
                    result.total_participants.to_string(),
                    result.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }

            println!("{}", table);
        }

        HistoryCommands::Show { id, json } => {
            let key = parse_id(&id)?;
            let result = match DrawStore::new(&storage).load_draw(key).await {
                Ok(result) => result,
                Err(TirageError::DrawNotFound { .. }) => bail!("Draw '{}' not found", id),
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }

        HistoryCommands::Delete { id, force } => {
            let key = parse_id(&id)?;
            history.refresh().await?;
            let title = history
                .get(key)
                .map(|entry| entry.result.title)
                .ok_or_else(|| anyhow!("Draw '{}' not found", id))?;

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete draw '{}'?", title))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            if history.delete(key).await? {
                println!("Draw '{}' deleted.", title);
            } else {
                println!("Draw '{}' was already gone.", title);
            }
        }
    }

    Ok(())
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("Invalid draw ID: {}", id))
}
