pub mod draw;
pub mod history;
pub mod inspect;

pub use draw::{handle_draw_command, DrawArgs};
pub use history::{handle_history_command, HistoryCommands};
pub use inspect::{handle_names_command, handle_preview_command, handle_validate_command};

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;
use tirage_core::{DrawConfig, DrawResult};

/// Read a draw configuration from a JSON file.
pub fn load_draw_config(path: &Path) -> Result<DrawConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draw file {}", path.display()))?;
    let mut config: DrawConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid draw configuration in {}", path.display()))?;
    config.reindex_pots();
    Ok(config)
}

/// One column per group, participants listed top to bottom.
pub fn groups_table(result: &DrawResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(result.groups.iter().map(|g| g.name.as_str()));

    let rows = result.groups.iter().map(|g| g.len()).max().unwrap_or(0);
    for row in 0..rows {
        table.add_row(result.groups.iter().map(|g| {
            g.participants
                .get(row)
                .map(|p| p.name.as_str())
                .unwrap_or("")
        }));
    }

    table
}

pub fn print_result(result: &DrawResult) {
    println!("{}", result.title);
    println!(
        "  Mode: {}  Groups: {}  Participants: {}",
        result.draw_mode,
        result.groups.len(),
        result.total_participants
    );
    let placed = result.placed_participants();
    if placed < result.total_participants {
        println!(
            "  Not placed: {} (pots hold more entrants than there are groups)",
            result.total_participants - placed
        );
    }
    println!("  Seed: {}", result.seed);
    println!(
        "  Date: {}",
        result.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(id) = result.id {
        println!("  ID: {}", id);
    }
    println!();
    println!("{}", groups_table(result));
}
