use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;
use tirage_core::{NamingFormat, MAX_GROUPS, MIN_GROUPS};
use tirage_groups::{generate_group_names, validate_config, ConfigIssue, ConfigPreview};

use super::load_draw_config;

pub fn handle_validate_command(path: &Path, json: bool) -> Result<()> {
    let config = load_draw_config(path)?;
    let report = validate_config(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.valid {
        println!("'{}' is ready to draw.", config.title);
    } else {
        println!("'{}' cannot be drawn:", config.title);
        println!("  {}", report.error.as_deref().unwrap_or("unknown error"));
    }

    if !report.valid {
        bail!("Invalid draw configuration");
    }
    Ok(())
}

pub fn handle_preview_command(path: &Path, json: bool) -> Result<()> {
    let config = load_draw_config(path)?;
    let preview = ConfigPreview::of(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", ""]);
    table.add_row(vec!["Title".to_string(), config.title.clone()]);
    table.add_row(vec!["Mode".to_string(), config.draw_mode.to_string()]);
    table.add_row(vec!["Participants".to_string(), preview.participants.to_string()]);
    table.add_row(vec!["Capacity".to_string(), preview.capacity.to_string()]);
    table.add_row(vec!["Free slots".to_string(), preview.free_slots.to_string()]);
    table.add_row(vec!["Groups".to_string(), preview.group_names.join(", ")]);
    table.add_row(vec![
        "Drawable".to_string(),
        if preview.drawable { "yes" } else { "no" }.to_string(),
    ]);
    println!("{}", table);

    for issue in &preview.issues {
        println!("- {}", describe_issue(issue));
    }

    Ok(())
}

pub fn handle_names_command(count: usize, format: &str, names: &[String]) -> Result<()> {
    let format: NamingFormat = format.parse()?;
    let custom = (format == NamingFormat::Custom).then_some(names);

    for name in generate_group_names(count, format, custom) {
        println!("{}", name);
    }
    Ok(())
}

fn describe_issue(issue: &ConfigIssue) -> String {
    match issue {
        ConfigIssue::NeedMoreParticipants { missing } => {
            format!("{} more participant(s) needed", missing)
        }
        ConfigIssue::GroupCountOutOfRange { count } => {
            format!(
                "{} groups requested, allowed range is {} to {}",
                count, MIN_GROUPS, MAX_GROUPS
            )
        }
        ConfigIssue::Overflow { extra } => {
            format!("{} participant(s) over capacity", extra)
        }
        ConfigIssue::TooManyLetterGroups => {
            "Letter names only go up to 26 groups".to_string()
        }
        ConfigIssue::CustomName { message } => message.clone(),
        ConfigIssue::PotSizes { sizes } => {
            let sizes: Vec<String> = sizes.iter().map(|s| s.to_string()).collect();
            format!("Pots have different sizes ({})", sizes.join(", "))
        }
        ConfigIssue::PotBelowGroupCount { pot } => {
            format!("{} has fewer entrants than there are groups", pot)
        }
    }
}
