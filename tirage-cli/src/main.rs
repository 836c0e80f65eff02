mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::{Path, PathBuf};
use tirage_groups::DrawError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tirage")]
#[command(about = "Random and pot-seeded group draws")]
#[command(version)]
struct Cli {
    /// Data directory for settings and draw history
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a draw from a file or through the interactive wizard
    Draw(commands::DrawArgs),

    /// Check whether a draw configuration can be drawn
    Validate {
        /// Draw configuration file (JSON)
        file: PathBuf,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show capacity, group names and every open issue of a configuration
    Preview {
        /// Draw configuration file (JSON)
        file: PathBuf,
        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print generated group names
    Names {
        /// Number of groups
        count: usize,
        /// Naming format (A-Z, 1-30, custom)
        #[arg(short, long, default_value = "A-Z")]
        format: String,
        /// Custom group name, repeat for each group
        #[arg(short, long = "name")]
        names: Vec<String>,
    },

    /// Saved draws
    #[command(subcommand)]
    History(commands::HistoryCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Get data directory
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| CliConfig::default().data_dir);

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    let config = CliConfig::load(&data_dir)?;

    // Initialize logging
    let log_level = if cli.verbose || config.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "tirage={},tirage_groups={},tirage_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let draw_file = match &cli.command {
        Commands::Draw(args) => args.file.clone(),
        _ => None,
    };

    // Execute command
    let result = match cli.command {
        Commands::Draw(args) => commands::handle_draw_command(args, &config).await,
        Commands::Validate { file, json } => commands::handle_validate_command(&file, json),
        Commands::Preview { file, json } => commands::handle_preview_command(&file, json),
        Commands::Names {
            count,
            format,
            names,
        } => commands::handle_names_command(count, &format, &names),
        Commands::History(cmd) => commands::handle_history_command(cmd, &config).await,
    };

    if let Err(e) = result {
        for line in error_report(&e, draw_file.as_deref()) {
            eprintln!("{}", line);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Lines printed for a failed command.
fn error_report(e: &anyhow::Error, draw_file: Option<&Path>) -> Vec<String> {
    match e.downcast_ref::<DrawError>() {
        Some(DrawError::Config(err)) => {
            let mut lines = vec![format!("Error: {}", err)];
            if let Some(path) = draw_file {
                lines.push(format!(
                    "Use 'tirage preview {}' to see every open issue",
                    path.display()
                ));
            }
            lines
        }
        Some(DrawError::InvalidState(msg)) => vec![format!("Error: {}", msg)],
        _ => vec![format!("Error: {:#}", e)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirage_groups::ConfigError;

    #[test]
    fn test_refused_draw_reported_once() {
        let err = anyhow::Error::from(DrawError::Config(ConfigError::TooFewParticipants {
            count: 3,
        }));

        let wizard = error_report(&err, None);
        assert_eq!(wizard.len(), 1);
        assert!(wizard[0].starts_with("Error: "));
        assert!(wizard[0].contains("(currently 3)"));

        let from_file = error_report(&err, Some(Path::new("cup.json")));
        assert_eq!(from_file.len(), 2);
        assert_eq!(from_file[0], wizard[0]);
        assert_eq!(
            from_file[1],
            "Use 'tirage preview cup.json' to see every open issue"
        );
    }

    #[test]
    fn test_other_errors_keep_their_context() {
        let err = anyhow::anyhow!("disk full").context("Failed to read draw file x.json");
        assert_eq!(
            error_report(&err, None),
            vec!["Error: Failed to read draw file x.json: disk full".to_string()]
        );
    }
}
