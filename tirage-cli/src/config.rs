use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const DB_FILE: &str = "draws.db";

/// Pause between announcing a draw and revealing its groups.
const DEFAULT_REVEAL_DELAY_MS: u64 = 1500;
const MAX_REVEAL_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub reveal_delay_ms: u64,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tirage"),
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            verbose: false,
        }
    }
}

impl CliConfig {
    /// Read `config.json` from `data_dir`, falling back to defaults when the
    /// file does not exist. The directory given on the command line always
    /// wins over the one stored in the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<CliConfig>(&content)
                .with_context(|| format!("Invalid CLI config in {}", path.display()))?
        } else {
            CliConfig::default()
        };

        config.data_dir = data_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            bail!("Data directory cannot be empty");
        }

        if self.reveal_delay_ms > MAX_REVEAL_DELAY_MS {
            bail!(
                "Reveal delay of {} ms is too long (max {} ms)",
                self.reveal_delay_ms,
                MAX_REVEAL_DELAY_MS
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}
