//! Group draw engine
//!
//! Splits participants into named groups, either fully at random or seeded
//! through pots so that every group receives one entrant per pot. A
//! configuration is checked by [`validate_config`] before the
//! [`DrawEngine`] allocates it; [`DrawSession`] walks a draw through its
//! configuration steps and [`DrawHistory`] keeps finished draws.

pub mod allocation;
pub mod error;
pub mod history;
pub mod naming;
pub mod preview;
pub mod session;
pub mod shuffle;
pub mod validation;

pub use allocation::{pots_draw, random_draw, DrawEngine};
pub use error::{DrawError, Result};
pub use history::{DrawHistory, HistoryEntry};
pub use naming::generate_group_names;
pub use preview::{ConfigIssue, ConfigPreview};
pub use session::{DrawSession, DrawStep};
pub use shuffle::shuffled;
pub use validation::{check_config, validate_config, ConfigError, ValidationReport};

use tirage_core::{DrawConfig, DrawResult};

/// Validate a configuration and draw it in one go.
pub fn draw(config: &DrawConfig) -> Result<DrawResult> {
    check_config(config)?;
    Ok(DrawEngine::for_config(config).draw(config))
}
