mod config;
pub mod database;

pub use config::{Config, GoalsConfig, InsightsConfig, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;
use crate::progress::ProgressRecord;

/// Durable home of the single progress record.
pub trait ProgressStore: Send {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<ProgressRecord>>;

    /// Replace the stored record. Readers see either the old or the new one.
    fn save(&mut self, record: &ProgressRecord) -> Result<()>;
}

/// Returns the data directory, creating it if needed.
///
/// `STUDYROOM_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/studyroom`, or `~/.config/studyroom-dev` when
/// `STUDYROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyroom-dev")
            } else {
                base_dir.join("studyroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
