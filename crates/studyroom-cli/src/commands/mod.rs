pub mod config;
pub mod emotion;
pub mod stats;
pub mod task;
pub mod timer;

use std::sync::Arc;

use studyroom_core::{Config, Database, ProgressTracker, SystemClock};

/// Open the progress tracker over the default database.
pub fn open_tracker(config: &Config) -> Result<ProgressTracker, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(ProgressTracker::open(
        Box::new(db),
        config.goals(),
        Arc::new(SystemClock),
    ))
}

pub fn print_json<T: serde::Serialize + ?Sized>(
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
