use clap::Subcommand;
use studyroom_core::Config;

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Log a completed task
    Done {
        /// Task description
        text: String,
    },
    /// List completed tasks as JSON
    List,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_tracker(&config)?;

    match action {
        TaskAction::Done { text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err("task text is empty".into());
            }
            tracker.add_completed_task(text)?;
            println!("ok");
        }
        TaskAction::List => {
            print_json(&tracker.record().completed_tasks)?;
        }
    }
    Ok(())
}
