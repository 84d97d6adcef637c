use clap::Subcommand;
use studyroom_core::Config;

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's study time and goal progress
    Today,
    /// Monday-to-Sunday breakdown for the current week
    Week,
    /// Current and longest streak
    Streak,
    /// Emotion trend over recent check-ins
    Emotions {
        /// Trailing window in days (defaults to insights.window_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// All-time totals
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_tracker(&config)?;

    match action {
        StatsAction::Today => print_json(&tracker.today_stats()),
        StatsAction::Week => print_json(&tracker.week_stats()),
        StatsAction::Streak => print_json(&tracker.streak_info()),
        StatsAction::Emotions { days } => {
            let days = days.unwrap_or(config.insights.window_days);
            print_json(&tracker.emotion_insights(days))
        }
        StatsAction::All => print_json(&tracker.all_time_stats()),
    }
}
