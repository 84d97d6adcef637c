//! Study progress: daily/weekly time, streaks, emotion history and goals.

mod record;
mod stats;
mod tracker;

pub use record::{CompletedTask, EmotionEntry, ProgressRecord, EMOTION_HISTORY_CAP};
pub use stats::{
    format_duration, goal_progress, AllTimeStats, DayBreakdown, EmotionInsights, StreakInfo,
    TodayStats, Trend, WeekStats,
};
pub use tracker::ProgressTracker;

use serde::{Deserialize, Serialize};

/// Goal targets and the streak threshold, read from configuration at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub daily_minutes: u32,
    pub weekly_minutes: u32,
    pub streak_days: u32,
    /// Seconds a day needs before it counts toward the streak.
    pub streak_threshold_secs: u64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_minutes: 120,
            weekly_minutes: 840,
            streak_days: 7,
            streak_threshold_secs: 600,
        }
    }
}
