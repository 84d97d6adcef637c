//! The persisted progress record and its mutations.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Most recent emotion entries kept; older ones are evicted first.
pub const EMOTION_HISTORY_CAP: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionEntry {
    pub timestamp: NaiveDateTime,
    pub risk_score: f64,
    pub primary_emotion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub text: String,
    pub completed_at: NaiveDateTime,
}

/// Cumulative study progress for one installation.
///
/// Invariants: `longest_streak >= current_streak`; `daily_seconds` only has
/// keys for days with at least one logged second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub daily_seconds: BTreeMap<NaiveDate, u64>,
    pub total_study_seconds: u64,
    pub sessions_completed: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_study_date: Option<NaiveDate>,
    pub emotion_history: Vec<EmotionEntry>,
    pub completed_tasks: Vec<CompletedTask>,
}

impl ProgressRecord {
    pub fn seconds_on(&self, date: NaiveDate) -> u64 {
        self.daily_seconds.get(&date).copied().unwrap_or(0)
    }

    /// Log a finished session of `seconds` on `today` and update the streak.
    pub fn add_session_time(&mut self, today: NaiveDate, seconds: u64, threshold_secs: u64) {
        if seconds > 0 {
            *self.daily_seconds.entry(today).or_insert(0) += seconds;
        }
        self.total_study_seconds += seconds;
        self.sessions_completed += 1;
        self.update_streak(today, threshold_secs);
    }

    /// Count `today` toward the streak once it has met `threshold_secs`.
    pub fn update_streak(&mut self, today: NaiveDate, threshold_secs: u64) {
        if self.seconds_on(today) < threshold_secs {
            return;
        }

        match self.last_study_date {
            None => self.current_streak = 1,
            Some(last) => match (today - last).num_days() {
                0 => {}
                1 => self.current_streak += 1,
                // A gap, or a last date ahead of today: the streak is broken.
                _ => self.current_streak = 1,
            },
        }

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_study_date = Some(today);
    }

    pub fn add_emotion_entry(&mut self, now: NaiveDateTime, risk_score: f64, label: &str) {
        self.emotion_history.push(EmotionEntry {
            timestamp: now,
            risk_score,
            primary_emotion: label.to_string(),
        });
        if self.emotion_history.len() > EMOTION_HISTORY_CAP {
            let excess = self.emotion_history.len() - EMOTION_HISTORY_CAP;
            self.emotion_history.drain(..excess);
        }
    }

    pub fn add_completed_task(&mut self, now: NaiveDateTime, text: &str) {
        self.completed_tasks.push(CompletedTask {
            text: text.to_string(),
            completed_at: now,
        });
    }
}
