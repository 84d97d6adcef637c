//! Read-only statistics over a [`ProgressRecord`].

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::record::ProgressRecord;
use super::GoalConfig;

/// Risk difference between halves that counts as a trend.
const TREND_DELTA: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayStats {
    pub date: NaiveDate,
    pub study_seconds: u64,
    pub study_minutes: u64,
    pub study_time_formatted: String,
    /// 0.0 ..= 100.0
    pub goal_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBreakdown {
    pub day: String,
    pub date: NaiveDate,
    pub minutes: u64,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub week_start: NaiveDate,
    pub total_minutes: u64,
    pub total_formatted: String,
    /// Monday through Sunday.
    pub daily_breakdown: Vec<DayBreakdown>,
    pub goal_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub goal: u32,
    /// Not clamped: exceeds 100 once the streak passes the goal.
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionInsights {
    pub average_risk: f64,
    pub most_common_emotion: String,
    pub trend: Trend,
    pub total_entries: usize,
}

impl EmotionInsights {
    fn neutral() -> Self {
        Self {
            average_risk: 0.0,
            most_common_emotion: "neutral".to_string(),
            trend: Trend::Stable,
            total_entries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeStats {
    pub total_study_seconds: u64,
    pub total_formatted: String,
    pub sessions_completed: u64,
    pub tasks_completed: usize,
    pub days_studied: usize,
    pub longest_streak: u32,
}

/// `"{h}h {m}m"` from one hour up, `"{m}m"` below.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Percent of `goal_secs` reached, clamped to 0..=100. A zero goal is met.
pub fn goal_progress(current_secs: u64, goal_secs: u64) -> f64 {
    if goal_secs == 0 {
        return 100.0;
    }
    (current_secs as f64 / goal_secs as f64 * 100.0).clamp(0.0, 100.0)
}

impl ProgressRecord {
    pub fn today_stats(&self, today: NaiveDate, goals: &GoalConfig) -> TodayStats {
        let seconds = self.seconds_on(today);
        TodayStats {
            date: today,
            study_seconds: seconds,
            study_minutes: seconds / 60,
            study_time_formatted: format_duration(seconds),
            goal_progress: goal_progress(seconds, u64::from(goals.daily_minutes) * 60),
        }
    }

    pub fn week_stats(&self, today: NaiveDate, goals: &GoalConfig) -> WeekStats {
        let week_start =
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

        let mut total_secs = 0;
        let daily_breakdown = week_start
            .iter_days()
            .take(7)
            .map(|date| {
                let seconds = self.seconds_on(date);
                total_secs += seconds;
                DayBreakdown {
                    day: date.format("%A").to_string(),
                    date,
                    minutes: seconds / 60,
                    formatted: format_duration(seconds),
                }
            })
            .collect();

        WeekStats {
            week_start,
            total_minutes: total_secs / 60,
            total_formatted: format_duration(total_secs),
            daily_breakdown,
            goal_progress: goal_progress(total_secs, u64::from(goals.weekly_minutes) * 60),
        }
    }

    pub fn streak_info(&self, goals: &GoalConfig) -> StreakInfo {
        let progress = if goals.streak_days == 0 {
            100.0
        } else {
            f64::from(self.current_streak) / f64::from(goals.streak_days) * 100.0
        };
        StreakInfo {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            goal: goals.streak_days,
            progress,
        }
    }

    /// Summarize emotion entries newer than `window_days` before `now`.
    pub fn emotion_insights(&self, now: NaiveDateTime, window_days: u32) -> EmotionInsights {
        let cutoff = now - Duration::days(i64::from(window_days));
        let scores: Vec<(f64, &str)> = self
            .emotion_history
            .iter()
            .filter(|e| e.timestamp > cutoff)
            .map(|e| (e.risk_score, e.primary_emotion.as_str()))
            .collect();

        if scores.is_empty() {
            return EmotionInsights::neutral();
        }

        let risks: Vec<f64> = scores.iter().map(|(risk, _)| *risk).collect();
        EmotionInsights {
            average_risk: mean(&risks),
            most_common_emotion: most_common(scores.iter().map(|(_, label)| *label)),
            trend: trend(&risks),
            total_entries: scores.len(),
        }
    }

    pub fn all_time_stats(&self) -> AllTimeStats {
        AllTimeStats {
            total_study_seconds: self.total_study_seconds,
            total_formatted: format_duration(self.total_study_seconds),
            sessions_completed: self.sessions_completed,
            tasks_completed: self.completed_tasks.len(),
            days_studied: self.daily_seconds.len(),
            longest_streak: self.longest_streak,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Most frequent label; among equal counts the one seen first wins.
fn most_common<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map_or_else(|| "neutral".to_string(), |(label, _)| label.to_string())
}

/// Compare the mean risk of the older half against the newer half.
fn trend(risks: &[f64]) -> Trend {
    if risks.len() < 2 {
        return Trend::InsufficientData;
    }
    let (first, second) = risks.split_at(risks.len() / 2);
    let (first, second) = (mean(first), mean(second));
    if second <= first - TREND_DELTA {
        Trend::Improving
    } else if second >= first + TREND_DELTA {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
