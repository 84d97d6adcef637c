//! Durable progress tracking.
//!
//! [`ProgressTracker`] owns the in-memory [`ProgressRecord`] and the store it
//! is flushed to. Every mutation runs read-modify-write-persist under one
//! mutex, so concurrent callers never lose each other's updates. A failed
//! write keeps the in-memory change; the next successful write carries it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::record::ProgressRecord;
use super::stats::{AllTimeStats, EmotionInsights, StreakInfo, TodayStats, WeekStats};
use super::GoalConfig;
use crate::clock::Clock;
use crate::emotion::EmotionAnalysis;
use crate::error::{CoreError, Result};
use crate::storage::ProgressStore;

struct Inner {
    record: ProgressRecord,
    store: Box<dyn ProgressStore>,
}

pub struct ProgressTracker {
    inner: Mutex<Inner>,
    goals: GoalConfig,
    clock: Arc<dyn Clock>,
}

impl ProgressTracker {
    /// Load the record from `store`, starting fresh if it is missing or unreadable.
    pub fn open(
        mut store: Box<dyn ProgressStore>,
        goals: GoalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let record = match store.load() {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::default(),
            Err(e) => {
                tracing::warn!("progress record unreadable, starting fresh: {e}");
                ProgressRecord::default()
            }
        };
        Self {
            inner: Mutex::new(Inner { record, store }),
            goals,
            clock,
        }
    }

    pub fn goals(&self) -> &GoalConfig {
        &self.goals
    }

    /// Copy of the current in-memory record.
    pub fn record(&self) -> ProgressRecord {
        self.lock().record.clone()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Log `seconds` of finished study for today and update the streak.
    ///
    /// Callers discard sub-minute noise before calling.
    pub fn add_session_time(&self, seconds: u64) -> Result<()> {
        let today = self.clock.today();
        let threshold = self.goals.streak_threshold_secs;
        self.mutate(|record| record.add_session_time(today, seconds, threshold))
    }

    /// Append an emotion check-in.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRiskScore`] without touching the record when
    /// `risk_score` is not a finite value in 0..=100.
    pub fn add_emotion_entry(&self, risk_score: f64, primary_emotion: &str) -> Result<()> {
        if !(0.0..=100.0).contains(&risk_score) {
            return Err(CoreError::InvalidRiskScore(risk_score));
        }
        let now = self.clock.now();
        self.mutate(|record| record.add_emotion_entry(now, risk_score, primary_emotion))
    }

    /// Record the risk score and primary label of an external analysis.
    pub fn add_emotion_analysis(&self, analysis: &EmotionAnalysis) -> Result<()> {
        let label = analysis.primary_label().unwrap_or("neutral");
        self.add_emotion_entry(analysis.risk_score, label)
    }

    pub fn add_completed_task(&self, text: &str) -> Result<()> {
        let now = self.clock.now();
        self.mutate(|record| record.add_completed_task(now, text))
    }

    /// Write the current record again, e.g. after an earlier write failed.
    pub fn flush(&self) -> Result<()> {
        let mut inner = self.lock();
        let Inner { record, store } = &mut *inner;
        store.save(record)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn today_stats(&self) -> TodayStats {
        self.lock().record.today_stats(self.clock.today(), &self.goals)
    }

    pub fn week_stats(&self) -> WeekStats {
        self.lock().record.week_stats(self.clock.today(), &self.goals)
    }

    pub fn streak_info(&self) -> StreakInfo {
        self.lock().record.streak_info(&self.goals)
    }

    pub fn emotion_insights(&self, window_days: u32) -> EmotionInsights {
        self.lock()
            .record
            .emotion_insights(self.clock.now(), window_days)
    }

    pub fn all_time_stats(&self) -> AllTimeStats {
        self.lock().record.all_time_stats()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, apply: impl FnOnce(&mut ProgressRecord)) -> Result<()> {
        let mut inner = self.lock();
        let Inner { record, store } = &mut *inner;
        apply(record);
        store.save(record).inspect_err(|e| {
            tracing::error!("failed to persist progress record: {e}");
        })
    }
}
