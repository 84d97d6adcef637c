//! # Studyroom Core Library
//!
//! This library provides the core business logic for Studyroom, a focus/break
//! session timer whose pacing adapts to an external emotional-risk signal.
//! All operations are available through the standalone CLI binary; any GUI is
//! expected to be a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Scheduler**: A background countdown state machine with
//!   pause/resume/stop/reset and tick/phase/completion notifications
//! - **Progress Tracker**: Durable daily/weekly study time, streaks, emotion
//!   history and goal progress
//! - **Adaptive Policy**: Maps a risk score to the next focus duration
//! - **Storage**: SQLite-backed record storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: Countdown driver for focus and break runs
//! - [`ProgressTracker`]: Study statistics persistence and aggregation
//! - [`Config`]: Application configuration management
//! - [`Clock`]: Injectable wall-clock source

pub mod adaptive;
pub mod clock;
pub mod emotion;
pub mod error;
pub mod events;
pub mod progress;
pub mod session;
pub mod storage;

pub use adaptive::{adjust, AdaptivePolicy, RiskLevel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use emotion::{EmotionAnalysis, EmotionClassifier, LabeledEmotion, RiskTier};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::SessionEvent;
pub use progress::{
    AllTimeStats, CompletedTask, DayBreakdown, EmotionEntry, EmotionInsights, GoalConfig,
    ProgressRecord, ProgressTracker, StreakInfo, TodayStats, Trend, WeekStats,
};
pub use session::{
    next_break_kind, BreakKind, Phase, SessionListener, SessionScheduler, SessionSnapshot,
    SessionState,
};
pub use storage::{Config, Database, ProgressStore};
