//! Session phase and countdown state.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focus -> (ShortBreak | LongBreak) -> Focus -> ...
//! any running phase --stop--> (same phase, not running)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl BreakKind {
    pub fn phase(&self) -> Phase {
        match self {
            BreakKind::Short => Phase::ShortBreak,
            BreakKind::Long => Phase::LongBreak,
        }
    }
}

/// Which break should follow the `session_count`-th focus run.
///
/// Every `sessions_before_long_break`-th focus run earns a long break. An
/// interval of 0 disables long breaks.
pub fn next_break_kind(session_count: u64, sessions_before_long_break: u32) -> BreakKind {
    let interval = u64::from(sessions_before_long_break);
    if interval > 0 && session_count > 0 && session_count % interval == 0 {
        BreakKind::Long
    } else {
        BreakKind::Short
    }
}

/// Countdown state owned by a [`SessionScheduler`](super::SessionScheduler).
///
/// Invariants: `remaining_secs <= total_secs` and `paused` implies `running`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub running: bool,
    pub paused: bool,
    /// Incremented once per focus start.
    pub session_count: u64,
    /// Incremented once per focus run that counted down to zero.
    pub completed_sessions: u64,
}

impl SessionState {
    /// Remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        let (minutes, seconds) = (self.remaining_secs / 60, self.remaining_secs % 60);
        format!("{minutes:02}:{seconds:02}")
    }

    /// 0.0 .. 100.0 progress within the current run.
    pub fn progress_pct(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.total_secs as f64 * 100.0
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            running: self.running,
            paused: self.paused,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress_pct: self.progress_pct(),
            formatted_time: self.formatted_remaining(),
            session_count: self.session_count,
            completed_sessions: self.completed_sessions,
        }
    }

    pub(crate) fn begin(&mut self, phase: Phase, duration_minutes: u32) {
        self.phase = phase;
        self.total_secs = u64::from(duration_minutes) * 60;
        self.remaining_secs = self.total_secs;
        self.running = true;
        self.paused = false;
        if phase == Phase::Focus {
            self.session_count += 1;
        }
    }
}

/// Read-only view of the scheduler for display and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress_pct: f64,
    pub formatted_time: String,
    pub session_count: u64,
    pub completed_sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        let state = SessionState {
            remaining_secs: 25 * 60 - 1,
            total_secs: 25 * 60,
            ..Default::default()
        };
        assert_eq!(state.formatted_remaining(), "24:59");
    }

    #[test]
    fn long_runs_keep_all_minute_digits() {
        let state = SessionState {
            remaining_secs: 120 * 60,
            total_secs: 120 * 60,
            ..Default::default()
        };
        assert_eq!(state.formatted_remaining(), "120:00");
    }

    #[test]
    fn only_break_phases_are_breaks() {
        assert!(Phase::ShortBreak.is_break());
        assert!(Phase::LongBreak.is_break());
        assert!(BreakKind::Long.phase().is_break());
        assert!(!Phase::Focus.is_break());
        assert!(!Phase::Idle.is_break());
    }

    #[test]
    fn progress_is_zero_without_total() {
        let state = SessionState::default();
        assert_eq!(state.progress_pct(), 0.0);
        assert_eq!(state.elapsed_secs(), 0);
    }

    #[test]
    fn progress_and_elapsed_track_remaining() {
        let state = SessionState {
            remaining_secs: 45,
            total_secs: 60,
            ..Default::default()
        };
        assert_eq!(state.elapsed_secs(), 15);
        assert_eq!(state.progress_pct(), 25.0);
    }

    #[test]
    fn begin_focus_counts_sessions_but_breaks_do_not() {
        let mut state = SessionState::default();
        state.begin(Phase::Focus, 25);
        assert_eq!(state.session_count, 1);
        assert_eq!(state.total_secs, 1500);
        assert_eq!(state.remaining_secs, 1500);
        state.begin(Phase::ShortBreak, 5);
        assert_eq!(state.session_count, 1);
        assert_eq!(state.phase, Phase::ShortBreak);
        assert!(state.running && !state.paused);
    }

    #[test]
    fn every_fourth_session_earns_a_long_break() {
        assert_eq!(next_break_kind(1, 4), BreakKind::Short);
        assert_eq!(next_break_kind(4, 4), BreakKind::Long);
        assert_eq!(next_break_kind(8, 4), BreakKind::Long);
        assert_eq!(next_break_kind(0, 4), BreakKind::Short);
        assert_eq!(next_break_kind(4, 0), BreakKind::Short);
    }
}
