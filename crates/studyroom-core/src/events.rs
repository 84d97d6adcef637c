use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Notifications emitted by the session scheduler.
///
/// Ticks and completions for a run travel on the same listener, so a
/// completion is always the last event a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    PhaseChanged {
        phase: Phase,
        session_count: u64,
        at: NaiveDateTime,
    },
    Tick {
        remaining_secs: u64,
        total_secs: u64,
        phase: Phase,
        at: NaiveDateTime,
    },
    /// The countdown reached zero on its own (never sent for a stopped run).
    Completed {
        phase: Phase,
        session_count: u64,
        elapsed_secs: u64,
        at: NaiveDateTime,
    },
}

impl SessionEvent {
    pub fn phase(&self) -> Phase {
        match self {
            SessionEvent::PhaseChanged { phase, .. }
            | SessionEvent::Tick { phase, .. }
            | SessionEvent::Completed { phase, .. } => *phase,
        }
    }

    pub fn is_tick(&self) -> bool {
        matches!(self, SessionEvent::Tick { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn events_serialize_with_type_tag() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let event = SessionEvent::Tick {
            remaining_secs: 59,
            total_secs: 60,
            phase: Phase::ShortBreak,
            at,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Tick");
        assert_eq!(json["phase"], "short_break");
        assert!(event.is_tick());
        assert_eq!(event.phase(), Phase::ShortBreak);
    }
}
