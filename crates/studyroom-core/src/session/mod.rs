mod scheduler;
mod state;

pub use scheduler::{SessionListener, SessionScheduler};
pub use state::{next_break_kind, BreakKind, Phase, SessionSnapshot, SessionState};
