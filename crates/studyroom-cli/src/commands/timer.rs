use std::io::Write;
use std::sync::Arc;

use clap::Subcommand;
use studyroom_core::{
    adjust, next_break_kind, BreakKind, Config, Phase, SessionEvent, SessionScheduler,
    SessionSnapshot, SystemClock,
};
use tokio::sync::mpsc;

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a focus countdown in the foreground
    Focus {
        /// Duration in minutes (defaults to timer.focus_minutes)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: Option<u32>,
        /// Scale the duration by the most recent emotion check-in
        #[arg(long)]
        adaptive: bool,
    },
    /// Run a break countdown in the foreground
    Break {
        /// Duration in minutes (defaults to the configured break length)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: Option<u32>,
        /// Force a long break
        #[arg(long, conflicts_with = "short")]
        long: bool,
        /// Force a short break
        #[arg(long)]
        short: bool,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_tracker(&config)?;

    let (phase, minutes) = match action {
        TimerAction::Focus { minutes, adaptive } => {
            let mut minutes = minutes.unwrap_or(config.timer.focus_minutes).max(1);
            if adaptive {
                if let Some(entry) = tracker.record().emotion_history.last() {
                    let adjusted = adjust(entry.risk_score, minutes);
                    tracing::info!(
                        risk = entry.risk_score,
                        from = minutes,
                        to = adjusted,
                        "adaptive focus duration"
                    );
                    minutes = adjusted;
                }
            }
            (Phase::Focus, minutes)
        }
        TimerAction::Break {
            minutes,
            long,
            short,
        } => {
            let kind = if long {
                BreakKind::Long
            } else if short {
                BreakKind::Short
            } else {
                next_break_kind(
                    tracker.record().sessions_completed,
                    config.timer.sessions_before_long_break,
                )
            };
            let default = match kind {
                BreakKind::Short => config.timer.short_break_minutes,
                BreakKind::Long => config.timer.long_break_minutes,
            };
            (kind.phase(), minutes.unwrap_or(default).max(1))
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let snapshot = runtime.block_on(countdown(phase, minutes))?;
    let elapsed = snapshot.total_secs.saturating_sub(snapshot.remaining_secs);

    if phase.is_break() {
        tracing::debug!(elapsed, ?phase, "breaks are not logged");
    } else if elapsed >= config.timer.min_logged_seconds {
        tracker.add_session_time(elapsed)?;
    } else {
        tracing::debug!(elapsed, "run too short to log");
    }

    print_json(&snapshot)
}

/// Drive one run to completion or Ctrl-C.
async fn countdown(
    phase: Phase,
    minutes: u32,
) -> Result<SessionSnapshot, Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = SessionScheduler::new(Arc::new(SystemClock), tx);
    match phase {
        Phase::Focus => scheduler.start_focus(minutes).await,
        Phase::ShortBreak => scheduler.start_break(minutes, BreakKind::Short).await,
        Phase::LongBreak => scheduler.start_break(minutes, BreakKind::Long).await,
        Phase::Idle => return Ok(scheduler.snapshot()),
    }

    let mut stderr = std::io::stderr();
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(SessionEvent::Tick { .. }) => {
                    write!(stderr, "\r{} {}", phase.label(), scheduler.formatted_time())?;
                    stderr.flush()?;
                }
                Some(SessionEvent::Completed { .. }) => {
                    writeln!(stderr)?;
                    break;
                }
                Some(SessionEvent::PhaseChanged { .. }) => {}
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                scheduler.stop().await;
                writeln!(stderr)?;
                break;
            }
        }
    }
    Ok(scheduler.snapshot())
}
