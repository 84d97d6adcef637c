//! Session scheduler implementation.
//!
//! Each run is counted down by one tokio task. The task and the caller-facing
//! commands share a single [`SessionState`] behind one mutex; the task only
//! emits an event while holding that mutex and after checking that its run is
//! still the live one. `stop()` flips `running` under the same mutex and then
//! awaits the task, so once it returns the stopped run can no longer notify.
//!
//! ## Usage
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let scheduler = SessionScheduler::new(Arc::new(SystemClock), tx);
//! scheduler.start_focus(25).await;
//! while let Some(event) = rx.recv().await { /* render */ }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

use super::state::{BreakKind, Phase, SessionSnapshot, SessionState};
use crate::clock::Clock;
use crate::events::SessionEvent;

const TICK: Duration = Duration::from_secs(1);

/// Receives scheduler notifications.
///
/// Called with the scheduler's state lock held: implementations must return
/// promptly and must not call back into the scheduler.
pub trait SessionListener: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

impl SessionListener for mpsc::UnboundedSender<SessionEvent> {
    fn on_event(&self, event: &SessionEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.send(event.clone());
    }
}

struct Inner {
    state: SessionState,
    /// Bumped on every start; a worker exits once its id is stale.
    run_id: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    wake: Notify,
    listener: Box<dyn SessionListener>,
    clock: Arc<dyn Clock>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        self.listener.on_event(&event);
    }
}

/// Focus/break countdown driver.
///
/// Must be used from within a tokio runtime.
pub struct SessionScheduler {
    shared: Arc<Shared>,
    /// Serializes start/stop so two workers never overlap.
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl SessionScheduler {
    pub fn new(clock: Arc<dyn Clock>, listener: impl SessionListener + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: SessionState::default(),
                    run_id: 0,
                }),
                wake: Notify::new(),
                listener: Box::new(listener),
                clock,
            }),
            worker: tokio::sync::Mutex::new(None),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().state.snapshot()
    }

    pub fn formatted_time(&self) -> String {
        self.shared.lock().state.formatted_remaining()
    }

    pub fn progress_pct(&self) -> f64 {
        self.shared.lock().state.progress_pct()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.shared.lock().state.elapsed_secs()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Cancel any in-flight run and start a focus run of `duration_minutes`.
    ///
    /// `duration_minutes` must be positive; clamp upstream.
    pub async fn start_focus(&self, duration_minutes: u32) {
        self.start(Phase::Focus, duration_minutes).await;
    }

    /// Cancel any in-flight run and start a break of `duration_minutes`.
    pub async fn start_break(&self, duration_minutes: u32, kind: BreakKind) {
        self.start(kind.phase(), duration_minutes).await;
    }

    /// Pause a running, unpaused countdown. Returns whether it took effect.
    pub fn pause(&self) -> bool {
        let mut inner = self.shared.lock();
        if !inner.state.running || inner.state.paused {
            return false;
        }
        inner.state.paused = true;
        drop(inner);
        self.shared.wake.notify_one();
        tracing::debug!("session paused");
        true
    }

    /// Resume a paused countdown. Returns whether it took effect.
    pub fn resume(&self) -> bool {
        let mut inner = self.shared.lock();
        if !inner.state.running || !inner.state.paused {
            return false;
        }
        inner.state.paused = false;
        drop(inner);
        self.shared.wake.notify_one();
        tracing::debug!("session resumed");
        true
    }

    /// Stop the current run.
    ///
    /// When this returns the countdown task has exited and no further event
    /// for the stopped run will be delivered.
    pub async fn stop(&self) {
        let mut worker = self.worker.lock().await;
        self.stop_worker(&mut worker).await;
    }

    /// Stop, then clear the phase, timing and counters.
    pub async fn reset(&self) {
        let mut worker = self.worker.lock().await;
        self.stop_worker(&mut worker).await;
        self.shared.lock().state = SessionState::default();
        tracing::debug!("session reset");
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn start(&self, phase: Phase, duration_minutes: u32) {
        let mut worker = self.worker.lock().await;
        self.stop_worker(&mut worker).await;

        let run_id = {
            let mut inner = self.shared.lock();
            inner.state.begin(phase, duration_minutes);
            inner.run_id += 1;
            let event = SessionEvent::PhaseChanged {
                phase,
                session_count: inner.state.session_count,
                at: self.shared.clock.now(),
            };
            self.shared.emit(event);
            inner.run_id
        };
        tracing::debug!(?phase, duration_minutes, "session started");

        *worker = Some(tokio::spawn(countdown(Arc::clone(&self.shared), run_id)));
    }

    async fn stop_worker(&self, worker: &mut Option<JoinHandle<()>>) {
        {
            let mut inner = self.shared.lock();
            inner.state.running = false;
            inner.state.paused = false;
        }
        self.shared.wake.notify_one();

        if let Some(handle) = worker.take() {
            if let Err(e) = handle.await {
                tracing::warn!("countdown task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for SessionScheduler {
    fn drop(&mut self) {
        self.shared.lock().state.running = false;
        if let Some(handle) = self.worker.get_mut().take() {
            handle.abort();
        }
    }
}

enum Step {
    Ended,
    Paused,
    Early,
    Ticked,
}

/// Count the run identified by `run_id` down to zero, one tick per second.
async fn countdown(shared: Arc<Shared>, run_id: u64) {
    let mut next_tick = Instant::now() + TICK;

    loop {
        tokio::select! {
            _ = time::sleep_until(next_tick) => {}
            _ = shared.wake.notified() => {}
        }

        match advance(&shared, run_id, next_tick) {
            Step::Ended => return,
            Step::Paused => {
                if !wait_for_resume(&shared, run_id).await {
                    return;
                }
                next_tick = Instant::now() + TICK;
            }
            // Woken by a command that did not end the run.
            Step::Early => {}
            Step::Ticked => next_tick += TICK,
        }
    }
}

/// One pass of the countdown under the state lock.
fn advance(shared: &Shared, run_id: u64, next_tick: Instant) -> Step {
    let mut inner = shared.lock();
    if inner.run_id != run_id || !inner.state.running {
        return Step::Ended;
    }
    if inner.state.paused {
        return Step::Paused;
    }
    if Instant::now() < next_tick {
        return Step::Early;
    }

    inner.state.remaining_secs = inner.state.remaining_secs.saturating_sub(1);
    let phase = inner.state.phase;
    shared.emit(SessionEvent::Tick {
        remaining_secs: inner.state.remaining_secs,
        total_secs: inner.state.total_secs,
        phase,
        at: shared.clock.now(),
    });

    if inner.state.remaining_secs > 0 {
        return Step::Ticked;
    }

    inner.state.running = false;
    if phase == Phase::Focus {
        inner.state.completed_sessions += 1;
    }
    shared.emit(SessionEvent::Completed {
        phase,
        session_count: inner.state.session_count,
        elapsed_secs: inner.state.total_secs,
        at: shared.clock.now(),
    });
    tracing::debug!(?phase, "session completed");
    Step::Ended
}

/// Block until the run is resumed (true) or ended (false).
async fn wait_for_resume(shared: &Shared, run_id: u64) -> bool {
    loop {
        shared.wake.notified().await;
        let (ended, paused) = {
            let inner = shared.lock();
            (
                inner.run_id != run_id || !inner.state.running,
                inner.state.paused,
            )
        };
        if ended {
            return false;
        }
        if !paused {
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;

    fn scheduler() -> (SessionScheduler, mpsc::UnboundedReceiver<SessionEvent>) {
        let clock = Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        (SessionScheduler::new(clock, tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn start_focus_sets_full_duration() {
        let (scheduler, mut rx) = scheduler();
        scheduler.start_focus(25).await;

        let state = scheduler.state();
        assert_eq!(state.phase, Phase::Focus);
        assert_eq!(state.total_secs, 1500);
        assert_eq!(state.remaining_secs, 1500);
        assert_eq!(state.session_count, 1);
        assert!(state.running && !state.paused);

        let events = drain(&mut rx);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::PhaseChanged {
                phase: Phase::Focus,
                session_count: 1,
                ..
            }]
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_report_whether_they_applied() {
        let (scheduler, _rx) = scheduler();
        assert!(!scheduler.pause());
        assert!(!scheduler.resume());

        scheduler.start_break(5, BreakKind::Short).await;
        assert!(!scheduler.resume());
        assert!(scheduler.pause());
        assert!(!scheduler.pause());
        assert!(scheduler.state().paused);
        assert!(scheduler.resume());
        assert!(!scheduler.resume());
    }

    #[tokio::test(start_paused = true)]
    async fn break_does_not_count_a_session() {
        let (scheduler, _rx) = scheduler();
        scheduler.start_break(15, BreakKind::Long).await;
        let state = scheduler.state();
        assert_eq!(state.phase, Phase::LongBreak);
        assert_eq!(state.session_count, 0);
        assert_eq!(state.total_secs, 900);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_counters() {
        let (scheduler, _rx) = scheduler();
        scheduler.start_focus(1).await;
        time::sleep(Duration::from_secs(61)).await;
        scheduler.start_focus(1).await;
        scheduler.reset().await;
        assert_eq!(scheduler.state(), SessionState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_keeps_phase_but_ends_run() {
        let (scheduler, _rx) = scheduler();
        scheduler.start_focus(1).await;
        time::sleep(Duration::from_millis(2500)).await;
        scheduler.stop().await;

        let state = scheduler.state();
        assert_eq!(state.phase, Phase::Focus);
        assert!(!state.running && !state.paused);
        assert_eq!(state.remaining_secs, 58);
        assert_eq!(scheduler.elapsed_secs(), 2);
        assert_eq!(state.completed_sessions, 0);
    }
}
