//! Timer phase machine.
//!
//! A wall-clock-based countdown that alternates work and break intervals
//! forever once started. It does not use internal threads: the driver calls
//! [`TimerMachine::poll`] periodically and the internal [`Ticker`] decides
//! whether a tick is due.
//!
//! ## State Transitions
//!
//! ```text
//!            start                 tick (remaining <= 0)
//! Stopped ---------> RunningWork <-----------------------> RunningBreak
//!    ^                    |                                     |
//!    +------- stop -------+-------------- stop -----------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TimerMachine::hydrate(store, clock, TimerSettings::default(), tick)?;
//! timer.start(&mut log)?;
//! // In a loop:
//! timer.poll(&mut log)?; // Returns Some(IntervalFinished) when a phase ends
//! ```

use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::ticker::Ticker;
use crate::clock::Clock;
use crate::duration::MILLIS_IN_MINUTE;
use crate::error::{Result, StorageError, TimerError};
use crate::events::{EventLog, LogEvent};
use crate::storage::{self, keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Stopped,
    RunningWork,
    RunningBreak,
}

impl Phase {
    pub fn is_running(self) -> bool {
        !matches!(self, Phase::Stopped)
    }

    /// The phase that follows this one in the work/break cycle.
    pub fn next(self) -> Phase {
        match self {
            Phase::RunningWork => Phase::RunningBreak,
            Phase::RunningBreak | Phase::Stopped => Phase::RunningWork,
        }
    }

    fn start_event(self) -> Option<LogEvent> {
        match self {
            Phase::RunningWork => Some(LogEvent::StartWorkInterval),
            Phase::RunningBreak => Some(LogEvent::StartBreakInterval),
            Phase::Stopped => None,
        }
    }

    fn finish_event(self) -> Option<LogEvent> {
        match self {
            Phase::RunningWork => Some(LogEvent::FinishWorkInterval),
            Phase::RunningBreak => Some(LogEvent::FinishBreakInterval),
            Phase::Stopped => None,
        }
    }

    fn stop_event(self) -> Option<LogEvent> {
        match self {
            Phase::RunningWork => Some(LogEvent::StopWork),
            Phase::RunningBreak => Some(LogEvent::StopBreak),
            Phase::Stopped => None,
        }
    }
}

/// Work and break lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_duration_ms: u64,
    pub break_duration_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration_ms: 25 * MILLIS_IN_MINUTE,
            break_duration_ms: 5 * MILLIS_IN_MINUTE,
        }
    }
}

/// Full timer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub work_duration_ms: u64,
    pub break_duration_ms: u64,
    pub remaining_ms: u64,
    pub last_phase_start: Option<DateTime<Utc>>,
}

impl TimerState {
    /// A stopped timer showing the work duration as "up next".
    pub fn stopped(settings: TimerSettings) -> Self {
        Self {
            phase: Phase::Stopped,
            work_duration_ms: settings.work_duration_ms,
            break_duration_ms: settings.break_duration_ms,
            remaining_ms: settings.work_duration_ms,
            last_phase_start: None,
        }
    }

    /// Length of the given phase. Stopped counts as work.
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::RunningBreak => self.break_duration_ms,
            Phase::RunningWork | Phase::Stopped => self.work_duration_ms,
        }
    }
}

/// Persisted under `timer_state`; remaining lives under its own key.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedTimer {
    work_duration_ms: u64,
    break_duration_ms: u64,
    phase: Phase,
    #[serde(default)]
    last_phase_start: Option<DateTime<Utc>>,
}

/// Reported by [`TimerMachine::poll`] when a phase runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalFinished {
    pub finished: Phase,
    pub next: Phase,
    pub at: DateTime<Utc>,
}

/// Core timer state machine.
///
/// Every transition is logged, persisted, and then published on the phase
/// and remaining streams, in that order.
pub struct TimerMachine {
    state: TimerState,
    defaults: TimerSettings,
    /// Wall-clock deadline of the running phase.
    phase_end: Option<DateTime<Utc>>,
    ticker: Ticker,
    clock: Rc<dyn Clock>,
    store: Rc<dyn Store>,
    phase_tx: watch::Sender<Phase>,
    remaining_tx: watch::Sender<u64>,
}

impl TimerMachine {
    /// Restore the timer from the store, or build a stopped one from
    /// `defaults`.
    ///
    /// A running phase resumes with its persisted remaining time counted
    /// from now; downtime is not subtracted.
    pub fn hydrate(
        store: Rc<dyn Store>,
        clock: Rc<dyn Clock>,
        defaults: TimerSettings,
        tick: std::time::Duration,
    ) -> Result<Self, StorageError> {
        let state = load_state(store.as_ref(), defaults)?;

        let now = clock.now();
        let mut ticker = Ticker::new(tick);
        let phase_end = if state.phase.is_running() {
            ticker.arm(now);
            Some(deadline(now, state.remaining_ms))
        } else {
            None
        };

        debug!(phase = ?state.phase, remaining_ms = state.remaining_ms, "hydrated timer");

        let (phase_tx, _) = watch::channel(state.phase);
        let (remaining_tx, _) = watch::channel(state.remaining_ms);

        Ok(Self {
            state,
            defaults,
            phase_end,
            ticker,
            clock,
            store,
            phase_tx,
            remaining_tx,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state.remaining_ms
    }

    pub fn work_duration_ms(&self) -> u64 {
        self.state.work_duration_ms
    }

    pub fn break_duration_ms(&self) -> u64 {
        self.state.break_duration_ms
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Phase stream. The receiver sees the current phase immediately.
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    /// Remaining-millis stream. The receiver sees the current value
    /// immediately.
    pub fn subscribe_remaining(&self) -> watch::Receiver<u64> {
        self.remaining_tx.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, log: &mut EventLog) -> Result<()> {
        if self.state.phase.is_running() {
            return Err(TimerError::AlreadyRunning.into());
        }

        let now = self.clock.now();
        self.begin_phase(Phase::RunningWork, now, log)?;
        self.ticker.arm(now);
        Ok(())
    }

    pub fn stop(&mut self, log: &mut EventLog) -> Result<()> {
        let stopped = self.state.phase;
        let Some(event) = stopped.stop_event() else {
            return Err(TimerError::AlreadyStopped.into());
        };

        // No tick may land between here and the phase change.
        self.ticker.cancel();
        self.phase_end = None;

        log.append(event)?;
        self.state.phase = Phase::Stopped;
        self.state.remaining_ms = self.state.work_duration_ms;
        self.state.last_phase_start = None;
        info!(from = ?stopped, "timer stopped");

        self.save_state()?;
        self.publish_phase();
        self.publish_remaining(self.state.remaining_ms)
    }

    pub fn set_work_duration(&mut self, millis: u64) -> Result<()> {
        if self.state.phase.is_running() {
            return Err(TimerError::Running.into());
        }

        self.state.work_duration_ms = millis;
        self.save_state()?;
        self.publish_remaining(millis)
    }

    pub fn set_break_duration(&mut self, millis: u64) -> Result<()> {
        if self.state.phase.is_running() {
            return Err(TimerError::Running.into());
        }

        self.state.break_duration_ms = millis;
        self.save_state()?;
        Ok(())
    }

    /// Back to a stopped timer with the default durations. Allowed in any
    /// phase and not logged.
    pub fn reset(&mut self) -> Result<()> {
        self.ticker.cancel();
        self.phase_end = None;
        self.state = TimerState::stopped(self.defaults);

        self.save_state()?;
        self.publish_phase();
        self.publish_remaining(self.state.remaining_ms)
    }

    /// Pick up timer changes another handle wrote to the store.
    ///
    /// When the persisted phase, phase start or durations differ from ours,
    /// the stored timer wins and the ticker is re-armed or cancelled to
    /// match. Returns whether anything was adopted.
    pub fn reload(&mut self) -> Result<bool, StorageError> {
        let stored = load_state(self.store.as_ref(), self.defaults)?;
        let unchanged = stored.phase == self.state.phase
            && stored.last_phase_start == self.state.last_phase_start
            && stored.work_duration_ms == self.state.work_duration_ms
            && stored.break_duration_ms == self.state.break_duration_ms;
        if unchanged {
            return Ok(false);
        }

        info!(from = ?self.state.phase, to = ?stored.phase, "adopting stored timer state");
        let now = self.clock.now();
        if stored.phase.is_running() {
            self.phase_end = Some(deadline(now, stored.remaining_ms));
            self.ticker.arm(now);
        } else {
            self.phase_end = None;
            self.ticker.cancel();
        }
        self.state = stored;

        self.publish_phase();
        self.remaining_tx.send_replace(self.state.remaining_ms);
        Ok(true)
    }

    /// Run a tick if one is due.
    pub fn poll(&mut self, log: &mut EventLog) -> Result<Option<IntervalFinished>> {
        let now = self.clock.now();
        if !self.ticker.fire(now) {
            return Ok(None);
        }
        self.tick(now, log)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick(&mut self, now: DateTime<Utc>, log: &mut EventLog) -> Result<Option<IntervalFinished>> {
        let finished = self.state.phase;
        let (Some(end), Some(finish_event)) = (self.phase_end, finished.finish_event()) else {
            return Ok(None);
        };

        let left = (end - now).num_milliseconds();
        if left > 0 {
            let left = (left as u64).min(self.state.duration_of(finished));
            self.publish_remaining(left)?;
            return Ok(None);
        }

        self.publish_remaining(0)?;
        log.append_at(finish_event, now)?;

        let next = finished.next();
        self.begin_phase(next, now, log)?;
        Ok(Some(IntervalFinished {
            finished,
            next,
            at: now,
        }))
    }

    fn begin_phase(&mut self, phase: Phase, now: DateTime<Utc>, log: &mut EventLog) -> Result<()> {
        let Some(event) = phase.start_event() else {
            return Ok(());
        };

        let duration = self.state.duration_of(phase);
        self.state.phase = phase;
        self.state.remaining_ms = duration;
        self.state.last_phase_start = Some(now);
        self.phase_end = Some(deadline(now, duration));
        log.append_at(event, now)?;
        info!(?phase, duration_ms = duration, "phase started");

        self.save_state()?;
        self.publish_phase();
        self.publish_remaining(duration)
    }

    fn publish_phase(&self) {
        self.phase_tx.send_replace(self.state.phase);
    }

    fn publish_remaining(&mut self, millis: u64) -> Result<()> {
        self.state.remaining_ms = millis;
        storage::save(self.store.as_ref(), keys::TIMER_REMAINING, &millis)?;
        self.remaining_tx.send_replace(millis);
        Ok(())
    }

    fn save_state(&self) -> Result<()> {
        let persisted = PersistedTimer {
            work_duration_ms: self.state.work_duration_ms,
            break_duration_ms: self.state.break_duration_ms,
            phase: self.state.phase,
            last_phase_start: self.state.last_phase_start,
        };
        storage::save(self.store.as_ref(), keys::TIMER_STATE, &persisted)?;
        Ok(())
    }
}

/// Persisted timer, or a stopped one built from `defaults`.
///
/// A running phase takes its remaining time from `timer_remaining`, clamped
/// to the phase duration; a stopped timer shows the work duration.
fn load_state(store: &dyn Store, defaults: TimerSettings) -> Result<TimerState, StorageError> {
    let persisted: Option<PersistedTimer> =
        storage::load(store, keys::TIMER_STATE)?.or_default_for(keys::TIMER_STATE);
    let remaining: Option<u64> =
        storage::load(store, keys::TIMER_REMAINING)?.or_default_for(keys::TIMER_REMAINING);

    let Some(p) = persisted else {
        return Ok(TimerState::stopped(defaults));
    };

    let mut state = TimerState {
        phase: p.phase,
        work_duration_ms: p.work_duration_ms,
        break_duration_ms: p.break_duration_ms,
        remaining_ms: 0,
        last_phase_start: p.last_phase_start,
    };
    let duration = state.duration_of(state.phase);
    state.remaining_ms = if state.phase.is_running() {
        remaining.map_or(duration, |r| r.min(duration))
    } else {
        duration
    };
    Ok(state)
}

fn deadline(now: DateTime<Utc>, millis: u64) -> DateTime<Utc> {
    i64::try_from(millis)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CoreError;
    use crate::events::LogKind;
    use crate::storage::MemoryStore;

    const WORK: u64 = 1_500_000;
    const BREAK: u64 = 300_000;
    const TICK: std::time::Duration = std::time::Duration::from_millis(100);

    struct Fixture {
        store: Rc<MemoryStore>,
        clock: ManualClock,
        log: EventLog,
        timer: TimerMachine,
    }

    fn fixture() -> Fixture {
        let store = Rc::new(MemoryStore::new());
        let clock = ManualClock::default();
        let log = EventLog::hydrate(store.clone(), Rc::new(clock.clone())).unwrap();
        let timer = TimerMachine::hydrate(
            store.clone(),
            Rc::new(clock.clone()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        Fixture {
            store,
            clock,
            log,
            timer,
        }
    }

    impl Fixture {
        fn elapse(&mut self, millis: u64) -> Option<IntervalFinished> {
            self.clock.advance_ms(millis);
            self.timer.poll(&mut self.log).unwrap()
        }
    }

    #[test]
    fn starts_stopped_showing_work_duration() {
        let f = fixture();
        assert_eq!(f.timer.phase(), Phase::Stopped);
        assert_eq!(f.timer.remaining_ms(), WORK);
        assert!(!f.timer.is_ticking());
    }

    #[test]
    fn start_enters_work_and_logs() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        assert_eq!(f.timer.phase(), Phase::RunningWork);
        assert_eq!(f.timer.remaining_ms(), WORK);
        assert_eq!(f.timer.state().last_phase_start, Some(f.clock.now()));
        assert_eq!(f.log.latest().unwrap().kind(), LogKind::StartWorkInterval);
        assert!(f.timer.is_ticking());
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        let err = f.timer.start(&mut f.log).unwrap_err();
        assert!(matches!(err, CoreError::Timer(TimerError::AlreadyRunning)));
        assert_eq!(f.log.len(), 1);
    }

    #[test]
    fn ticks_count_down() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        assert!(f.elapse(60_000).is_none());
        assert_eq!(f.timer.remaining_ms(), WORK - 60_000);
        assert_eq!(f.timer.phase(), Phase::RunningWork);
    }

    #[test]
    fn no_tick_before_period() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        assert!(f.elapse(50).is_none());
        assert_eq!(f.timer.remaining_ms(), WORK);
    }

    #[test]
    fn work_rolls_into_break() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        let finished = f.elapse(WORK).unwrap();

        assert_eq!(finished.finished, Phase::RunningWork);
        assert_eq!(finished.next, Phase::RunningBreak);
        assert_eq!(f.timer.phase(), Phase::RunningBreak);
        assert_eq!(f.timer.remaining_ms(), BREAK);
        assert_eq!(
            f.log.recent_kinds(3),
            vec![
                LogKind::StartWorkInterval,
                LogKind::FinishWorkInterval,
                LogKind::StartBreakInterval
            ]
        );
    }

    #[test]
    fn rollover_republishes_remaining() {
        let mut f = fixture();
        let mut remaining = f.timer.subscribe_remaining();
        f.timer.start(&mut f.log).unwrap();
        remaining.borrow_and_update();

        f.elapse(WORK);
        assert!(remaining.has_changed().unwrap());
        assert_eq!(*remaining.borrow_and_update(), BREAK);
        assert_eq!(
            f.store.raw(keys::TIMER_REMAINING).as_deref(),
            Some(r#"{"version":1,"data":300000}"#)
        );
    }

    /// Keeps every value written under `timer_remaining`.
    #[derive(Default)]
    struct RemainingRecorder {
        inner: MemoryStore,
        written: RefCell<Vec<u64>>,
    }

    impl Store for RemainingRecorder {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == keys::TIMER_REMAINING {
                if let storage::Decoded::Present(millis) = storage::decode::<u64>(Some(value)) {
                    self.written.borrow_mut().push(millis);
                }
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn rollover_publishes_zero_exactly_once() {
        let store = Rc::new(RemainingRecorder::default());
        let clock = ManualClock::default();
        let mut log = EventLog::hydrate(store.clone(), Rc::new(clock.clone())).unwrap();
        let mut timer = TimerMachine::hydrate(
            store.clone(),
            Rc::new(clock.clone()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();

        timer.start(&mut log).unwrap();
        clock.advance_ms(WORK - 1_000);
        assert!(timer.poll(&mut log).unwrap().is_none());
        clock.advance_ms(1_000);
        assert!(timer.poll(&mut log).unwrap().is_some());
        clock.advance_ms(1_000);
        assert!(timer.poll(&mut log).unwrap().is_none());

        let written = store.written.borrow();
        assert_eq!(written.iter().filter(|&&millis| millis == 0).count(), 1);
        assert_eq!(*written, vec![WORK, 1_000, 0, BREAK, BREAK - 1_000]);
    }

    #[test]
    fn reload_adopts_stop_from_another_handle() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        f.elapse(60_000);

        let mut other = TimerMachine::hydrate(
            f.store.clone(),
            Rc::new(f.clock.clone()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        other.stop(&mut f.log).unwrap();

        let mut phase = f.timer.subscribe_phase();
        phase.borrow_and_update();
        assert!(f.timer.reload().unwrap());
        assert_eq!(f.timer.phase(), Phase::Stopped);
        assert_eq!(f.timer.remaining_ms(), WORK);
        assert!(!f.timer.is_ticking());
        assert!(phase.has_changed().unwrap());

        assert!(f.elapse(WORK).is_none());
        assert_eq!(f.log.latest().unwrap().kind(), LogKind::StopWork);
    }

    #[test]
    fn reload_keeps_own_deadline_when_nothing_changed() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        f.elapse(60_000);

        assert!(!f.timer.reload().unwrap());
        assert_eq!(f.timer.remaining_ms(), WORK - 60_000);
        assert!(f.elapse(WORK - 60_000).is_some());
    }

    #[test]
    fn stop_cancels_ticks_and_restores_work_duration() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        f.elapse(WORK);
        assert_eq!(f.timer.phase(), Phase::RunningBreak);

        f.timer.stop(&mut f.log).unwrap();
        assert_eq!(f.timer.phase(), Phase::Stopped);
        assert_eq!(f.timer.remaining_ms(), WORK);
        assert_eq!(f.log.latest().unwrap().kind(), LogKind::StopBreak);
        assert!(!f.timer.is_ticking());

        let entries = f.log.len();
        assert!(f.elapse(10 * WORK).is_none());
        assert_eq!(f.log.len(), entries);
        assert_eq!(f.timer.phase(), Phase::Stopped);
    }

    #[test]
    fn stop_when_stopped_is_rejected() {
        let mut f = fixture();
        let err = f.timer.stop(&mut f.log).unwrap_err();
        assert!(matches!(err, CoreError::Timer(TimerError::AlreadyStopped)));
        assert!(f.log.is_empty());
    }

    #[test]
    fn durations_locked_while_running() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        assert!(matches!(
            f.timer.set_work_duration(1_000),
            Err(CoreError::Timer(TimerError::Running))
        ));
        assert!(matches!(
            f.timer.set_break_duration(1_000),
            Err(CoreError::Timer(TimerError::Running))
        ));
        assert_eq!(f.timer.work_duration_ms(), WORK);
    }

    #[test]
    fn set_work_duration_republishes_remaining() {
        let mut f = fixture();
        let mut remaining = f.timer.subscribe_remaining();
        assert_eq!(*remaining.borrow_and_update(), WORK);

        f.timer.set_work_duration(600_000).unwrap();
        assert_eq!(f.timer.remaining_ms(), 600_000);
        assert!(remaining.has_changed().unwrap());
        assert_eq!(*remaining.borrow_and_update(), 600_000);

        f.timer.set_break_duration(60_000).unwrap();
        assert_eq!(f.timer.remaining_ms(), 600_000);
        assert_eq!(f.timer.break_duration_ms(), 60_000);
    }

    #[test]
    fn reset_restores_defaults_from_any_phase() {
        let mut f = fixture();
        f.timer.set_work_duration(1_000).unwrap();
        f.timer.start(&mut f.log).unwrap();
        f.timer.reset().unwrap();

        assert_eq!(f.timer.state(), &TimerState::stopped(TimerSettings::default()));
        assert!(!f.timer.is_ticking());
        assert_eq!(*f.timer.subscribe_phase().borrow(), Phase::Stopped);
    }

    #[test]
    fn subscribers_receive_current_phase() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        let phase = f.timer.subscribe_phase();
        assert_eq!(*phase.borrow(), Phase::RunningWork);
        let remaining = f.timer.subscribe_remaining();
        assert_eq!(*remaining.borrow(), WORK);
    }

    #[test]
    fn running_timer_rehydrates_without_downtime() {
        let mut f = fixture();
        f.timer.start(&mut f.log).unwrap();
        f.elapse(100_000);
        let saved = f.timer.state().clone();

        f.clock.advance_ms(3_600_000);
        let mut again = TimerMachine::hydrate(
            f.store.clone(),
            Rc::new(f.clock.clone()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        assert_eq!(again.state(), &saved);
        assert!(again.is_ticking());

        f.clock.advance_ms(WORK - 100_000);
        let finished = again.poll(&mut f.log).unwrap();
        assert_eq!(finished.map(|e| e.next), Some(Phase::RunningBreak));
    }

    #[test]
    fn corrupt_timer_state_falls_back_to_defaults() {
        let store = Rc::new(MemoryStore::new());
        store.set(keys::TIMER_STATE, "garbage").unwrap();
        store.set(keys::TIMER_REMAINING, r#"{"version":1,"data":-4}"#).unwrap();
        let timer = TimerMachine::hydrate(
            store,
            Rc::new(ManualClock::default()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        assert_eq!(timer.state(), &TimerState::stopped(TimerSettings::default()));
    }
}
