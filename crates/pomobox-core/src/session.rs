//! Composition root.
//!
//! A [`Session`] owns the event log, the task queue and the timer, hydrates
//! them from one store, and routes every operation through them in order.
//! The timer and the queue never see each other: the session watches the
//! timer's phase stream and activates the next task whenever a work phase
//! begins with nothing active.

use std::rc::Rc;

use tokio::sync::watch;
use tracing::debug;

use crate::clock::Clock;
use crate::duration::format_millis;
use crate::error::Result;
use crate::events::EventLog;
use crate::storage::{Config, Store};
use crate::task::{Task, TaskPatch, TaskQueue};
use crate::timer::{IntervalFinished, Phase, TimerMachine, TimerSettings};

const IDLE_HEADLINE: &str = "🍅 Pomodoro";

pub struct Session {
    log: EventLog,
    tasks: TaskQueue,
    timer: TimerMachine,
    phase_rx: watch::Receiver<Phase>,
}

impl Session {
    /// Hydrate a session using the durations and tick period from `config`.
    pub fn open(store: Rc<dyn Store>, clock: Rc<dyn Clock>, config: &Config) -> Result<Self> {
        let tick = std::time::Duration::from_millis(config.timer.tick_ms.max(1));
        Self::with_settings(store, clock, config.timer_settings(), tick)
    }

    pub fn with_settings(
        store: Rc<dyn Store>,
        clock: Rc<dyn Clock>,
        defaults: TimerSettings,
        tick: std::time::Duration,
    ) -> Result<Self> {
        let log = EventLog::hydrate(store.clone(), clock.clone())?;
        let tasks = TaskQueue::hydrate(store.clone())?;
        let timer = TimerMachine::hydrate(store, clock, defaults, tick)?;
        let phase_rx = timer.subscribe_phase();

        let mut session = Self {
            log,
            tasks,
            timer,
            phase_rx,
        };

        // The phase stream replays its current value to a new subscriber.
        let phase = *session.phase_rx.borrow_and_update();
        session.on_phase(phase)?;
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn timer(&self) -> &TimerMachine {
        &self.timer
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.timer.subscribe_phase()
    }

    pub fn subscribe_remaining(&self) -> watch::Receiver<u64> {
        self.timer.subscribe_remaining()
    }

    /// One-line status: phase glyph, countdown, active task.
    pub fn headline(&self) -> String {
        let remaining = format_millis(self.timer.remaining_ms());
        match self.timer.phase() {
            Phase::RunningWork => match self.tasks.active() {
                Some(task) => format!("💼 {remaining} {}", task.name),
                None => format!("💼 {remaining}"),
            },
            Phase::RunningBreak => format!("🌴 {remaining}"),
            Phase::Stopped => IDLE_HEADLINE.to_string(),
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<()> {
        self.timer.start(&mut self.log)?;
        self.sync_phase()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.timer.stop(&mut self.log)?;
        self.sync_phase()
    }

    pub fn set_work_duration(&mut self, millis: u64) -> Result<()> {
        self.timer.set_work_duration(millis)
    }

    pub fn set_break_duration(&mut self, millis: u64) -> Result<()> {
        self.timer.set_break_duration(millis)
    }

    pub fn reset_timer(&mut self) -> Result<()> {
        self.timer.reset()?;
        self.sync_phase()
    }

    /// Re-read every aggregate from the store.
    ///
    /// A long-lived session calls this before each [`Session::poll`] so that
    /// writes from other handles on the same store are kept instead of
    /// overwritten by the next rollover.
    pub fn refresh(&mut self) -> Result<()> {
        self.log.reload()?;
        self.tasks.reload()?;
        self.timer.reload()?;
        self.sync_phase()
    }

    /// Drive the clock. Call at least once per tick period.
    pub fn poll(&mut self) -> Result<Option<IntervalFinished>> {
        let finished = self.timer.poll(&mut self.log)?;
        self.sync_phase()?;
        Ok(finished)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        self.tasks.add_task(task, &mut self.log)
    }

    pub fn update_task(&mut self, index: usize, patch: &TaskPatch) -> Result<bool> {
        self.tasks.update_task(index, patch, &mut self.log)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task> {
        self.tasks.remove_task(index, &mut self.log)
    }

    pub fn move_task(&mut self, from: usize, to: usize) -> Result<()> {
        self.tasks.move_task(from, to, &mut self.log)
    }

    pub fn start_next_task(&mut self) -> Result<()> {
        self.tasks.start_next_task(&mut self.log)
    }

    pub fn complete_task(&mut self) -> Result<()> {
        self.tasks.complete_task(&mut self.log)
    }

    pub fn reset_tasks(&mut self) -> Result<()> {
        self.tasks.reset()
    }

    // ── Log ──────────────────────────────────────────────────────────

    pub fn reset_log(&mut self) -> Result<()> {
        self.log.reset()?;
        Ok(())
    }

    /// Wipe tasks, history and timer settings.
    pub fn reset_all(&mut self) -> Result<()> {
        self.reset_tasks()?;
        self.reset_log()?;
        self.reset_timer()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sync_phase(&mut self) -> Result<()> {
        if !self.phase_rx.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let phase = *self.phase_rx.borrow_and_update();
        self.on_phase(phase)
    }

    fn on_phase(&mut self, phase: Phase) -> Result<()> {
        if phase != Phase::RunningWork || self.tasks.active().is_some() {
            return Ok(());
        }
        if self.tasks.queued().is_empty() {
            debug!("work phase began with an empty queue");
            return Ok(());
        }
        self.tasks.start_next_task(&mut self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::LogKind;
    use crate::storage::MemoryStore;

    const TICK: std::time::Duration = std::time::Duration::from_millis(100);

    fn session() -> (Rc<MemoryStore>, ManualClock, Session) {
        let store = Rc::new(MemoryStore::new());
        let clock = ManualClock::default();
        let session = Session::with_settings(
            store.clone(),
            Rc::new(clock.clone()),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        (store, clock, session)
    }

    #[test]
    fn work_phase_activates_head_task() {
        let (_, _, mut s) = session();
        s.add_task(Task::new("a", "")).unwrap();
        s.add_task(Task::new("b", "")).unwrap();
        s.start().unwrap();

        assert_eq!(s.tasks().active().unwrap().name, "a");
        assert_eq!(
            s.log().recent_kinds(2),
            vec![LogKind::StartWorkInterval, LogKind::StartTask]
        );
    }

    #[test]
    fn empty_queue_does_not_fail_start() {
        let (_, _, mut s) = session();
        s.start().unwrap();
        assert!(s.tasks().active().is_none());
        assert_eq!(s.log().latest().unwrap().kind(), LogKind::StartWorkInterval);
    }

    #[test]
    fn break_phase_does_not_activate_tasks() {
        let (_, clock, mut s) = session();
        s.start().unwrap();
        clock.advance_ms(TimerSettings::default().work_duration_ms);
        s.poll().unwrap();
        assert_eq!(s.timer().phase(), Phase::RunningBreak);

        s.add_task(Task::new("late", "")).unwrap();
        clock.advance_ms(1_000);
        s.poll().unwrap();
        assert!(s.tasks().active().is_none());

        clock.advance_ms(TimerSettings::default().break_duration_ms);
        s.poll().unwrap();
        assert_eq!(s.timer().phase(), Phase::RunningWork);
        assert_eq!(s.tasks().active().unwrap().name, "late");
    }

    #[test]
    fn hydrating_into_work_activates_waiting_task() {
        let (store, clock, mut s) = session();
        s.start().unwrap();
        s.add_task(Task::new("queued while working", "")).unwrap();
        assert!(s.tasks().active().is_none());
        drop(s);

        let again = Session::with_settings(
            store,
            Rc::new(clock),
            TimerSettings::default(),
            TICK,
        )
        .unwrap();
        assert_eq!(again.tasks().active().unwrap().name, "queued while working");
    }

    #[test]
    fn headline_tracks_phase() {
        let (_, clock, mut s) = session();
        assert_eq!(s.headline(), "🍅 Pomodoro");

        s.add_task(Task::new("essay", "")).unwrap();
        s.start().unwrap();
        assert_eq!(s.headline(), "💼 25:00 essay");

        clock.advance_ms(TimerSettings::default().work_duration_ms);
        s.poll().unwrap();
        assert_eq!(s.headline(), "🌴 5:00");
    }

    #[test]
    fn reset_all_restores_defaults() {
        let (_, _, mut s) = session();
        s.add_task(Task::new("a", "")).unwrap();
        s.start().unwrap();
        s.reset_all().unwrap();

        assert!(s.log().is_empty());
        assert!(s.tasks().active().is_none());
        assert!(s.tasks().queued().is_empty());
        assert_eq!(s.timer().phase(), Phase::Stopped);
        assert_eq!(
            s.timer().remaining_ms(),
            TimerSettings::default().work_duration_ms
        );
    }
}
