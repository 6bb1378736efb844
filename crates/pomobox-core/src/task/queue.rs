//! Ordered task queue with at most one active task.
//!
//! ```text
//! queued (FIFO) --start_next_task--> active --complete_task--> completed
//! ```
//!
//! Every successful mutation appends to the event log and then overwrites
//! the persisted queue state. Validation happens before anything changes.

use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Task, TaskPatch};
use crate::error::{Result, StorageError, TaskError};
use crate::events::{EventLog, LogEvent};
use crate::storage::{self, keys, Store};

/// Persisted shape of the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueueState {
    #[serde(default)]
    pub active: Option<Task>,
    #[serde(default)]
    pub queued: Vec<Task>,
    /// Most recently completed first.
    #[serde(default)]
    pub completed: VecDeque<Task>,
}

pub struct TaskQueue {
    state: TaskQueueState,
    store: Rc<dyn Store>,
}

impl TaskQueue {
    /// Load the persisted queue, or start empty.
    pub fn hydrate(store: Rc<dyn Store>) -> Result<Self, StorageError> {
        let state: TaskQueueState =
            storage::load(store.as_ref(), keys::TASK_QUEUE)?.or_default_for(keys::TASK_QUEUE);
        debug!(
            queued = state.queued.len(),
            active = state.active.is_some(),
            "hydrated task queue"
        );
        Ok(Self { state, store })
    }

    /// Replace the in-memory queue with what the store holds now.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.state =
            storage::load(self.store.as_ref(), keys::TASK_QUEUE)?.or_default_for(keys::TASK_QUEUE);
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TaskQueueState {
        &self.state
    }

    pub fn active(&self) -> Option<&Task> {
        self.state.active.as_ref()
    }

    pub fn queued(&self) -> &[Task] {
        &self.state.queued
    }

    /// Completed tasks, most recent first.
    pub fn completed(&self) -> impl ExactSizeIterator<Item = &Task> {
        self.state.completed.iter()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(&mut self, task: Task, log: &mut EventLog) -> Result<()> {
        self.state.queued.push(task.clone());
        log.append(LogEvent::CreateTask(task))?;
        self.save()
    }

    /// Merge `patch` over the task at `index`.
    ///
    /// Returns `false` without logging or writing when the merge changes
    /// nothing.
    pub fn update_task(
        &mut self,
        index: usize,
        patch: &TaskPatch,
        log: &mut EventLog,
    ) -> Result<bool> {
        let current = self.queued_at(index)?;
        let updated = current.merged(patch);
        if &updated == current {
            return Ok(false);
        }

        let before = std::mem::replace(&mut self.state.queued[index], updated.clone());
        log.append(LogEvent::UpdateTask {
            before,
            after: updated,
        })?;
        self.save()?;
        Ok(true)
    }

    pub fn remove_task(&mut self, index: usize, log: &mut EventLog) -> Result<Task> {
        self.queued_at(index)?;
        let removed = self.state.queued.remove(index);
        log.append(LogEvent::RemoveTask(removed.clone()))?;
        self.save()?;
        Ok(removed)
    }

    /// Take the task at `from` out and reinsert it at `to`; everything in
    /// between shifts by one.
    pub fn move_task(&mut self, from: usize, to: usize, log: &mut EventLog) -> Result<()> {
        self.queued_at(from)?;
        self.queued_at(to)?;

        let task = self.state.queued.remove(from);
        self.state.queued.insert(to, task.clone());
        log.append(LogEvent::MoveTask { task, from, to })?;
        self.save()
    }

    /// Pop the head of the queue into `active`.
    pub fn start_next_task(&mut self, log: &mut EventLog) -> Result<()> {
        self.activate_head(log)?;
        self.save()
    }

    /// Retire the active task and, if work remains, activate the next one
    /// within the same operation.
    pub fn complete_task(&mut self, log: &mut EventLog) -> Result<()> {
        let done = self.state.active.take().ok_or(TaskError::NoActiveTask)?;
        self.state.completed.push_front(done.clone());
        log.append(LogEvent::CompleteTask(done))?;

        if !self.state.queued.is_empty() {
            self.activate_head(log)?;
        }
        self.save()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.state = TaskQueueState::default();
        self.save()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn queued_at(&self, index: usize) -> Result<&Task, TaskError> {
        self.state.queued.get(index).ok_or(TaskError::InvalidIndex {
            index,
            len: self.state.queued.len(),
        })
    }

    fn activate_head(&mut self, log: &mut EventLog) -> Result<()> {
        if self.state.active.is_some() {
            return Err(TaskError::AlreadyActive.into());
        }
        if self.state.queued.is_empty() {
            return Err(TaskError::QueueEmpty.into());
        }

        let next = self.state.queued.remove(0);
        debug!(task = %next.name, "task activated");
        self.state.active = Some(next.clone());
        log.append(LogEvent::StartTask(next))?;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        storage::save(self.store.as_ref(), keys::TASK_QUEUE, &self.state)?;
        Ok(())
    }
}
