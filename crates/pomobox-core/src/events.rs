//! Append-only event log.
//!
//! Every task mutation and every timer transition lands here as a
//! [`LogEntry`]. The log is kept newest-first, entries are never edited,
//! and the only destructive operation is a full [`EventLog::reset`].

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::error::StorageError;
use crate::storage::{self, keys, Store};
use crate::task::Task;

/// Closed set of entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    CreateTask,
    UpdateTask,
    RemoveTask,
    MoveTask,
    StartTask,
    CompleteTask,
    StartWorkInterval,
    FinishWorkInterval,
    StartBreakInterval,
    FinishBreakInterval,
    StopWork,
    StopBreak,
}

/// A domain event with its payload.
///
/// Payloads carry full task snapshots so an entry can be read without
/// looking anything else up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    CreateTask(Task),
    UpdateTask { before: Task, after: Task },
    RemoveTask(Task),
    MoveTask { task: Task, from: usize, to: usize },
    StartTask(Task),
    CompleteTask(Task),
    StartWorkInterval,
    FinishWorkInterval,
    StartBreakInterval,
    FinishBreakInterval,
    StopWork,
    StopBreak,
}

impl LogEvent {
    pub fn kind(&self) -> LogKind {
        match self {
            LogEvent::CreateTask(_) => LogKind::CreateTask,
            LogEvent::UpdateTask { .. } => LogKind::UpdateTask,
            LogEvent::RemoveTask(_) => LogKind::RemoveTask,
            LogEvent::MoveTask { .. } => LogKind::MoveTask,
            LogEvent::StartTask(_) => LogKind::StartTask,
            LogEvent::CompleteTask(_) => LogKind::CompleteTask,
            LogEvent::StartWorkInterval => LogKind::StartWorkInterval,
            LogEvent::FinishWorkInterval => LogKind::FinishWorkInterval,
            LogEvent::StartBreakInterval => LogKind::StartBreakInterval,
            LogEvent::FinishBreakInterval => LogKind::FinishBreakInterval,
            LogEvent::StopWork => LogKind::StopWork,
            LogEvent::StopBreak => LogKind::StopBreak,
        }
    }

    /// Human readable message. Queue positions are shown 1-based.
    pub fn describe(&self) -> String {
        match self {
            LogEvent::CreateTask(task) => format!("Created task: {}", task.name),
            LogEvent::UpdateTask { before, after } => {
                let mut message = format!("Updated task {}:", before.name);
                if after.name != before.name {
                    message.push_str(&format!("\nName -> {}", after.name));
                }
                if after.description != before.description {
                    message.push_str(&format!("\nDescription -> {}", after.description));
                }
                message
            }
            LogEvent::RemoveTask(task) => format!("Removed task: {}", task.name),
            LogEvent::MoveTask { task, from, to } => {
                format!("Moved task: {}: {} -> {}", task.name, from + 1, to + 1)
            }
            LogEvent::StartTask(task) => format!("Started task: {}", task.name),
            LogEvent::CompleteTask(task) => format!("Completed task: {}", task.name),
            LogEvent::StartWorkInterval => "Started work interval".into(),
            LogEvent::FinishWorkInterval => "Finished work interval".into(),
            LogEvent::StartBreakInterval => "Started break interval".into(),
            LogEvent::FinishBreakInterval => "Finished break interval".into(),
            LogEvent::StopWork => "Stopped work".into(),
            LogEvent::StopBreak => "Stopped break".into(),
        }
    }
}

/// One immutable, timestamped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: LogEvent,
}

impl LogEntry {
    pub fn kind(&self) -> LogKind {
        self.event.kind()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.event.describe()
        )
    }
}

/// Newest-first log, persisted as a whole after every append.
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    store: Rc<dyn Store>,
    clock: Rc<dyn Clock>,
}

impl EventLog {
    /// Load the persisted log, or start empty.
    pub fn hydrate(store: Rc<dyn Store>, clock: Rc<dyn Clock>) -> Result<Self, StorageError> {
        let entries: VecDeque<LogEntry> =
            storage::load(store.as_ref(), keys::EVENT_LOG)?.or_default_for(keys::EVENT_LOG);
        debug!("hydrated event log with {} entries", entries.len());
        Ok(Self {
            entries,
            store,
            clock,
        })
    }

    /// Replace the in-memory entries with what the store holds now.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.entries =
            storage::load(self.store.as_ref(), keys::EVENT_LOG)?.or_default_for(keys::EVENT_LOG);
        Ok(())
    }

    /// Append an event stamped with the current time.
    pub fn append(&mut self, event: LogEvent) -> Result<&LogEntry, StorageError> {
        let now = self.clock.now();
        self.append_at(event, now)
    }

    /// Append an event with an explicit timestamp.
    pub fn append_at(
        &mut self,
        event: LogEvent,
        timestamp: DateTime<Utc>,
    ) -> Result<&LogEntry, StorageError> {
        debug!(kind = ?event.kind(), "log append");
        self.entries.push_front(LogEntry { timestamp, event });
        self.save()?;
        Ok(&self.entries[0])
    }

    /// Drop every entry.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.save()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds of the `n` most recent entries, oldest to newest.
    pub fn recent_kinds(&self, n: usize) -> Vec<LogKind> {
        let mut kinds: Vec<LogKind> = self.entries.iter().take(n).map(LogEntry::kind).collect();
        kinds.reverse();
        kinds
    }

    fn save(&self) -> Result<(), StorageError> {
        storage::save(self.store.as_ref(), keys::EVENT_LOG, &self.entries)
    }
}
