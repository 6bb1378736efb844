//! # Pomobox Core Library
//!
//! Business logic for the Pomobox time-boxing tool: a work/break countdown,
//! a queue of tasks worked through during work intervals, and an append-only
//! history of everything that happened. The `pomobox` CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a wall-clock phase machine that alternates work and break
//!   forever once started; the caller drives it with `poll()`
//! - **Tasks**: FIFO queue with at most one active task
//! - **Events**: newest-first event log
//! - **Storage**: key/value persistence (SQLite or in-memory) with versioned
//!   snapshots, plus TOML configuration
//! - **Session**: composition root that hydrates and wires the above
//!
//! ## Key Components
//!
//! - [`Session`]: the entry point for every operation
//! - [`TimerMachine`]: timer phase machine
//! - [`TaskQueue`]: task queue
//! - [`EventLog`]: event history
//! - [`Store`]: persistence contract, implemented by [`Database`] and
//!   [`MemoryStore`]

pub mod clock;
pub mod duration;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, TaskError, TimerError};
pub use events::{EventLog, LogEntry, LogEvent, LogKind};
pub use session::Session;
pub use storage::{Config, Database, MemoryStore, Store};
pub use task::{Task, TaskPatch, TaskQueue, TaskQueueState};
pub use timer::{IntervalFinished, Phase, Ticker, TimerMachine, TimerSettings, TimerState};
