//! Core error types for pomobox-core.
//!
//! Every failure here is a caller-contract violation or a storage fault.
//! Nothing is retried: operations reject immediately and leave state as it
//! was.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomobox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer phase machine rejected the call
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Task queue rejected the call
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Persistence adapter failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Invalid-state errors raised by the timer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Timer is already running")]
    AlreadyRunning,

    #[error("Timer is already stopped")]
    AlreadyStopped,

    /// Durations can only change while stopped.
    #[error("Cannot change durations while the timer is running")]
    Running,

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// Invalid-state and invalid-argument errors raised by the task queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid index {index} for queue of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Cannot start a new task while one is active")]
    AlreadyActive,

    #[error("No tasks to start")]
    QueueEmpty,

    #[error("No task active")]
    NoActiveTask,
}

/// Persistence adapter errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cannot determine data directory")]
    DataDir,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
