mod codec;
mod config;
pub mod database;
mod memory;

pub use codec::{decode, encode, Decoded, SCHEMA_VERSION};
pub(crate) use codec::{load, save};
pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Logical keys of the persisted aggregates.
pub mod keys {
    pub const TIMER_STATE: &str = "timer_state";
    pub const TIMER_REMAINING: &str = "timer_remaining";
    pub const TASK_QUEUE: &str = "task_queue";
    pub const EVENT_LOG: &str = "event_log";
}

/// Durable key/value store.
///
/// Values are whole-state blobs; every write overwrites the previous value
/// for that key.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `POMOBOX_DATA_DIR` wins when set. Otherwise `~/.config/pomobox`, or
/// `~/.config/pomobox-dev` with `POMOBOX_ENV=dev`.
///
/// # Errors
/// Returns an error if no home directory is known or creating the directory
/// fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("POMOBOX_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir().ok_or(StorageError::DataDir)?.join(".config");

            let env = std::env::var("POMOBOX_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pomobox-dev")
            } else {
                base_dir.join("pomobox")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
