//! Versioned JSON envelope for persisted aggregates.
//!
//! Every blob is written as `{"version": N, "data": ...}`. Decoding never
//! fails hard: a missing key is [`Decoded::Absent`], anything unreadable is
//! [`Decoded::Corrupt`], and callers fall back to defaults for both.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Store;
use crate::error::StorageError;

/// Current schema version of every persisted blob.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: serde_json::Value,
}

/// Outcome of decoding a persisted blob.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Present(T),
    Absent,
    Corrupt(String),
}

impl<T: Default> Decoded<T> {
    /// Present value, or the default with a warning when the blob was corrupt.
    pub fn or_default_for(self, key: &str) -> T {
        match self {
            Decoded::Present(value) => value,
            Decoded::Absent => T::default(),
            Decoded::Corrupt(reason) => {
                warn!("discarding corrupt '{key}' snapshot: {reason}");
                T::default()
            }
        }
    }
}

/// Serialize a value inside the current envelope.
pub fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        data: value,
    })?)
}

/// Validate and decode a raw blob.
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::Absent;
    };

    let envelope: RawEnvelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(e) => return Decoded::Corrupt(format!("cannot parse envelope: {e}")),
    };

    if envelope.version != SCHEMA_VERSION {
        return Decoded::Corrupt(format!(
            "unsupported schema version {} (expected {SCHEMA_VERSION})",
            envelope.version
        ));
    }

    match serde_json::from_value(envelope.data) {
        Ok(value) => Decoded::Present(value),
        Err(e) => Decoded::Corrupt(format!("cannot parse data: {e}")),
    }
}

/// Read and decode one key.
pub(crate) fn load<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Decoded<T>, StorageError> {
    let raw = store.get(key)?;
    Ok(decode(raw.as_deref()))
}

/// Encode and overwrite one key.
pub(crate) fn save<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> Result<(), StorageError> {
    store.set(key, &encode(value)?)
}
