pub mod store;

pub use store::{FileStore, MemoryStore, Store, StoreError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Persisted key names.
pub mod keys {
    pub const TOTAL_XP: &str = "totalXp";
    pub const QUESTS: &str = "quests";
    pub const DAILY_LOGS: &str = "dailyLogs";
    pub const LAST_COMPLETED: &str = "lastCompletedDate";
    pub const FORM_DATA: &str = "formData";
    pub const DISTANCE_MILES: &str = "distanceMiles";
    pub const EWASTE_COUNT: &str = "eWasteRecycleCount";
    pub const VEGETARIAN_MEALS: &str = "vegetarianMeals";
    pub const CARBON_SAVED: &str = "carbonSaved";
    pub const CURRENT_INDEX: &str = "currentIndex";

    /// In-progress quiz keys, cleared on restart.
    pub const SNAPSHOT: [&str; 6] = [
        FORM_DATA,
        DISTANCE_MILES,
        EWASTE_COUNT,
        VEGETARIAN_MEALS,
        CARBON_SAVED,
        CURRENT_INDEX,
    ];
}

/// Reads a JSON value, treating malformed data as absent.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "ignoring malformed stored value");
            None
        }
    }
}

/// Reads a plain scalar (number, timestamp), treating empty or malformed data as absent.
pub fn read_value<T, S>(store: &S, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
    S: Store + ?Sized,
{
    let raw = store.get(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, value = raw, error = %err, "ignoring malformed stored value");
            None
        }
    }
}

/// Writes `value`; failures are logged and the in-memory state stays authoritative.
pub fn write_value<S: Store + ?Sized>(store: &mut S, key: &str, value: String) {
    if let Err(err) = store.set(key, value) {
        warn!(key, error = %err, "failed to persist value");
    }
}

/// Writes every entry or none of them.
pub fn write_values<S: Store + ?Sized>(store: &mut S, entries: &[(&str, String)]) {
    if let Err(err) = store.set_many(entries) {
        let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
        warn!(?keys, error = %err, "failed to persist batch");
    }
}

pub fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(err) => {
            warn!(key, error = %err, "failed to encode value");
            None
        }
    }
}

pub fn write_json<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    if let Some(json) = encode_json(key, value) {
        write_value(store, key, json);
    }
}

pub fn remove_value<S: Store + ?Sized>(store: &mut S, key: &str) {
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to remove value");
    }
}
