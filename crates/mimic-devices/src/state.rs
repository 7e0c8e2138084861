//! Device state store.
//!
//! Holds an open-ended key/value record per device for handlers that need
//! more than a single emitted scalar (the lock's status, for instance).
//! Records are created lazily on the first write and never removed.
//!
//! Every mutation goes through the store: the outer map lock is held only
//! to find or create a record, and each record carries its own mutex so
//! that a read-modify-write on one device is atomic without serializing
//! unrelated devices.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use mimic_core::{DeviceId, Value};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

/// Key/value record for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState(BTreeMap<String, Value>);

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Text value of `field`, if present and textual.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    /// Set `field`, returning the value it replaced.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Concurrency-safe map of device ID to [`DeviceState`].
///
/// # Examples
///
/// ```
/// use mimic_core::DeviceId;
/// use mimic_devices::state::DeviceStateStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = DeviceStateStore::new();
///     let device = DeviceId::new();
///
///     assert!(store.get(&device).await.is_none());
///
///     store.set(&device, "lockStatus", "locked").await;
///     let state = store.get(&device).await.unwrap();
///     assert_eq!(state.get_text("lockStatus"), Some("locked"));
/// }
/// ```
#[derive(Debug, Default)]
pub struct DeviceStateStore {
    records: RwLock<HashMap<DeviceId, Arc<Mutex<DeviceState>>>>,
}

impl DeviceStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the device's record, or `None` if it was never written.
    pub async fn get(&self, device: &DeviceId) -> Option<DeviceState> {
        let record = self.records.read().await.get(device).cloned()?;
        let snapshot = record.lock().await.clone();
        Some(snapshot)
    }

    /// Set one field, creating the record if it does not exist yet.
    pub async fn set(&self, device: &DeviceId, field: &str, value: impl Into<Value>) {
        let value = value.into();
        self.update(device, move |state| {
            state.set(field, value);
        })
        .await;
    }

    /// Run `f` on the device's record under its lock, creating the record
    /// first if needed. The record is looked up again on every call, so a
    /// caller never works on a stale copy.
    pub async fn update<F, T>(&self, device: &DeviceId, f: F) -> T
    where
        F: FnOnce(&mut DeviceState) -> T,
    {
        let record = self.record(device).await;
        let mut state = record.lock().await;
        f(&mut state)
    }

    pub async fn contains(&self, device: &DeviceId) -> bool {
        self.records.read().await.contains_key(device)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn record(&self, device: &DeviceId) -> Arc<Mutex<DeviceState>> {
        if let Some(record) = self.records.read().await.get(device) {
            return Arc::clone(record);
        }

        // Another writer may have created it between the two locks.
        let mut records = self.records.write().await;
        Arc::clone(records.entry(*device).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_record() {
        let store = DeviceStateStore::new();
        assert!(store.get(&DeviceId::new()).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_creates_then_mutates() {
        let store = DeviceStateStore::new();
        let device = DeviceId::new();

        store.set(&device, "lockStatus", "locked").await;
        assert!(store.contains(&device).await);

        store.set(&device, "lockStatus", "unlocked_electrically").await;
        store.set(&device, "pulses", 1.0).await;

        let state = store.get(&device).await.unwrap();
        assert_eq!(state.get_text("lockStatus"), Some("unlocked_electrically"));
        assert_eq!(state.get("pulses"), Some(&Value::Number(1.0)));
        assert_eq!(state.len(), 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = DeviceStateStore::new();
        let device = DeviceId::new();

        store.set(&device, "lockStatus", "locked").await;
        let mut snapshot = store.get(&device).await.unwrap();
        snapshot.set("lockStatus", "tampered");

        let state = store.get(&device).await.unwrap();
        assert_eq!(state.get_text("lockStatus"), Some("locked"));
    }

    #[tokio::test]
    async fn test_update_returns_closure_result() {
        let store = DeviceStateStore::new();
        let device = DeviceId::new();

        let previous = store
            .update(&device, |state| state.set("lockStatus", "locked"))
            .await;
        assert!(previous.is_none());

        let previous = store
            .update(&device, |state| state.set("lockStatus", "unlocked_electrically"))
            .await;
        assert_eq!(previous, Some(Value::from("locked")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(DeviceStateStore::new());
        let device = DeviceId::new();

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .update(&device, |state| {
                        let count = state.get("count").and_then(Value::as_number).unwrap_or(0.0);
                        state.set("count", count + 1.0);
                    })
                    .await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let state = store.get(&device).await.unwrap();
        assert_eq!(state.get("count"), Some(&Value::Number(50.0)));
    }
}
