//! Emitter registry.
//!
//! Process-wide mapping from device identity to that device's
//! [`ValueEmitter`]. The map itself sits behind a read/write lock that is
//! only held long enough to find or replace an entry; each emitter has its
//! own mutex, so samples of one device are serialized while different
//! devices proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use mimic_core::{DeviceId, Error, Result, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::emitter::ValueEmitter;

/// Concurrency-safe map of device ID to emitter.
///
/// # Examples
///
/// ```
/// use mimic_core::DeviceId;
/// use mimic_devices::emitter::ValueEmitter;
/// use mimic_devices::registry::EmitterRegistry;
/// use mimic_devices::strategy::Strategy;
///
/// #[tokio::main]
/// async fn main() -> mimic_core::Result<()> {
///     let registry = EmitterRegistry::new();
///     let device = DeviceId::new();
///
///     registry
///         .register(device, ValueEmitter::new(Strategy::Store).with_seed(0.0))
///         .await?;
///
///     assert_eq!(registry.sample(&device).await?.as_number(), Some(0.0));
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct EmitterRegistry {
    emitters: RwLock<HashMap<DeviceId, Arc<Mutex<ValueEmitter>>>>,
}

impl EmitterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `emitter` for `device`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the emitter fails validation
    /// (inverted bounds, bad step sizes, non-numeric seed for a numeric
    /// strategy). A rejected emitter leaves any existing registration intact.
    pub async fn register(&self, device: DeviceId, emitter: ValueEmitter) -> Result<()> {
        emitter.validate()?;

        let strategy = emitter.strategy();
        let replaced = self
            .emitters
            .write()
            .await
            .insert(device, Arc::new(Mutex::new(emitter)))
            .is_some();

        debug!(%device, %strategy, replaced, "Registered value emitter");
        Ok(())
    }

    /// Advance the device's emitter and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRegistered` if no emitter was registered for
    /// `device`. Nothing is mutated in that case.
    pub async fn sample(&self, device: &DeviceId) -> Result<Value> {
        let emitter = self.lookup(device).await?;
        let mut emitter = emitter.lock().await;
        Ok(emitter.next_value())
    }

    /// Read the device's current value without advancing it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRegistered` if no emitter was registered for `device`.
    pub async fn current(&self, device: &DeviceId) -> Result<Value> {
        let emitter = self.lookup(device).await?;
        let emitter = emitter.lock().await;
        Ok(emitter.current())
    }

    /// Replace the device's held value (writes to Store devices).
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRegistered` if no emitter was registered for `device`.
    pub async fn set(&self, device: &DeviceId, value: Value) -> Result<()> {
        let emitter = self.lookup(device).await?;
        emitter.lock().await.set(value);
        Ok(())
    }

    /// Run `f` against the device's emitter while holding its lock.
    ///
    /// Used for read-modify-write of composite Store values, so concurrent
    /// writes to different fields of one device cannot lose each other.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRegistered` if no emitter was registered for `device`.
    pub async fn update<F, T>(&self, device: &DeviceId, f: F) -> Result<T>
    where
        F: FnOnce(&mut ValueEmitter) -> T,
    {
        let emitter = self.lookup(device).await?;
        let mut emitter = emitter.lock().await;
        Ok(f(&mut emitter))
    }

    pub async fn contains(&self, device: &DeviceId) -> bool {
        self.emitters.read().await.contains_key(device)
    }

    pub async fn len(&self) -> usize {
        self.emitters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.emitters.read().await.is_empty()
    }

    async fn lookup(&self, device: &DeviceId) -> Result<Arc<Mutex<ValueEmitter>>> {
        self.emitters
            .read()
            .await
            .get(device)
            .cloned()
            .ok_or_else(|| Error::not_registered(device))
    }
}
