//! Timed state transitions.
//!
//! A [`TimedTransition`] is a state-store write that happens on its own
//! after a delay, such as a pulse-unlocked lock re-locking itself. The
//! [`TransitionScheduler`] spawns one tokio task per transition. The task
//! sleeps without holding any lock, then applies the write through
//! [`DeviceStateStore::set`], taking the same per-device lock as a
//! synchronous write.
//!
//! Transitions cannot be cancelled. When several target the same field
//! they all fire and the last one to acquire the lock wins, including over
//! explicit writes that happened while they were pending.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mimic_core::{DeviceId, Value};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::state::DeviceStateStore;

/// A deferred write of `value` into `field` of `device`'s state record.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTransition {
    pub device: DeviceId,
    pub field: String,
    pub value: Value,
    pub delay: Duration,
}

impl TimedTransition {
    pub fn new(
        device: DeviceId,
        field: impl Into<String>,
        value: impl Into<Value>,
        delay: Duration,
    ) -> Self {
        Self {
            device,
            field: field.into(),
            value: value.into(),
            delay,
        }
    }
}

/// Runs [`TimedTransition`]s against a shared [`DeviceStateStore`].
///
/// Cloning the scheduler is cheap; clones share the store and the
/// in-flight counter.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    store: Arc<DeviceStateStore>,
    in_flight: Arc<AtomicUsize>,
}

impl TransitionScheduler {
    pub fn new(store: Arc<DeviceStateStore>) -> Self {
        Self {
            store,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Spawn `transition` on the current tokio runtime.
    ///
    /// The returned handle can be awaited to observe completion; dropping
    /// it does not cancel the transition.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn schedule(&self, transition: TimedTransition) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let guard = InFlightGuard::new(Arc::clone(&self.in_flight));

        tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(transition.delay).await;

            let TimedTransition {
                device,
                field,
                value,
                delay,
            } = transition;
            trace!(%device, field = %field, %value, ?delay, "Applying timed transition");
            store.set(&device, &field, value).await;
        })
    }

    /// Number of transitions scheduled but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Counts one pending transition until dropped, whether the task finishes
/// or is torn down mid-sleep.
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
