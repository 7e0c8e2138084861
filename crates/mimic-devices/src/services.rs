//! Shared services handed to every handler.

use std::sync::Arc;

use crate::registry::EmitterRegistry;
use crate::schedule::TransitionScheduler;
use crate::state::DeviceStateStore;

/// The process-wide emitter registry and device state store, plus the
/// scheduler that applies timed transitions to that same store.
///
/// Built once at startup and passed by reference to every handler call.
/// Clones share the same underlying services.
#[derive(Debug, Clone)]
pub struct Services {
    pub emitters: Arc<EmitterRegistry>,
    pub state: Arc<DeviceStateStore>,
    pub scheduler: TransitionScheduler,
}

impl Services {
    pub fn new() -> Self {
        let state = Arc::new(DeviceStateStore::new());
        Self {
            emitters: Arc::new(EmitterRegistry::new()),
            scheduler: TransitionScheduler::new(Arc::clone(&state)),
            state,
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}
