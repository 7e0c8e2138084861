//! Lock handler.
//!
//! Lock status lives in the device state store under `lockStatus`:
//!
//! | Command | To | Side effect |
//! |---------|----|-------------|
//! | `lock` | `locked` | none |
//! | `unlock` | `unlocked_electrically` | none |
//! | `pulseUnlock` | `unlocked_electrically` | re-lock after the pulse delay |
//!
//! A lock that was never written reads as `locked`. That default is not
//! stored back. The pulse re-lock is a [`TimedTransition`]; it is not
//! cancelled by later writes and will overwrite them when it fires.

use std::time::Duration;

use mimic_core::{Error, Result, constants};
use tracing::debug;

use super::DeviceHandler;
use crate::device::{Device, WriteCommand};
use crate::reading::Reading;
use crate::schedule::TimedTransition;
use crate::services::Services;

const OUTPUT_STATUS: &str = "lock.status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockHandler {
    pulse_delay: Duration,
}

impl LockHandler {
    pub fn new(pulse_delay: Duration) -> Self {
        Self { pulse_delay }
    }

    pub fn pulse_delay(&self) -> Duration {
        self.pulse_delay
    }
}

impl Default for LockHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(constants::DEFAULT_PULSE_UNLOCK_DELAY_MS))
    }
}

impl DeviceHandler for LockHandler {
    fn name(&self) -> &'static str {
        "lock"
    }

    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>> {
        let status = services
            .state
            .get(&device.id)
            .await
            .and_then(|state| state.get_text(constants::LOCK_FIELD_STATUS).map(str::to_string))
            .unwrap_or_else(|| constants::LOCK_STATUS_LOCKED.to_string());

        Ok(vec![device.output(OUTPUT_STATUS)?.make_reading(status)?])
    }

    async fn write(&self, services: &Services, device: &Device, command: &WriteCommand) -> Result<()> {
        let status = match command.action.as_str() {
            constants::LOCK_ACTION_LOCK => constants::LOCK_STATUS_LOCKED,
            constants::LOCK_ACTION_UNLOCK | constants::LOCK_ACTION_PULSE_UNLOCK => {
                constants::LOCK_STATUS_UNLOCKED
            }
            other => return Err(Error::unsupported_command(device.kind, other)),
        };

        services
            .state
            .set(&device.id, constants::LOCK_FIELD_STATUS, status)
            .await;
        debug!(device = %device.id, action = %command.action, status, "Lock status set");

        if command.action == constants::LOCK_ACTION_PULSE_UNLOCK {
            services.scheduler.schedule(TimedTransition::new(
                device.id,
                constants::LOCK_FIELD_STATUS,
                constants::LOCK_STATUS_LOCKED,
                self.pulse_delay,
            ));
        }

        Ok(())
    }
}
