//! Host-facing plugin surface.
//!
//! [`Emulator`] bundles the shared [`Services`] with the configuration and
//! exposes the per-device lifecycle the host framework drives: one setup
//! call per device at startup, then reads on every sampling tick and writes
//! as commands arrive. Dispatch is by device type.
//!
//! # Examples
//!
//! ```
//! use mimic_core::DeviceKind;
//! use mimic_devices::config::EmulatorConfig;
//! use mimic_devices::device::Device;
//! use mimic_devices::emulator::Emulator;
//!
//! #[tokio::main]
//! async fn main() -> mimic_core::Result<()> {
//!     let emulator = Emulator::new(EmulatorConfig::default());
//!     let humidity = Device::new(DeviceKind::Humidity);
//!
//!     emulator.setup(&humidity).await?;
//!     let readings = emulator.read(&humidity).await?;
//!     assert_eq!(readings[0].output, "humidity");
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;

use mimic_core::{DeviceId, DeviceKind, Error, Result};
use tracing::{info, warn};

use crate::config::EmulatorConfig;
use crate::device::{Device, WriteCommand};
use crate::handlers::{AnyHandler, DeviceHandler};
use crate::reading::Reading;
use crate::services::Services;
use crate::setup::SetupAction;

/// Outcome of setting up a batch of devices.
///
/// A failed device does not stop the others from being set up.
#[derive(Debug, Default)]
pub struct SetupReport {
    pub succeeded: Vec<DeviceId>,
    pub failed: Vec<(DeviceId, Error)>,
}

impl SetupReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The emulator plugin: shared services plus configuration.
#[derive(Debug, Clone)]
pub struct Emulator {
    services: Services,
    config: EmulatorConfig,
}

impl Emulator {
    /// Create an emulator with fresh services.
    pub fn new(config: EmulatorConfig) -> Self {
        Self::with_services(config, Services::new())
    }

    /// Create an emulator over existing services.
    pub fn with_services(config: EmulatorConfig, services: Services) -> Self {
        Self { services, config }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// The handler serving devices of `kind`.
    pub fn handler(&self, kind: DeviceKind) -> AnyHandler {
        AnyHandler::for_kind(kind, self.config.pulse_unlock_delay())
    }

    /// Run the setup action for `device`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the emitter cannot be registered.
    pub async fn setup(&self, device: &Device) -> Result<()> {
        SetupAction::for_kind(device.kind)
            .run(
                &self.services.emitters,
                device,
                self.config.steps(),
                self.config.rng_seed,
            )
            .await
    }

    /// Set up every device, collecting per-device failures.
    ///
    /// A device whose ID already appeared earlier in `devices` fails with
    /// `Error::Configuration` and leaves the first device's emitter alone.
    pub async fn setup_all(&self, devices: &[Device]) -> SetupReport {
        let mut report = SetupReport::default();
        let mut seen = HashSet::new();

        for device in devices {
            let result = if seen.insert(device.id) {
                self.setup(device).await
            } else {
                Err(Error::configuration(format!(
                    "Duplicate device ID {} for {} device",
                    device.id, device.kind
                )))
            };
            match result {
                Ok(()) => report.succeeded.push(device.id),
                Err(e) => {
                    warn!(device = %device.id, kind = %device.kind, error = %e, "Device setup failed");
                    report.failed.push((device.id, e));
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Device setup finished"
        );
        report
    }

    /// Read the device's current readings.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotRegistered` for emitter-backed devices that were
    /// never set up, or `Error::ReadingConstruction` if a value does not fit
    /// its output.
    pub async fn read(&self, device: &Device) -> Result<Vec<Reading>> {
        self.handler(device.kind).read(&self.services, device).await
    }

    /// Apply a write command to the device.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCommand` for unknown actions and
    /// `Error::InvalidWriteData` for malformed payloads.
    pub async fn write(&self, device: &Device, command: &WriteCommand) -> Result<()> {
        self.handler(device.kind)
            .write(&self.services, device, command)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_core::Value;

    #[tokio::test]
    async fn test_setup_all_isolates_failures() {
        let config = EmulatorConfig {
            random_walk_step: -1.0,
            ..EmulatorConfig::default()
        };
        let emulator = Emulator::new(config);

        let sensor = Device::new(DeviceKind::Temperature);
        let fan = Device::new(DeviceKind::Fan);
        let report = emulator.setup_all(&[sensor.clone(), fan.clone()]).await;

        assert!(!report.is_complete());
        assert_eq!(report.succeeded, vec![fan.id]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, sensor.id);

        assert!(emulator.read(&fan).await.is_ok());
        assert!(matches!(
            emulator.read(&sensor).await,
            Err(Error::NotRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn test_setup_all_rejects_duplicate_id() {
        let emulator = Emulator::new(EmulatorConfig::default());
        let fan = Device::new(DeviceKind::Fan);
        let impostor = Device::with_id(fan.id, DeviceKind::Temperature);

        let report = emulator.setup_all(&[fan.clone(), impostor]).await;

        assert!(!report.is_complete());
        assert_eq!(report.succeeded, vec![fan.id]);
        assert!(matches!(report.failed[0].1, Error::Configuration { .. }));

        let readings = emulator.read(&fan).await.unwrap();
        assert_eq!(readings[0].value, Value::Number(0.0));
    }

    #[tokio::test]
    async fn test_read_write_dispatch_by_kind() {
        let emulator = Emulator::new(EmulatorConfig::default());
        let fan = Device::new(DeviceKind::Fan);
        let lock = Device::new(DeviceKind::Lock);
        emulator.setup_all(&[fan.clone(), lock.clone()]).await;

        emulator
            .write(&fan, &WriteCommand::new("speed").with_data("900"))
            .await
            .unwrap();
        emulator
            .write(&lock, &WriteCommand::new("unlock"))
            .await
            .unwrap();

        let fan_readings = emulator.read(&fan).await.unwrap();
        assert_eq!(fan_readings[0].value, Value::Number(900.0));

        let lock_readings = emulator.read(&lock).await.unwrap();
        assert_eq!(
            lock_readings[0].value,
            Value::from("unlocked_electrically")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_pulse_delay() {
        let config = EmulatorConfig {
            pulse_unlock_delay_ms: 500,
            ..EmulatorConfig::default()
        };
        let emulator = Emulator::new(config);
        let lock = Device::new(DeviceKind::Lock);

        emulator
            .write(&lock, &WriteCommand::new("pulseUnlock"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(600)).await;

        let readings = emulator.read(&lock).await.unwrap();
        assert_eq!(readings[0].value, Value::from("locked"));
    }
}
