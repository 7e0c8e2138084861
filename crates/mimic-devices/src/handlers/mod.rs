//! Device handlers.
//!
//! A handler is the read/write entry point for one device type. Reads turn
//! emitter or state-store contents into typed [`Reading`]s; writes turn
//! [`WriteCommand`]s into mutations, possibly scheduling a timed transition.
//!
//! Handlers use native `async fn` in traits, which are not object-safe, so
//! [`AnyHandler`] provides enum dispatch over the concrete handlers.
//!
//! # Examples
//!
//! ```
//! use mimic_core::DeviceKind;
//! use mimic_devices::device::{Device, WriteCommand};
//! use mimic_devices::handlers::{AnyHandler, DeviceHandler};
//! use mimic_devices::services::Services;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> mimic_core::Result<()> {
//!     let services = Services::new();
//!     let lock = Device::new(DeviceKind::Lock);
//!     let handler = AnyHandler::for_kind(lock.kind, Duration::from_secs(5));
//!
//!     handler.write(&services, &lock, &WriteCommand::new("unlock")).await?;
//!     let readings = handler.read(&services, &lock).await?;
//!     assert_eq!(readings[0].value.as_text(), Some("unlocked_electrically"));
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)]

pub mod fan;
pub mod led;
pub mod lock;
pub mod sensor;

use std::time::Duration;

use mimic_core::{DeviceKind, Error, Result};

use crate::device::{Device, WriteCommand};
use crate::reading::Reading;
use crate::services::Services;

pub use fan::FanHandler;
pub use led::LedHandler;
pub use lock::LockHandler;
pub use sensor::SensorHandler;

/// Read/write entry points for one device type.
pub trait DeviceHandler {
    /// Handler name, matching the device-type tag it serves.
    fn name(&self) -> &'static str;

    /// Produce the device's current readings.
    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>>;

    /// Apply an inbound write. Read-only devices reject every action.
    async fn write(
        &self,
        _services: &Services,
        device: &Device,
        command: &WriteCommand,
    ) -> Result<()> {
        Err(Error::unsupported_command(device.kind, &command.action))
    }
}

/// Enum dispatch over the concrete handlers.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyHandler {
    /// Read-only numeric sensors backed by a random walk or accumulator.
    Sensor(SensorHandler),

    /// Fan with a writable speed.
    Fan(FanHandler),

    /// LED with writable state and color.
    Led(LedHandler),

    /// Lock with a timed pulse-unlock.
    Lock(LockHandler),
}

impl AnyHandler {
    /// The handler serving `kind`. `pulse_unlock_delay` only affects locks.
    pub fn for_kind(kind: DeviceKind, pulse_unlock_delay: Duration) -> Self {
        match kind {
            DeviceKind::Fan => Self::Fan(FanHandler),
            DeviceKind::Led => Self::Led(LedHandler),
            DeviceKind::Lock => Self::Lock(LockHandler::new(pulse_unlock_delay)),
            DeviceKind::Airflow
            | DeviceKind::Energy
            | DeviceKind::Humidity
            | DeviceKind::Power
            | DeviceKind::Pressure
            | DeviceKind::Temperature
            | DeviceKind::Voltage => Self::Sensor(SensorHandler::new(kind)),
        }
    }
}

impl DeviceHandler for AnyHandler {
    fn name(&self) -> &'static str {
        match self {
            Self::Sensor(handler) => handler.name(),
            Self::Fan(handler) => handler.name(),
            Self::Led(handler) => handler.name(),
            Self::Lock(handler) => handler.name(),
        }
    }

    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>> {
        match self {
            Self::Sensor(handler) => handler.read(services, device).await,
            Self::Fan(handler) => handler.read(services, device).await,
            Self::Led(handler) => handler.read(services, device).await,
            Self::Lock(handler) => handler.read(services, device).await,
        }
    }

    async fn write(&self, services: &Services, device: &Device, command: &WriteCommand) -> Result<()> {
        match self {
            Self::Sensor(handler) => handler.write(services, device, command).await,
            Self::Fan(handler) => handler.write(services, device, command).await,
            Self::Led(handler) => handler.write(services, device, command).await,
            Self::Lock(handler) => handler.write(services, device, command).await,
        }
    }
}
