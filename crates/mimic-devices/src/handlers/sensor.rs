//! Read-only numeric sensors.
//!
//! Airflow, energy, humidity, power, pressure, temperature and voltage
//! devices all work the same way: every read advances the device's emitter
//! and reports the new value on the output named after the device type.

use mimic_core::{DeviceKind, Result};
use tracing::debug;

use super::DeviceHandler;
use crate::device::Device;
use crate::reading::Reading;
use crate::services::Services;

/// Handler for one numeric sensor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorHandler {
    kind: DeviceKind,
}

impl SensorHandler {
    pub fn new(kind: DeviceKind) -> Self {
        Self { kind }
    }
}

impl DeviceHandler for SensorHandler {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>> {
        let value = services.emitters.sample(&device.id).await?;
        debug!(device = %device.id, kind = %self.kind, %value, "Sampled sensor");

        let reading = device.output(self.kind.as_str())?.make_reading(value)?;
        Ok(vec![reading])
    }
}
