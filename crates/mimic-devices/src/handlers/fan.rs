//! Fan handler.
//!
//! The fan's speed lives in a Store emitter: reads report it unchanged and
//! the `speed` write action replaces it.

use mimic_core::{Error, Result, Value, constants};
use tracing::debug;

use super::DeviceHandler;
use crate::device::{Device, WriteCommand};
use crate::reading::Reading;
use crate::services::Services;

const OUTPUT_SPEED: &str = "fan.speed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanHandler;

impl DeviceHandler for FanHandler {
    fn name(&self) -> &'static str {
        "fan"
    }

    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>> {
        let speed = services.emitters.sample(&device.id).await?;
        Ok(vec![device.output(OUTPUT_SPEED)?.make_reading(speed)?])
    }

    async fn write(&self, services: &Services, device: &Device, command: &WriteCommand) -> Result<()> {
        if command.action != constants::FAN_ACTION_SPEED {
            return Err(Error::unsupported_command(device.kind, &command.action));
        }

        let rpm = parse_speed(command)?;
        services.emitters.set(&device.id, Value::Number(rpm)).await?;
        debug!(device = %device.id, rpm, "Fan speed set");
        Ok(())
    }
}

fn parse_speed(command: &WriteCommand) -> Result<f64> {
    let data = command.require_data()?;
    let rpm: u32 = data.trim().parse().map_err(|_| {
        Error::invalid_write_data(
            &command.action,
            format!("expected a non-negative integer RPM, got {data:?}"),
        )
    })?;
    Ok(f64::from(rpm))
}
