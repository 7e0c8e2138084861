//! Per device-type setup actions.
//!
//! Each device is set up exactly once at startup: the action for its type
//! builds an emitter with the type's canonical strategy, bounds and seed,
//! and registers it. A failure is reported for that device only.

use mimic_core::{DeviceKind, Error, Result, Value, constants};
use tracing::debug;

use crate::device::Device;
use crate::emitter::ValueEmitter;
use crate::registry::EmitterRegistry;
use crate::strategy::{StepConfig, Strategy};

/// Setup action for one device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupAction {
    kind: DeviceKind,
}

impl SetupAction {
    pub fn for_kind(kind: DeviceKind) -> Self {
        Self { kind }
    }

    /// One action per supported device type.
    pub fn all() -> impl Iterator<Item = SetupAction> {
        DeviceKind::ALL.into_iter().map(Self::for_kind)
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Human-readable action name, e.g. `"temperature value emitter setup"`.
    pub fn name(&self) -> String {
        format!("{} value emitter setup", self.kind)
    }

    /// Whether this action applies to `device`.
    pub fn matches(&self, device: &Device) -> bool {
        device.kind == self.kind
    }

    /// The canonical emitter for this device type.
    pub fn emitter(&self, steps: StepConfig) -> ValueEmitter {
        let walk = |bounds| {
            ValueEmitter::new(Strategy::RandomWalk)
                .with_bounds(bounds)
                .with_steps(steps)
        };

        match self.kind {
            DeviceKind::Airflow => walk(constants::AIRFLOW_BOUNDS),
            DeviceKind::Energy => ValueEmitter::new(Strategy::Accumulate)
                .with_bounds(constants::ENERGY_BOUNDS)
                .with_steps(steps),
            DeviceKind::Fan => ValueEmitter::new(Strategy::Store).with_seed(constants::FAN_SEED_RPM),
            DeviceKind::Humidity => walk(constants::HUMIDITY_BOUNDS),
            DeviceKind::Led => ValueEmitter::new(Strategy::Store).with_seed(Value::composite([
                (constants::LED_FIELD_STATE, constants::LED_STATE_OFF),
                (constants::LED_FIELD_COLOR, constants::LED_COLOR_OFF),
            ])),
            DeviceKind::Lock => {
                ValueEmitter::new(Strategy::Store).with_seed(constants::LOCK_STATUS_LOCKED)
            }
            DeviceKind::Power => walk(constants::POWER_BOUNDS),
            DeviceKind::Pressure => walk(constants::PRESSURE_BOUNDS),
            DeviceKind::Temperature => walk(constants::TEMPERATURE_BOUNDS),
            DeviceKind::Voltage => walk(constants::VOLTAGE_BOUNDS),
        }
    }

    /// Build and register the emitter for `device`.
    ///
    /// `rng_seed`, when set, is mixed with the device ID so every device
    /// gets its own reproducible sequence.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the action does not apply to the
    /// device or the emitter fails validation.
    pub async fn run(
        &self,
        registry: &EmitterRegistry,
        device: &Device,
        steps: StepConfig,
        rng_seed: Option<u64>,
    ) -> Result<()> {
        if !self.matches(device) {
            return Err(Error::configuration(format!(
                "{} cannot set up {} device {}",
                self.name(),
                device.kind,
                device.id
            )));
        }

        let mut emitter = self.emitter(steps);
        if let Some(seed) = rng_seed {
            emitter = emitter.with_rng_seed(seed ^ device.id.low_bits());
        }

        registry.register(device.id, emitter).await?;
        debug!(device = %device.id, action = %self.name(), "Setup action completed");
        Ok(())
    }
}
