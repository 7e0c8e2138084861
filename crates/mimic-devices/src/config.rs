//! Emulator configuration.
//!
//! Loaded from JSON. Every field has a default, so an empty object `{}` is a
//! valid configuration with no devices.
//!
//! ```json
//! {
//!   "sample_interval_ms": 1000,
//!   "pulse_unlock_delay_ms": 5000,
//!   "rng_seed": 42,
//!   "devices": [
//!     { "type": "temperature", "info": "rack 1 inlet" },
//!     { "type": "lock", "id": "8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use mimic_core::{DeviceId, DeviceKind, Error, Result, constants};
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::strategy::StepConfig;

/// One configured device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Stable ID; a random one is generated when omitted.
    #[serde(default)]
    pub id: Option<DeviceId>,

    /// Device-type tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Free-form description.
    #[serde(default)]
    pub info: Option<String>,
}

impl DeviceConfig {
    /// Resolve the tag and ID into a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDeviceType` if the tag is not supported.
    pub fn to_device(&self) -> Result<Device> {
        let kind: DeviceKind = self.kind.parse()?;
        let mut device = Device::with_id(self.id.unwrap_or_default(), kind);
        device.info = self.info.clone();
        Ok(device)
    }
}

/// Top-level emulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Sampling tick of the driver.
    pub sample_interval_ms: u64,

    /// Delay before a pulse-unlocked lock re-locks.
    pub pulse_unlock_delay_ms: u64,

    /// Half-width of the random walk step.
    pub random_walk_step: f64,

    /// Smallest accumulate increment.
    pub accumulate_min_step: f64,

    /// Largest accumulate increment.
    pub accumulate_max_step: f64,

    /// Seed for reproducible value sequences.
    pub rng_seed: Option<u64>,

    /// Devices to emulate.
    pub devices: Vec<DeviceConfig>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: constants::DEFAULT_SAMPLE_INTERVAL_MS,
            pulse_unlock_delay_ms: constants::DEFAULT_PULSE_UNLOCK_DELAY_MS,
            random_walk_step: constants::DEFAULT_RANDOM_WALK_STEP,
            accumulate_min_step: constants::DEFAULT_ACCUMULATE_MIN_STEP,
            accumulate_max_step: constants::DEFAULT_ACCUMULATE_MAX_STEP,
            rng_seed: None,
            devices: Vec::new(),
        }
    }
}

impl EmulatorConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed input and `Error::Configuration`
    /// if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check intervals and step sizes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for a zero sampling interval, invalid
    /// step sizes or two devices sharing an ID.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            return Err(Error::configuration("sample_interval_ms must be positive"));
        }
        self.steps().validate()?;
        ensure_unique_ids(self.devices.iter().filter_map(|device| device.id))
    }

    pub fn steps(&self) -> StepConfig {
        StepConfig {
            walk_step: self.random_walk_step,
            accumulate_min: self.accumulate_min_step,
            accumulate_max: self.accumulate_max_step,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn pulse_unlock_delay(&self) -> Duration {
        Duration::from_millis(self.pulse_unlock_delay_ms)
    }

    /// Resolve every configured device.
    ///
    /// # Errors
    ///
    /// Returns the first `Error::UnknownDeviceType` encountered, or
    /// `Error::Configuration` if two devices share an ID.
    pub fn build_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self
            .devices
            .iter()
            .map(DeviceConfig::to_device)
            .collect::<Result<_>>()?;
        ensure_unique_ids(devices.iter().map(|device| device.id))?;
        Ok(devices)
    }
}

fn ensure_unique_ids(ids: impl IntoIterator<Item = DeviceId>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::configuration(format!("Duplicate device ID {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = EmulatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EmulatorConfig::default());
        assert_eq!(config.pulse_unlock_delay(), Duration::from_secs(5));
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_devices_resolve() {
        let config = EmulatorConfig::from_json_str(
            r#"{
                "rng_seed": 7,
                "devices": [
                    { "type": "temperature", "info": "inlet" },
                    { "type": "lock", "id": "8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11" }
                ]
            }"#,
        )
        .unwrap();

        let devices = config.build_devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].kind, DeviceKind::Temperature);
        assert_eq!(devices[0].info.as_deref(), Some("inlet"));
        assert_eq!(
            devices[1].id.to_string(),
            "8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11"
        );
        assert_eq!(config.rng_seed, Some(7));
    }

    #[test]
    fn test_unknown_device_type() {
        let config =
            EmulatorConfig::from_json_str(r#"{ "devices": [ { "type": "thermostat" } ] }"#).unwrap();
        let err = config.build_devices().unwrap_err();
        assert!(matches!(err, Error::UnknownDeviceType(ref tag) if tag == "thermostat"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_interval = EmulatorConfig::from_json_str(r#"{ "sample_interval_ms": 0 }"#);
        assert!(matches!(zero_interval, Err(Error::Configuration { .. })));

        let inverted = EmulatorConfig::from_json_str(
            r#"{ "accumulate_min_step": 10.0, "accumulate_max_step": 1.0 }"#,
        );
        assert!(matches!(inverted, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_overflowing_walk_step_rejected() {
        let result = EmulatorConfig::from_json_str(r#"{ "random_walk_step": 1e308 }"#);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_duplicate_device_ids_rejected() {
        let json = r#"{
            "devices": [
                { "type": "fan", "id": "8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11" },
                { "type": "temperature", "id": "8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11" }
            ]
        }"#;
        let result = EmulatorConfig::from_json_str(json);
        assert!(matches!(result, Err(Error::Configuration { ref message }) if message.contains("Duplicate")));

        let unchecked = EmulatorConfig {
            devices: vec![
                DeviceConfig {
                    id: Some("8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11".parse().unwrap()),
                    kind: "fan".to_string(),
                    info: None,
                },
                DeviceConfig {
                    id: Some("8d3c2a7e-2b53-4c4f-9f0e-5f1d6f0f2a11".parse().unwrap()),
                    kind: "temperature".to_string(),
                    info: None,
                },
            ],
            ..EmulatorConfig::default()
        };
        assert!(matches!(
            unchecked.build_devices(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = EmulatorConfig::from_json_str("{ devices: ");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = EmulatorConfig::load("/nonexistent/mimic.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
