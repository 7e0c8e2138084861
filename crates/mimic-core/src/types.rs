use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Stable identity of one emulated device instance.
///
/// Unique per device and stable for the device's lifetime, so it is used
/// as the key into the emitter registry and the device state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Generate a fresh random device ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Low 64 bits of the ID, used to derive per-device RNG seeds.
    #[must_use]
    pub fn low_bits(&self) -> u64 {
        self.0.as_u64_pair().1
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| Error::configuration(format!("Invalid device ID {s:?}: {e}")))
    }
}

/// Device-type tag selecting which setup action and handler apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Airflow,
    Energy,
    Fan,
    Humidity,
    Led,
    Lock,
    Power,
    Pressure,
    Temperature,
    Voltage,
}

impl DeviceKind {
    /// Every supported device type, in tag order.
    pub const ALL: [DeviceKind; 10] = [
        DeviceKind::Airflow,
        DeviceKind::Energy,
        DeviceKind::Fan,
        DeviceKind::Humidity,
        DeviceKind::Led,
        DeviceKind::Lock,
        DeviceKind::Power,
        DeviceKind::Pressure,
        DeviceKind::Temperature,
        DeviceKind::Voltage,
    ];

    /// The device-type tag as it appears in device configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Airflow => "airflow",
            DeviceKind::Energy => "energy",
            DeviceKind::Fan => "fan",
            DeviceKind::Humidity => "humidity",
            DeviceKind::Led => "led",
            DeviceKind::Lock => "lock",
            DeviceKind::Power => "power",
            DeviceKind::Pressure => "pressure",
            DeviceKind::Temperature => "temperature",
            DeviceKind::Voltage => "voltage",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownDeviceType(s.to_string()))
    }
}

/// A value produced by an emitter or held in a device state record.
///
/// Closed set of shapes: plain numbers for sensors, text for discrete
/// statuses (lock) and composite named fields for multi-part state (LED).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Named fields, kept and displayed in alphabetical order.
    Composite(BTreeMap<String, String>),
}

impl Value {
    /// Build a composite value from `(field, value)` pairs.
    pub fn composite<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Value::Composite(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_composite(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Value::Composite(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up one named field of a composite value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.as_composite()
            .and_then(|fields| fields.get(name))
            .map(String::as_str)
    }

    /// Short name of the value's shape, for error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Composite(_) => "composite",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Composite(fields) => {
                let parts: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
