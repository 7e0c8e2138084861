//! Typed outputs and readings.
//!
//! An [`Output`] declares one named channel of a device together with the
//! shape of value it carries. [`Output::make_reading`] is the only way to
//! build a [`Reading`], and it refuses values of the wrong shape.

use chrono::{DateTime, Utc};
use mimic_core::{DeviceKind, Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Shape of the values an output accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    Number,
    Text,
}

impl ReadingType {
    fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ReadingType::Number, Value::Number(_)) | (ReadingType::Text, Value::Text(_))
        )
    }
}

/// Unit of measure attached to numeric readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub symbol: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// A named, typed output channel of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub reading_type: ReadingType,
    pub unit: Option<Unit>,
}

impl Output {
    /// Numeric output with a unit.
    pub fn number(name: impl Into<String>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            reading_type: ReadingType::Number,
            unit: Some(unit),
        }
    }

    /// Text output without a unit.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reading_type: ReadingType::Text,
            unit: None,
        }
    }

    /// Outputs every device of `kind` declares.
    pub fn defaults_for(kind: DeviceKind) -> Vec<Output> {
        match kind {
            DeviceKind::Airflow => vec![Output::number(
                "airflow",
                Unit::new("millimeters per second", "mm/s"),
            )],
            DeviceKind::Energy => vec![Output::number("energy", Unit::new("kilowatt hour", "kWh"))],
            DeviceKind::Fan => vec![Output::number(
                "fan.speed",
                Unit::new("revolutions per minute", "RPM"),
            )],
            DeviceKind::Humidity => vec![Output::number("humidity", Unit::new("percent", "%"))],
            DeviceKind::Led => vec![Output::text("led.state"), Output::text("led.color")],
            DeviceKind::Lock => vec![Output::text("lock.status")],
            DeviceKind::Power => vec![Output::number("power", Unit::new("watt", "W"))],
            DeviceKind::Pressure => vec![Output::number("pressure", Unit::new("pascal", "Pa"))],
            DeviceKind::Temperature => vec![Output::number(
                "temperature",
                Unit::new("celsius", "C"),
            )],
            DeviceKind::Voltage => vec![Output::number("voltage", Unit::new("volt", "V"))],
        }
    }

    /// Build a reading of `value` on this output, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadingConstruction` if the value's shape does not
    /// match the output's declared [`ReadingType`].
    pub fn make_reading(&self, value: impl Into<Value>) -> Result<Reading> {
        let value = value.into();
        if !self.reading_type.accepts(&value) {
            return Err(Error::reading_construction(
                &self.name,
                format!("expected {:?}, got {}", self.reading_type, value.shape()),
            ));
        }

        Ok(Reading {
            output: self.name.clone(),
            reading_type: self.reading_type,
            value,
            unit: self.unit.clone(),
            timestamp: Utc::now(),
        })
    }
}

/// One typed sample of a device output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub output: String,
    pub reading_type: ReadingType,
    pub value: Value,
    pub unit: Option<Unit>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_reading_matching_shape() {
        let output = Output::text("lock.status");
        let reading = output.make_reading("locked").unwrap();

        assert_eq!(reading.output, "lock.status");
        assert_eq!(reading.value, Value::from("locked"));
        assert_eq!(reading.unit, None);
    }

    #[test]
    fn test_make_reading_carries_unit() {
        let output = Output::number("temperature", Unit::new("celsius", "C"));
        let reading = output.make_reading(21.5).unwrap();

        assert_eq!(reading.value.as_number(), Some(21.5));
        assert_eq!(reading.unit.unwrap().symbol, "C");
    }

    #[test]
    fn test_make_reading_shape_mismatch() {
        let output = Output::text("lock.status");
        let err = output.make_reading(1.0).unwrap_err();
        assert!(matches!(err, Error::ReadingConstruction { .. }));

        let output = Output::number("power", Unit::new("watt", "W"));
        let composite = Value::composite([("state", "on")]);
        assert!(output.make_reading(composite).is_err());
    }

    #[test]
    fn test_every_kind_declares_outputs() {
        for kind in DeviceKind::ALL {
            assert!(!Output::defaults_for(kind).is_empty(), "{kind} has no outputs");
        }
        assert_eq!(Output::defaults_for(DeviceKind::Led).len(), 2);
    }

    #[test]
    fn test_reading_serializes() {
        let reading = Output::text("led.color").make_reading("ff0000").unwrap();
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["output"], "led.color");
        assert_eq!(json["reading_type"], "text");
        assert_eq!(json["value"], "ff0000");
    }
}
