//! Emulated device descriptors and write commands.
//!
//! A [`Device`] is what the host framework hands to setup actions and
//! handlers: a stable identity, a type tag and the outputs it declares.

use mimic_core::{DeviceId, DeviceKind, Error, Result};
use serde::{Deserialize, Serialize};

use crate::reading::Output;

/// One emulated device instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub info: Option<String>,
    pub outputs: Vec<Output>,
}

impl Device {
    /// Create a device of `kind` with a fresh ID and the kind's default outputs.
    pub fn new(kind: DeviceKind) -> Self {
        Self::with_id(DeviceId::new(), kind)
    }

    /// Create a device of `kind` with a known ID.
    pub fn with_id(id: DeviceId, kind: DeviceKind) -> Self {
        Self {
            id,
            kind,
            info: None,
            outputs: Output::defaults_for(kind),
        }
    }

    /// Set the human-readable description.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Look up a declared output by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadingConstruction` if the device declares no such output.
    pub fn output(&self, name: &str) -> Result<&Output> {
        self.outputs
            .iter()
            .find(|output| output.name == name)
            .ok_or_else(|| {
                Error::reading_construction(name, format!("{} device has no such output", self.kind))
            })
    }
}

/// Inbound write for a device: an action name plus an optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCommand {
    pub action: String,
    pub data: Option<String>,
}

impl WriteCommand {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// The payload, or an `InvalidWriteData` error naming this action.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidWriteData` if the command carries no data.
    pub fn require_data(&self) -> Result<&str> {
        self.data
            .as_deref()
            .ok_or_else(|| Error::invalid_write_data(&self.action, "missing data"))
    }
}
