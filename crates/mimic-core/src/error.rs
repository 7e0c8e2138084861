//! Error types for emulated device operations.
//!
//! Every error is returned synchronously to the handler invocation that
//! caused it. Nothing here is retried internally; retry policy belongs to
//! whoever drives the handlers.

/// Result type alias for emulator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up, sampling or writing devices.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid emitter or emulator configuration (e.g. inverted bounds).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A device was sampled before its setup action registered an emitter.
    #[error("No emitter registered for device {device}")]
    NotRegistered { device: String },

    /// Write action not understood by the device's handler.
    #[error("Unsupported command for {device_type} device: {command}")]
    UnsupportedCommand {
        device_type: String,
        command: String,
    },

    /// A supported write action carried a payload it cannot use.
    #[error("Invalid data for {command} command: {message}")]
    InvalidWriteData { command: String, message: String },

    /// The value's shape does not match the output's declared type.
    #[error("Cannot build reading for output {output}: {message}")]
    ReadingConstruction { output: String, message: String },

    /// Device-type tag with no setup action or handler.
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    /// I/O error (configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON (configuration files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new not-registered error.
    pub fn not_registered(device: impl ToString) -> Self {
        Self::NotRegistered {
            device: device.to_string(),
        }
    }

    /// Create a new unsupported command error.
    pub fn unsupported_command(device_type: impl ToString, command: impl Into<String>) -> Self {
        Self::UnsupportedCommand {
            device_type: device_type.to_string(),
            command: command.into(),
        }
    }

    /// Create a new invalid write data error.
    pub fn invalid_write_data(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWriteData {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a new reading construction error.
    pub fn reading_construction(output: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadingConstruction {
            output: output.into(),
            message: message.into(),
        }
    }
}
