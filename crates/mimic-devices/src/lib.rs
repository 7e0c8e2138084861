//! Device emulation plugin for the Mimic virtual device framework.
//!
//! This crate produces plausible readings for virtual devices and accepts
//! write commands for the controllable ones, so a monitoring host can be
//! exercised without real hardware.
//!
//! # Value Generation
//!
//! Every emitter-backed device owns a [`ValueEmitter`] configured with one
//! of three strategies:
//!
//! - **Random walk**: each sample moves by a small random step and sticks at
//!   the bounds (temperature, humidity, pressure, airflow, power, voltage).
//! - **Accumulate**: each sample adds a positive increment and holds at the
//!   upper bound (energy).
//! - **Store**: the value only changes when written (fan, LED, lock).
//!
//! Emitters live in the shared [`EmitterRegistry`], keyed by device ID. The
//! lock keeps its status in the [`DeviceStateStore`] instead, and schedules
//! its pulse re-lock through the [`TransitionScheduler`].
//!
//! # Plugin Surface
//!
//! The [`Emulator`] is what the host drives:
//!
//! ```no_run
//! use mimic_core::DeviceKind;
//! use mimic_devices::{Device, Emulator, EmulatorConfig, WriteCommand};
//!
//! #[tokio::main]
//! async fn main() -> mimic_core::Result<()> {
//!     let emulator = Emulator::new(EmulatorConfig::default());
//!     let lock = Device::new(DeviceKind::Lock);
//!
//!     emulator.setup(&lock).await?;
//!     emulator.write(&lock, &WriteCommand::new("pulseUnlock")).await?;
//!
//!     for reading in emulator.read(&lock).await? {
//!         println!("{} = {}", reading.output, reading.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The [`SamplingManager`] stands in for the host's scheduler and reads each
//! device on a fixed interval.
//!
//! # Thread Safety
//!
//! All shared state sits behind async locks with one lock per device, so
//! concurrent reads and writes on distinct devices never block each other
//! and operations on the same device are serialized.

pub mod config;
pub mod device;
pub mod emitter;
pub mod emulator;
pub mod handlers;
pub mod reading;
pub mod registry;
pub mod sampler;
pub mod schedule;
pub mod services;
pub mod setup;
pub mod state;
pub mod strategy;

// Re-export commonly used types for convenience
pub use config::{DeviceConfig, EmulatorConfig};
pub use device::{Device, WriteCommand};
pub use emitter::ValueEmitter;
pub use emulator::{Emulator, SetupReport};
pub use handlers::{AnyHandler, DeviceHandler};
pub use reading::{Output, Reading, ReadingType, Unit};
pub use registry::EmitterRegistry;
pub use sampler::{SampleEvent, SamplingConfig, SamplingHandle, SamplingManager};
pub use schedule::{TimedTransition, TransitionScheduler};
pub use services::Services;
pub use setup::SetupAction;
pub use state::{DeviceState, DeviceStateStore};
pub use strategy::{Bounds, StepConfig, Strategy};
