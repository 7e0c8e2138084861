//! Periodic sampling driver.
//!
//! The [`SamplingManager`] plays the host's scheduler: it runs one async
//! task per device that reads the device on every tick and forwards the
//! readings into a single event channel.
//!
//! ```text
//! ┌──────────┐       ┌─────────────────┐
//! │ Device A │──────►│                 │
//! │ Task     │       │  Event Channel  │
//! └──────────┘       │  (mpsc)         │──────► Consumer
//! ┌──────────┐       │                 │
//! │ Device B │──────►│                 │
//! │ Task     │       └─────────────────┘
//! └──────────┘
//! ```
//!
//! A failed read is reported as an event and the task keeps sampling; one
//! device's errors never stop the others.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use mimic_core::DeviceKind;
//! use mimic_devices::config::EmulatorConfig;
//! use mimic_devices::device::Device;
//! use mimic_devices::emulator::Emulator;
//! use mimic_devices::sampler::{SamplingConfig, SamplingManager};
//!
//! #[tokio::main]
//! async fn main() -> mimic_core::Result<()> {
//!     let emulator = Arc::new(Emulator::new(EmulatorConfig::default()));
//!     let device = Device::new(DeviceKind::Temperature);
//!     emulator.setup(&device).await?;
//!
//!     let mut manager = SamplingManager::new(emulator, SamplingConfig::default());
//!     manager.add_device(device);
//!
//!     let mut handle = manager.start();
//!     while let Some(event) = handle.recv().await {
//!         println!("{:?}", event);
//!     }
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use mimic_core::{DeviceId, DeviceKind, Result, constants};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::device::Device;
use crate::emulator::Emulator;
use crate::reading::Reading;

/// Capacity of the event channel shared by all device tasks.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Event produced by a device sampling task.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SampleEvent {
    /// Readings produced on one tick.
    Readings {
        device: DeviceId,
        kind: DeviceKind,
        readings: Vec<Reading>,
    },

    /// A read failed on one tick. Sampling continues on the next tick.
    DeviceError {
        device: DeviceId,
        kind: DeviceKind,
        error: String,
    },
}

impl SampleEvent {
    pub fn device(&self) -> DeviceId {
        match self {
            Self::Readings { device, .. } | Self::DeviceError { device, .. } => *device,
        }
    }
}

/// Sampling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Time between two reads of the same device.
    pub interval: Duration,

    /// Stop each device after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(constants::DEFAULT_SAMPLE_INTERVAL_MS),
            max_ticks: None,
        }
    }
}

/// Handle for receiving sample events and stopping the device tasks.
pub struct SamplingHandle {
    event_rx: mpsc::Receiver<SampleEvent>,
    tasks: JoinSet<Result<()>>,
}

impl SamplingHandle {
    /// Receive the next event from any device.
    ///
    /// Returns `None` once every device task has finished.
    pub async fn recv(&mut self) -> Option<SampleEvent> {
        self.event_rx.recv().await
    }

    /// Abort all device tasks and wait for them to terminate.
    ///
    /// Pending timed transitions are not affected; they belong to the
    /// emulator's scheduler.
    pub async fn shutdown(mut self) {
        self.tasks.abort_all();

        let mut error_count = 0;
        let mut panic_count = 0;

        while let Some(result) = self.tasks.join_next().await {
            match Self::classify_task_result(result) {
                TaskTermination::Success | TaskTermination::Cancelled => {}
                TaskTermination::Error => error_count += 1,
                TaskTermination::Panic => panic_count += 1,
            }
        }

        if error_count + panic_count > 0 {
            warn!(error_count, panic_count, "Sampling tasks ended abnormally");
        }
        info!("Sampling stopped");
    }

    fn classify_task_result(
        result: std::result::Result<Result<()>, tokio::task::JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(_)) => TaskTermination::Error,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panic,
        }
    }
}

/// Task termination classification for shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    Success,
    Error,
    Cancelled,
    Panic,
}

/// Runs one sampling task per registered device.
///
/// # Lifecycle
///
/// 1. Create the manager over a set-up [`Emulator`]
/// 2. Add devices with [`add_device`](Self::add_device)
/// 3. Call [`start`](Self::start) to spawn the tasks and get the handle
/// 4. Receive events until done, then [`shutdown`](SamplingHandle::shutdown)
pub struct SamplingManager {
    emulator: Arc<Emulator>,
    config: SamplingConfig,
    devices: Vec<Device>,
}

impl SamplingManager {
    pub fn new(emulator: Arc<Emulator>, config: SamplingConfig) -> Self {
        Self {
            emulator,
            config,
            devices: Vec::new(),
        }
    }

    pub fn add_device(&mut self, device: Device) {
        self.devices.push(device);
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Spawn one sampling task per device and return the event handle.
    pub fn start(self) -> SamplingHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut tasks = JoinSet::new();

        for device in self.devices {
            tasks.spawn(Self::device_task(
                Arc::clone(&self.emulator),
                device,
                self.config,
                event_tx.clone(),
            ));
        }

        info!(
            devices = tasks.len(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Sampling started"
        );

        SamplingHandle { event_rx, tasks }
    }

    async fn device_task(
        emulator: Arc<Emulator>,
        device: Device,
        config: SamplingConfig,
        tx: mpsc::Sender<SampleEvent>,
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        while config.max_ticks.is_none_or(|max| ticks < max) {
            ticker.tick().await;
            ticks += 1;

            let event = match emulator.read(&device).await {
                Ok(readings) => SampleEvent::Readings {
                    device: device.id,
                    kind: device.kind,
                    readings,
                },
                Err(e) => {
                    debug!(device = %device.id, error = %e, "Sample failed");
                    SampleEvent::DeviceError {
                        device: device.id,
                        kind: device.kind,
                        error: e.to_string(),
                    }
                }
            };

            if tx.send(event).await.is_err() {
                break; // Receiver dropped
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmulatorConfig;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_run_closes_channel() {
        let emulator = Arc::new(Emulator::new(EmulatorConfig::default()));
        let voltage = Device::new(DeviceKind::Voltage);
        let lock = Device::new(DeviceKind::Lock);
        emulator.setup_all(&[voltage.clone(), lock.clone()]).await;

        let mut manager = SamplingManager::new(
            Arc::clone(&emulator),
            SamplingConfig {
                interval: Duration::from_millis(100),
                max_ticks: Some(3),
            },
        );
        manager.add_device(voltage.clone());
        manager.add_device(lock.clone());
        assert_eq!(manager.device_count(), 2);

        let mut handle = manager.start();
        let mut events = Vec::new();
        while let Some(event) = handle.recv().await {
            events.push(event);
        }
        handle.shutdown().await;

        assert_eq!(events.len(), 6);
        assert_eq!(events.iter().filter(|e| e.device() == voltage.id).count(), 3);
        assert!(
            events
                .iter()
                .all(|e| matches!(e, SampleEvent::Readings { .. }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_sampling() {
        let emulator = Arc::new(Emulator::new(EmulatorConfig::default()));
        let never_set_up = Device::new(DeviceKind::Humidity);
        let healthy = Device::new(DeviceKind::Humidity);
        emulator.setup(&healthy).await.unwrap();

        let mut manager = SamplingManager::new(
            emulator,
            SamplingConfig {
                interval: Duration::from_millis(10),
                max_ticks: Some(2),
            },
        );
        manager.add_device(never_set_up.clone());
        manager.add_device(healthy.clone());

        let mut handle = manager.start();
        let mut errors = 0;
        let mut readings = 0;
        while let Some(event) = handle.recv().await {
            match event {
                SampleEvent::DeviceError { device, .. } => {
                    assert_eq!(device, never_set_up.id);
                    errors += 1;
                }
                SampleEvent::Readings { device, .. } => {
                    assert_eq!(device, healthy.id);
                    readings += 1;
                }
            }
        }
        handle.shutdown().await;

        assert_eq!(errors, 2);
        assert_eq!(readings, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_unbounded_tasks() {
        let emulator = Arc::new(Emulator::new(EmulatorConfig::default()));
        let fan = Device::new(DeviceKind::Fan);
        emulator.setup(&fan).await.unwrap();

        let mut manager = SamplingManager::new(emulator, SamplingConfig::default());
        manager.add_device(fan);

        let mut handle = manager.start();
        assert!(handle.recv().await.is_some());
        handle.shutdown().await;
    }
}
