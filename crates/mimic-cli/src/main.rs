//! Mimic - virtual device emulator driver
//!
//! Loads an emulator configuration, sets up every configured device and
//! samples them on a fixed interval, logging each reading.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mimic_devices::{Emulator, EmulatorConfig, SampleEvent, SamplingConfig, SamplingManager};
use tracing::{debug, info, warn};

/// Application name
const APP_NAME: &str = "mimic";

/// Virtual sensor and actuator emulator
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Emulate sensors and actuators for a monitoring host")]
#[command(version)]
struct Cli {
    /// JSON configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many samples per device (runs until Ctrl-C otherwise)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    info!("Mimic v{}", mimic_core::VERSION);

    let config = match &cli.config {
        Some(path) => EmulatorConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EmulatorConfig::default(),
    };
    let devices = config
        .build_devices()
        .context("invalid device definition")?;
    if devices.is_empty() {
        warn!("No devices configured");
    }

    let sampling = SamplingConfig {
        interval: config.sample_interval(),
        max_ticks: cli.ticks,
    };
    let emulator = Arc::new(Emulator::new(config));

    let report = emulator.setup_all(&devices).await;
    let mut manager = SamplingManager::new(Arc::clone(&emulator), sampling);
    for device in devices {
        if report.succeeded.contains(&device.id) {
            manager.add_device(device);
        }
    }

    let mut handle = manager.start();
    loop {
        tokio::select! {
            event = handle.recv() => match event {
                Some(SampleEvent::Readings { device, kind, readings }) => {
                    for reading in readings {
                        info!(%device, %kind, output = %reading.output, value = %reading.value, "Reading");
                    }
                }
                Some(SampleEvent::DeviceError { device, kind, error }) => {
                    warn!(%device, %kind, %error, "Read failed");
                }
                Some(other) => debug!(?other, "Unhandled sample event"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
