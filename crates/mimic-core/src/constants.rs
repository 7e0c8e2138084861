//! Canonical constants for the emulated device types.
//!
//! Each device type gets a fixed generation range, seed or status
//! vocabulary. Setup actions and handlers read these instead of
//! repeating literals, so the table below is the single source of truth.
//!
//! | Device type | Strategy | Bounds |
//! |-------------|----------|--------|
//! | airflow | RandomWalk | [-100, 100] |
//! | energy | Accumulate | [0, 100000] |
//! | humidity | RandomWalk | [0, 100] |
//! | power | RandomWalk | [1000, 3000] |
//! | pressure | RandomWalk | [-5, 5] |
//! | temperature | RandomWalk | [0, 100] |
//! | voltage | RandomWalk | [100, 500] |
//!
//! Fan, LED and lock devices use Store emitters seeded with
//! [`FAN_SEED_RPM`], [`LED_STATE_OFF`]/[`LED_COLOR_OFF`] and [`LOCK_STATUS_LOCKED`].
//!
//! # Usage
//!
//! ```
//! use mimic_core::constants::*;
//!
//! assert!(TEMPERATURE_BOUNDS.0 <= TEMPERATURE_BOUNDS.1);
//! assert_eq!(LOCK_STATUS_LOCKED, "locked");
//! ```

// ============================================================================
// Generation Ranges
// ============================================================================

/// Airflow range in millimeters per second.
pub const AIRFLOW_BOUNDS: (f64, f64) = (-100.0, 100.0);

/// Cumulative energy range in kilowatt-hours.
pub const ENERGY_BOUNDS: (f64, f64) = (0.0, 100_000.0);

/// Relative humidity range in percent.
pub const HUMIDITY_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Power draw range in watts.
pub const POWER_BOUNDS: (f64, f64) = (1000.0, 3000.0);

/// Differential pressure range in pascals.
pub const PRESSURE_BOUNDS: (f64, f64) = (-5.0, 5.0);

/// Temperature range in degrees Celsius.
pub const TEMPERATURE_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Voltage range in volts.
pub const VOLTAGE_BOUNDS: (f64, f64) = (100.0, 500.0);

// ============================================================================
// Generation Steps
// ============================================================================

/// Default half-width of the symmetric random walk step.
pub const DEFAULT_RANDOM_WALK_STEP: f64 = 1.0;

/// Default smallest accumulate increment.
pub const DEFAULT_ACCUMULATE_MIN_STEP: f64 = 1.0;

/// Default largest accumulate increment.
pub const DEFAULT_ACCUMULATE_MAX_STEP: f64 = 10.0;

// ============================================================================
// Fan
// ============================================================================

/// Fan speed at startup, in RPM.
pub const FAN_SEED_RPM: f64 = 0.0;

/// Fan write action that sets the speed.
pub const FAN_ACTION_SPEED: &str = "speed";

// ============================================================================
// LED
// ============================================================================

/// Composite field holding the LED state.
pub const LED_FIELD_STATE: &str = "state";

/// Composite field holding the LED color as 6 hex digits.
pub const LED_FIELD_COLOR: &str = "color";

/// LED state: off.
pub const LED_STATE_OFF: &str = "off";

/// LED state: on.
pub const LED_STATE_ON: &str = "on";

/// LED state: blinking.
pub const LED_STATE_BLINK: &str = "blink";

/// LED color at startup.
pub const LED_COLOR_OFF: &str = "000000";

/// LED write action that sets the state.
pub const LED_ACTION_STATE: &str = "state";

/// LED write action that sets the color.
pub const LED_ACTION_COLOR: &str = "color";

// ============================================================================
// Lock
// ============================================================================

/// State-record field holding the lock status.
pub const LOCK_FIELD_STATUS: &str = "lockStatus";

/// Lock status: locked. Also the status reported before any write.
pub const LOCK_STATUS_LOCKED: &str = "locked";

/// Lock status: electrically unlocked.
pub const LOCK_STATUS_UNLOCKED: &str = "unlocked_electrically";

/// Lock write action: lock.
pub const LOCK_ACTION_LOCK: &str = "lock";

/// Lock write action: unlock.
pub const LOCK_ACTION_UNLOCK: &str = "unlock";

/// Lock write action: unlock, then re-lock after [`DEFAULT_PULSE_UNLOCK_DELAY_MS`].
pub const LOCK_ACTION_PULSE_UNLOCK: &str = "pulseUnlock";

/// Delay before a pulse unlock reverts to locked, in milliseconds.
pub const DEFAULT_PULSE_UNLOCK_DELAY_MS: u64 = 5000;

// ============================================================================
// Driver
// ============================================================================

/// Default sampling tick of the emulator driver, in milliseconds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;
