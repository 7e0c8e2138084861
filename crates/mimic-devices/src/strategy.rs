//! Value generation strategies.
//!
//! A strategy turns an emitter's current value into its next value. The
//! three kinds cover every emulated device:
//!
//! - [`Strategy::RandomWalk`]: add a symmetric random step, then clamp.
//! - [`Strategy::Accumulate`]: add a positive random increment, then clamp.
//! - [`Strategy::Store`]: keep the value; only external writes change it.
//!
//! Clamping happens after the step. A walk that reaches a bound sticks to
//! it until a step points back inside the range; it is never reflected.

use mimic_core::{Error, Result, Value, constants};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value generation performed by an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Bounded random walk.
    RandomWalk,

    /// Monotonically non-decreasing counter.
    Accumulate,

    /// Passive register mutated only by writes.
    Store,
}

impl Strategy {
    /// Whether this strategy works on numbers and honors bounds.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Strategy::RandomWalk | Strategy::Accumulate)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomWalk => write!(f, "RandomWalk"),
            Self::Accumulate => write!(f, "Accumulate"),
            Self::Store => write!(f, "Store"),
        }
    }
}

/// Optional numeric clamps. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    /// Bounds on both sides.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Reject inverted or non-finite bounds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `lower > upper` or either bound is NaN.
    pub fn validate(&self) -> Result<()> {
        if self.lower.is_some_and(f64::is_nan) || self.upper.is_some_and(f64::is_nan) {
            return Err(Error::configuration("Emitter bounds must not be NaN"));
        }
        if let (Some(lower), Some(upper)) = (self.lower, self.upper)
            && lower > upper
        {
            return Err(Error::configuration(format!(
                "Lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(())
    }

    /// Clamp `value` into the configured range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = self.lower.map_or(value, |lower| value.max(lower));
        self.upper.map_or(value, |upper| value.min(upper))
    }

    /// Whether `value` lies within the configured range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower.is_none_or(|lower| value >= lower) && self.upper.is_none_or(|upper| value <= upper)
    }

    /// Starting point for an unseeded random walk: the middle of the
    /// range, or whichever bound exists, or zero.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => lower + (upper - lower) / 2.0,
            (Some(bound), None) | (None, Some(bound)) => bound,
            (None, None) => 0.0,
        }
    }

    /// Starting point for an unseeded accumulator: the lower bound, or zero
    /// clamped into range.
    #[must_use]
    pub fn floor(&self) -> f64 {
        self.lower.unwrap_or_else(|| self.clamp(0.0))
    }
}

/// Step sizes shared by the numeric strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Random walk steps are drawn uniformly from `[-walk_step, walk_step]`.
    pub walk_step: f64,

    /// Smallest accumulate increment.
    pub accumulate_min: f64,

    /// Largest accumulate increment.
    pub accumulate_max: f64,
}

impl StepConfig {
    /// Reject step sizes that would break the strategy contracts.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the walk step is negative or its
    /// full span `2 * walk_step` is not finite, or the accumulate range is
    /// empty or not strictly positive.
    pub fn validate(&self) -> Result<()> {
        if !(2.0 * self.walk_step).is_finite() || self.walk_step < 0.0 {
            return Err(Error::configuration(format!(
                "Random walk step must be a non-negative number with a finite span, got {}",
                self.walk_step
            )));
        }
        if !(self.accumulate_min.is_finite() && self.accumulate_max.is_finite())
            || self.accumulate_min <= 0.0
            || self.accumulate_min > self.accumulate_max
        {
            return Err(Error::configuration(format!(
                "Accumulate step range must satisfy 0 < min <= max, got [{}, {}]",
                self.accumulate_min, self.accumulate_max
            )));
        }
        Ok(())
    }
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            walk_step: constants::DEFAULT_RANDOM_WALK_STEP,
            accumulate_min: constants::DEFAULT_ACCUMULATE_MIN_STEP,
            accumulate_max: constants::DEFAULT_ACCUMULATE_MAX_STEP,
        }
    }
}

/// `clamp(current + step, lower, upper)` with `step` uniform in `[-width, width]`.
pub fn random_walk<R: Rng>(current: f64, bounds: &Bounds, width: f64, rng: &mut R) -> f64 {
    // Scale a unit step so the drawn range never overflows.
    let step = if width > 0.0 {
        rng.random_range(-1.0f64..=1.0) * width
    } else {
        0.0
    };
    bounds.clamp(current + step)
}

/// `clamp(current + increment, lower, upper)` with a positive increment.
pub fn accumulate<R: Rng>(current: f64, bounds: &Bounds, min: f64, max: f64, rng: &mut R) -> f64 {
    let increment = rng.random_range(min..=max);
    bounds.clamp(current + increment)
}

/// Produce the next value for `strategy` from `current`.
///
/// Non-numeric values pass through numeric strategies untouched; setup
/// validation keeps that combination from being registered.
pub fn next_value<R: Rng>(
    strategy: Strategy,
    current: &Value,
    bounds: &Bounds,
    steps: &StepConfig,
    rng: &mut R,
) -> Value {
    match (strategy, current) {
        (Strategy::RandomWalk, Value::Number(n)) => {
            Value::Number(random_walk(*n, bounds, steps.walk_step, rng))
        }
        (Strategy::Accumulate, Value::Number(n)) => Value::Number(accumulate(
            *n,
            bounds,
            steps.accumulate_min,
            steps.accumulate_max,
            rng,
        )),
        _ => current.clone(),
    }
}
