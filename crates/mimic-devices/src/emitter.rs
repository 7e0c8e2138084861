//! Value emitters.
//!
//! A [`ValueEmitter`] owns one strategy, its bounds, its seed and the
//! latest value it produced. It is configured with a fluent builder before
//! registration and advanced once per sample afterwards.
//!
//! # Examples
//!
//! ```
//! use mimic_devices::emitter::ValueEmitter;
//! use mimic_devices::strategy::Strategy;
//!
//! let mut emitter = ValueEmitter::new(Strategy::RandomWalk)
//!     .with_lower_bound(0.0)
//!     .with_upper_bound(100.0)
//!     .with_rng_seed(42);
//!
//! let value = emitter.next_value().as_number().unwrap();
//! assert!((0.0..=100.0).contains(&value));
//! ```

use mimic_core::{Error, Result, Value};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::strategy::{self, Bounds, StepConfig, Strategy};

/// One device's value generator.
#[derive(Debug, Clone)]
pub struct ValueEmitter {
    strategy: Strategy,
    bounds: Bounds,
    steps: StepConfig,
    seed: Option<Value>,
    current: Option<Value>,
    rng: StdRng,
}

impl ValueEmitter {
    /// Create an unbounded, unseeded emitter for `strategy`.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            bounds: Bounds::default(),
            steps: StepConfig::default(),
            seed: None,
            current: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Set the lower clamp.
    pub fn with_lower_bound(mut self, lower: f64) -> Self {
        self.bounds.lower = Some(lower);
        self
    }

    /// Set the upper clamp.
    pub fn with_upper_bound(mut self, upper: f64) -> Self {
        self.bounds.upper = Some(upper);
        self
    }

    /// Set both clamps from a `(lower, upper)` pair.
    pub fn with_bounds(self, (lower, upper): (f64, f64)) -> Self {
        self.with_lower_bound(lower).with_upper_bound(upper)
    }

    /// Set the initial value.
    pub fn with_seed(mut self, seed: impl Into<Value>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Override the step sizes of the numeric strategies.
    pub fn with_steps(mut self, steps: StepConfig) -> Self {
        self.steps = steps;
        self
    }

    /// Make the generated sequence reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn seed(&self) -> Option<&Value> {
        self.seed.as_ref()
    }

    /// Check the configuration before the emitter is put to use.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the bounds are inverted, the step
    /// sizes are invalid, or a numeric strategy was seeded with a
    /// non-numeric value.
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        if self.strategy.is_numeric() {
            self.steps.validate()?;
            if let Some(seed) = &self.seed
                && seed.as_number().is_none()
            {
                return Err(Error::configuration(format!(
                    "{} emitter needs a numeric seed, got {}",
                    self.strategy,
                    seed.shape()
                )));
            }
        }
        Ok(())
    }

    /// The value the emitter holds right now, without advancing it.
    pub fn current(&self) -> Value {
        self.current.clone().unwrap_or_else(|| self.initial_value())
    }

    /// Advance the strategy by one step and return the new value.
    pub fn next_value(&mut self) -> Value {
        let current = self.current();
        let next = strategy::next_value(
            self.strategy,
            &current,
            &self.bounds,
            &self.steps,
            &mut self.rng,
        );
        self.current = Some(next.clone());
        next
    }

    /// Replace the held value from outside (a write to a Store device).
    ///
    /// Numbers are clamped into the configured bounds.
    pub fn set(&mut self, value: Value) {
        let value = match value {
            Value::Number(n) => Value::Number(self.bounds.clamp(n)),
            other => other,
        };
        self.current = Some(value);
    }

    fn initial_value(&self) -> Value {
        match (&self.seed, self.strategy) {
            (Some(Value::Number(n)), _) => Value::Number(self.bounds.clamp(*n)),
            (Some(seed), _) => seed.clone(),
            (None, Strategy::RandomWalk) => Value::Number(self.bounds.midpoint()),
            (None, Strategy::Accumulate) => Value::Number(self.bounds.floor()),
            (None, Strategy::Store) => Value::Number(self.bounds.clamp(0.0)),
        }
    }
}
