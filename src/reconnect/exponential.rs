//! Capped exponential backoff with optional jitter
//!
//! ```text
//! delay[n] = min(initial * multiplier^n, max) * (1 - jitter * r),  r in [0, 1)
//! ```
//!
//! Jitter only ever shortens the delay, so the cap holds. Each instance owns
//! its random generator; with a fixed seed the sequence restarts on `copy()`
//! and `reset()`, otherwise a fresh generator is seeded from entropy.

use super::ReconnectDelay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::Duration;

pub struct ExponentialDelay {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    /// Fraction of the delay that may be removed at random (0.0 to 1.0)
    jitter: f64,
    seed: Option<u64>,
    rng: StdRng,
}

impl ExponentialDelay {
    /// Backoff from `initial` to `max`, growing by `multiplier` per attempt.
    ///
    /// A multiplier below 1.0 is treated as 1.0.
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max: max.max(initial),
            multiplier: if multiplier.is_finite() {
                multiplier.max(1.0)
            } else {
                1.0
            },
            jitter: 0.0,
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Enable jitter, clamped to 0.0..=1.0
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_nan() {
            0.0
        } else {
            jitter.clamp(0.0, 1.0)
        };
        self
    }

    /// Seed the jitter generator for reproducible sequences
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn fresh_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Delay before jitter is applied
    fn capped_delay(&self, attempt: u32) -> f64 {
        if self.initial.is_zero() {
            return 0.0;
        }
        let max_secs = self.max.as_secs_f64();
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial.as_secs_f64() * self.multiplier.powi(exponent);
        if secs.is_finite() {
            secs.min(max_secs)
        } else {
            max_secs
        }
    }
}

impl ReconnectDelay for ExponentialDelay {
    fn delay(&mut self, attempt: u32) -> Duration {
        let mut secs = self.capped_delay(attempt);
        if self.jitter > 0.0 {
            let r: f64 = self.rng.gen();
            secs *= 1.0 - self.jitter * r;
        }
        // f64 seconds near Duration::MAX round past the representable range
        Duration::try_from_secs_f64(secs.max(0.0))
            .map(|delay| delay.min(self.max))
            .unwrap_or(self.max)
    }

    fn copy(&self) -> Box<dyn ReconnectDelay> {
        Box::new(Self {
            initial: self.initial,
            max: self.max,
            multiplier: self.multiplier,
            jitter: self.jitter,
            seed: self.seed,
            rng: self.fresh_rng(),
        })
    }

    fn reset(&mut self) {
        self.rng = self.fresh_rng();
    }
}

impl fmt::Debug for ExponentialDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExponentialDelay")
            .field("initial", &self.initial)
            .field("max", &self.max)
            .field("multiplier", &self.multiplier)
            .field("jitter", &self.jitter)
            .field("seed", &self.seed)
            .finish()
    }
}
