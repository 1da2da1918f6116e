//! Countdown timer shared by every agent and the switch coordinator.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range of seconds a timer may be armed with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Pick a duration uniformly within the range
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 0.0 && self.max >= self.min
    }
}

/// Seconds remaining until something should happen.
///
/// Advanced once per tick. A large delta never drives the remaining time
/// negative: the timer clamps at zero and reports that it fired.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A timer that is already elapsed
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn from_secs(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    pub fn random(interval: Interval, rng: &mut impl Rng) -> Self {
        Self::from_secs(interval.sample(rng))
    }

    pub fn reset(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    pub fn rearm(&mut self, interval: Interval, rng: &mut impl Rng) {
        self.reset(interval.sample(rng));
    }

    /// Advance by `delta` seconds; returns true once the timer reaches zero
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining = (self.remaining - delta.max(0.0)).max(0.0);
        self.remaining <= 0.0
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
