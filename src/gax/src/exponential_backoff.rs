// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Common implementation for exponential backoff.
//!
//! This module provides an implementation of [exponential backoff] with
//! multiplicative jitter. Each delay is the previous delay multiplied by
//! `scaling + r`, where `r` is a random value in `[0, jitter)`.
//!
//! [exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff

use std::time::Duration;

/// The error type for exponential backoff creation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("the scaling value ({0}) should be >= 1.0")]
    InvalidScalingFactor(f64),
    #[error("the jitter value ({0}) should be >= 0.0")]
    InvalidJitter(f64),
    #[error("the initial delay ({0:?}) should be greater than zero")]
    InvalidInitialDelay(Duration),
}

/// Builds an [ExponentialBackoff].
///
/// # Example
/// ```
/// # use cloud_content_gax::exponential_backoff::*;
/// use std::time::Duration;
///
/// let policy = ExponentialBackoffBuilder::new()
///     .with_initial_delay(Duration::from_millis(500))
///     .with_scaling(1.5)
///     .with_jitter(1.0)
///     .build();
/// assert!(policy.is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Duration,
    scaling: f64,
    jitter: f64,
}

impl ExponentialBackoffBuilder {
    /// Creates a builder with the default parameters.
    pub fn new() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            scaling: 1.5,
            jitter: 1.0,
        }
    }

    /// Change the initial delay, used when there is no previous delay.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.initial_delay = v.into();
        self
    }

    /// Change the minimum scaling factor.
    pub fn with_scaling<V: Into<f64>>(mut self, v: V) -> Self {
        self.scaling = v.into();
        self
    }

    /// Change the range of the random component added to the scaling factor.
    pub fn with_jitter<V: Into<f64>>(mut self, v: V) -> Self {
        self.jitter = v.into();
        self
    }

    /// Creates a new exponential backoff policy, validating the parameters.
    pub fn build(self) -> Result<ExponentialBackoff, Error> {
        if self.scaling < 1.0 {
            return Err(Error::InvalidScalingFactor(self.scaling));
        }
        if self.jitter.is_nan() || self.jitter < 0.0 {
            return Err(Error::InvalidJitter(self.jitter));
        }
        if self.initial_delay.is_zero() {
            return Err(Error::InvalidInitialDelay(self.initial_delay));
        }
        Ok(ExponentialBackoff {
            initial_delay: self.initial_delay,
            scaling: self.scaling,
            jitter: self.jitter,
        })
    }

    /// Creates a new exponential backoff policy clamping the ranges towards
    /// recommended values.
    pub fn clamp(self) -> ExponentialBackoff {
        let scaling = self.scaling.clamp(1.0, 32.0);
        let jitter = if self.jitter.is_nan() {
            0.0
        } else {
            self.jitter.clamp(0.0, 32.0)
        };
        let initial_delay = self
            .initial_delay
            .clamp(Duration::from_millis(1), Duration::from_secs(60));
        ExponentialBackoff {
            initial_delay,
            scaling,
            jitter,
        }
    }
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements exponential backoff with multiplicative jitter.
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    scaling: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    fn delay_with_jitter(&self, previous_delay: Duration, rng: &mut impl rand::Rng) -> Duration {
        let previous = if previous_delay.is_zero() {
            self.initial_delay
        } else {
            previous_delay
        };
        let factor = if self.jitter > 0.0 {
            self.scaling + rng.random_range(0.0..self.jitter)
        } else {
            self.scaling
        };
        Duration::try_from_secs_f64(previous.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        ExponentialBackoffBuilder::new().clamp()
    }
}

impl crate::backoff_policy::BackoffPolicy for ExponentialBackoff {
    fn on_failure(&self, previous_delay: Duration, _attempt_count: u32) -> Duration {
        self.delay_with_jitter(previous_delay, &mut rand::rng())
    }
}
