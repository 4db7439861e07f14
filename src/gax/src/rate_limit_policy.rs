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

//! The policy to resubmit requests rejected with "too many requests".
//!
//! The service rejects requests with HTTP status 429 when an application
//! exceeds its request rate. The client waits for the delay requested in the
//! `Retry-After` header, or a default delay with some jitter if the header is
//! absent or malformed, and then resubmits the request. The number of
//! resubmissions is capped.

use std::time::Duration;

/// The HTTP status code used by the service to reject requests over the rate
/// limit.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Controls how rate limited requests are resubmitted.
///
/// # Example
/// ```
/// # use cloud_content_gax::rate_limit_policy::RateLimitPolicy;
/// # use std::time::Duration;
/// let policy = RateLimitPolicy::default();
/// assert_eq!(policy.maximum_attempts(), 1);
/// assert_eq!(policy.on_rate_limited(0, Some(Duration::from_secs(2))), Some(Duration::from_secs(2)));
/// assert_eq!(policy.on_rate_limited(1, Some(Duration::from_secs(2))), None);
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitPolicy {
    maximum_attempts: u32,
    default_delay: Duration,
    maximum_jitter: Duration,
}

impl RateLimitPolicy {
    /// Creates a policy with a custom retry budget and default delay.
    pub fn new(maximum_attempts: u32, default_delay: Duration, maximum_jitter: Duration) -> Self {
        Self {
            maximum_attempts,
            default_delay,
            maximum_jitter,
        }
    }

    /// The maximum number of times a rate limited request is resubmitted.
    pub fn maximum_attempts(&self) -> u32 {
        self.maximum_attempts
    }

    /// Returns the delay before resubmitting a rate limited request.
    ///
    /// Returns `None` if the request was already resubmitted
    /// `maximum_attempts` times.
    ///
    /// # Parameters
    /// * `attempt_count` - the number of times the request was already
    ///   resubmitted after being rate limited.
    /// * `retry_after` - the delay requested by the service, if any.
    pub fn on_rate_limited(&self, attempt_count: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if attempt_count >= self.maximum_attempts {
            return None;
        }
        Some(retry_after.unwrap_or_else(|| self.default_delay_with_jitter(&mut rand::rng())))
    }

    fn default_delay_with_jitter(&self, rng: &mut impl rand::Rng) -> Duration {
        self.default_delay + rng.random_range(Duration::ZERO..=self.maximum_jitter)
    }
}

impl Default for RateLimitPolicy {
    /// One resubmission, waiting 20 seconds plus up to 10 seconds of jitter
    /// when the service does not say how long to wait.
    fn default() -> Self {
        Self {
            maximum_attempts: 1,
            default_delay: Duration::from_secs(20),
            maximum_jitter: Duration::from_secs(10),
        }
    }
}
