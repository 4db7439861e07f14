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

//! The policy to poll for content that is still being generated.
//!
//! Some downloads (e.g. thumbnails, or representations of large files) are
//! generated on demand. The service replies with HTTP status 202 (Accepted)
//! while the content is not ready. The client polls the service until the
//! content is ready: the first few attempts honor the `Retry-After` header,
//! later attempts use exponential backoff with jitter, and the polling stops
//! once the delay reaches the maximum.

use crate::backoff_policy::BackoffPolicyArg;
use crate::exponential_backoff::ExponentialBackoff;
use std::time::Duration;

/// The HTTP status code used by the service while content is generated.
pub const ACCEPTED: u16 = 202;

/// Controls how downloads are polled while the service prepares the content.
///
/// # Example
/// ```
/// # use cloud_content_gax::polling_policy::*;
/// # use std::time::Duration;
/// let policy = AcceptedPolicy::default();
/// let mut state = PollingState::default();
/// assert_eq!(policy.on_accepted(&mut state, Some(Duration::from_secs(3))), Some(Duration::from_secs(3)));
/// assert_eq!(policy.on_accepted(&mut state, None), Some(Duration::from_secs(1)));
/// assert_eq!(state.attempt_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct AcceptedPolicy {
    retry_after_attempts: u32,
    default_delay: Duration,
    maximum_delay: Duration,
    backoff: BackoffPolicyArg,
}

impl AcceptedPolicy {
    /// Change the number of attempts that honor the `Retry-After` header.
    pub fn with_retry_after_attempts(mut self, v: u32) -> Self {
        self.retry_after_attempts = v;
        self
    }

    /// Change the delay used when the `Retry-After` header is missing.
    pub fn with_default_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.default_delay = v.into();
        self
    }

    /// Change the delay at which polling stops.
    pub fn with_maximum_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.maximum_delay = v.into();
        self
    }

    /// Change the backoff policy used once the `Retry-After` attempts are
    /// exhausted.
    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.backoff = v.into();
        self
    }

    /// Returns the delay before polling again, or `None` if polling should
    /// stop.
    pub fn on_accepted(&self, state: &mut PollingState, retry_after: Option<Duration>) -> Option<Duration> {
        if state.attempt_count < self.retry_after_attempts {
            state.delay = retry_after.unwrap_or(self.default_delay);
        } else if state.delay < self.maximum_delay {
            state.delay = self.backoff.0.on_failure(state.delay, state.attempt_count);
        } else {
            return None;
        }
        state.attempt_count += 1;
        Some(state.delay)
    }
}

impl Default for AcceptedPolicy {
    /// Two attempts honor `Retry-After` (defaulting to one second), then the
    /// delay grows by a factor in `[1.5, 2.5)` until it reaches 90 seconds.
    fn default() -> Self {
        Self {
            retry_after_attempts: 2,
            default_delay: Duration::from_secs(1),
            maximum_delay: Duration::from_secs(90),
            backoff: ExponentialBackoff::default().into(),
        }
    }
}

/// The state of a polling loop.
#[derive(Clone, Debug, Default)]
pub struct PollingState {
    attempt_count: u32,
    delay: Duration,
}

impl PollingState {
    /// The number of times the request was resubmitted.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// The most recent delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
