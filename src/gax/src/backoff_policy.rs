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

//! Defines the trait for backoff policies.
//!
//! The client libraries resubmit a request when the service reports that it
//! is still preparing the response (e.g. an on-demand thumbnail). Polling
//! should avoid immediately resubmitting the request, as the service may need
//! time to complete the work. [Exponential backoff] is a well known algorithm
//! to find an acceptable delay between attempts.
//!
//! # Example
//! ```
//! # use cloud_content_gax::backoff_policy::*;
//! use cloud_content_gax::exponential_backoff::ExponentialBackoffBuilder;
//! use std::time::Duration;
//!
//! let policy = ExponentialBackoffBuilder::new()
//!     .with_scaling(2.0)
//!     .with_jitter(0.5)
//!     .build()
//!     .unwrap();
//! let delay = policy.on_failure(Duration::from_secs(1), 1);
//! assert!(delay >= Duration::from_secs(2), "{delay:?}");
//! ```
//!
//! [Exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff

use std::sync::Arc;
use std::time::Duration;

/// Defines the trait implemented by all backoff strategies.
pub trait BackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the delay before the next attempt.
    ///
    /// # Parameters
    /// * `previous_delay` - the delay used before the previous attempt.
    /// * `attempt_count` - the number of attempts. This method is always
    ///   called after the first attempt.
    fn on_failure(&self, previous_delay: Duration, attempt_count: u32) -> Duration;
}

/// A helper type to use [BackoffPolicy] in client and request options.
#[derive(Clone, Debug)]
pub struct BackoffPolicyArg(pub(crate) Arc<dyn BackoffPolicy>);

impl BackoffPolicyArg {
    /// Returns the wrapped policy.
    pub fn policy(&self) -> &Arc<dyn BackoffPolicy> {
        &self.0
    }
}

impl<T: BackoffPolicy + 'static> std::convert::From<T> for BackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn BackoffPolicy>> for BackoffPolicyArg {
    fn from(value: Arc<dyn BackoffPolicy>) -> Self {
        Self(value)
    }
}
