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

//! Cloud content management API helpers.
//!
//! This crate contains the types and functions shared by the cloud content
//! client libraries: the error type, the policies to resubmit throttled or
//! pending requests, and the HTTP transport abstraction.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions sending requests.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client libraries.
pub mod error;

pub mod backoff_policy;
pub mod exponential_backoff;
pub mod http_client;
pub mod polling_policy;
pub mod rate_limit_policy;
pub mod retry_after;
