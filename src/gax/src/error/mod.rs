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

//! Errors returned by the cloud content client libraries.
//!
//! The client libraries distinguish between errors detected while trying to
//! send a request (e.g. cannot open a connection), errors while recovering
//! from a failed request (e.g. the token refresh failed, or the rate limit
//! retries were exhausted), and errors returned by the service itself.
//!
//! # Examples
//!
//! ```
//! use cloud_content_gax::error::Error;
//! fn handle_error(e: Error) {
//!     if let Some(details) = e.service_error() {
//!         println!("service error code {:?}: {:?}", details.code, details.message);
//!     }
//! }
//! ```

mod core_error;
mod credentials;
mod service_error;
pub use core_error::*;
pub use credentials::*;
pub use service_error::*;
