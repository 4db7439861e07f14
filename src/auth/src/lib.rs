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

//! Authentication state for the cloud content client libraries.
//!
//! Obtaining tokens and logging users in are delegated to an application
//! supplied [Authenticator][token::Authenticator]. This crate caches the
//! resulting state in a [Session][session::Session], serializing refreshes so
//! concurrent requests that find an expired token trigger a single refresh.

pub mod errors;
pub mod session;
pub mod token;
mod token_cache;

/// An alias of [std::result::Result] where the error is always [errors::CredentialsError].
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;
