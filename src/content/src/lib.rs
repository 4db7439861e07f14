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

//! Cloud content client library for Rust - Files, folders, and events
//!
//! This crate contains the types and functions to manage files, folders,
//! bookmarks, collaborations, comments, users, metadata and event streams
//! in a cloud content service. Most applications start with a
//! [Client][client::Client], configured with an authenticated
//! [Session][auth::session::Session]:
//!
//! ```no_run
//! # use cloud_content::Client;
//! # use cloud_content::model::ItemLike;
//! # async fn sample(session: auth::session::Session) -> cloud_content::Result<()> {
//! let client = Client::new(session);
//! let folder = client.folders().info("0").send().await?;
//! println!("the root folder is {:?}", folder.name());
//! # Ok(()) }
//! ```
//!
//! Responses are decoded into [model] types. These keep every field sent by
//! the service, including fields this crate does not know about.

pub use gax::Result;
pub use gax::error::Error;

pub mod api;
pub mod batch;
pub mod client;
pub mod date_format;
pub mod download;
pub mod model;
pub mod realtime;
pub mod request;
pub mod upload;

pub use client::{Client, ClientBuilder};
pub use request::Request;
