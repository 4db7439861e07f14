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

//! Long-polls the realtime server for changes to the event stream.

use crate::model::{Message, PagedCollection, RealTimeServer, SimpleMessage};
use crate::request::Request;
use gax::error::Error;
use http::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(610);

/// A long-poll connection to the realtime server.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let mut connection = client.events().realtime();
/// loop {
///     let message = connection.connect().await?;
///     println!("{message:?}, read the event stream");
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RealTimeServerConnection {
    discovery: Request<PagedCollection<RealTimeServer>>,
    server: Option<RealTimeServer>,
    retries: u32,
    cancel: Option<CancellationToken>,
}

impl RealTimeServerConnection {
    pub(crate) fn new(discovery: Request<PagedCollection<RealTimeServer>>) -> Self {
        Self {
            discovery,
            server: None,
            retries: 0,
            cancel: None,
        }
    }

    /// Stops polling when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.discovery = self.discovery.with_cancellation(token.clone());
        self.cancel = Some(token);
        self
    }

    /// The request used to discover the server.
    pub fn request(&self) -> &Request<PagedCollection<RealTimeServer>> {
        &self.discovery
    }

    /// The server used by the last call to [connect][Self::connect].
    pub fn server(&self) -> Option<&RealTimeServer> {
        self.server.as_ref()
    }

    /// The number of polls that ended without a change in the last call to
    /// [connect][Self::connect].
    pub fn times_retried(&self) -> u32 {
        self.retries
    }

    /// Discovers the server and polls it until a change is reported.
    ///
    /// Polls that time out or ask to reconnect are repeated up to the
    /// server's `max_retries`, then this fails with an
    /// [exhausted][gax::error::Error::is_exhausted] error.
    pub async fn connect(&mut self) -> gax::Result<SimpleMessage> {
        self.retries = 0;
        let servers = self.discovery.clone().send().await?;
        let server = servers
            .first()
            .cloned()
            .ok_or_else(|| Error::deser("no realtime server in the response"))?;
        self.server = Some(server.clone());
        let url = server
            .url()
            .ok_or_else(|| Error::deser("the realtime server has no url"))?;
        let timeout = server
            .retry_timeout()
            .and_then(|s| u64::try_from(s).ok())
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RETRY_TIMEOUT);
        let max_retries = server.max_retries().unwrap_or(0);

        let mut poll = Request::<SimpleMessage>::new(self.discovery.client().clone(), Method::GET, url.to_string())
            .with_timeout(timeout);
        if let Some(token) = &self.cancel {
            poll = poll.with_cancellation(token.clone());
        }
        loop {
            match tokio::time::timeout(timeout, poll.clone().send()).await {
                Ok(Ok(message)) if message.message() != Some(Message::Reconnect) => return Ok(message),
                Ok(Ok(_)) => tracing::debug!(url, "realtime server asked to reconnect"),
                Ok(Err(e)) if e.is_timeout() => tracing::debug!(url, "long poll timed out"),
                Ok(Err(e)) => return Err(e),
                Err(_) => tracing::debug!(url, "long poll timed out"),
            }
            self.retries += 1;
            if max_retries < i64::from(self.retries) {
                return Err(Error::exhausted(
                    self.retries,
                    format!("no change reported by {url}"),
                ));
            }
            tracing::info!(attempt = self.retries, url, "polling realtime server again");
        }
    }
}
