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

use crate::client::ClientInner;
use crate::date_format;
use crate::model::{
    EnterpriseEvent, Event, EventEntry, EventStream, PagedCollection, RealTimeServer, StreamType,
};
use crate::realtime::RealTimeServerConnection;
use crate::request::{Request, ResponseBody};
use chrono::{DateTime, FixedOffset};
use http::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const ADMIN_LOGS: &str = "admin_logs";

/// Operations on the event streams.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let mut page = client.events().user_events().with_stream_position("now").send().await?;
/// loop {
///     let position = page.next_stream_position().unwrap_or_default().to_string();
///     client.events().realtime().connect().await?;
///     page = client
///         .events()
///         .user_events()
///         .with_stream_position(position)
///         .with_previous(page)
///         .send()
///         .await?;
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Events {
    inner: Arc<ClientInner>,
}

impl Events {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn request<T>(&self, method: Method) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url("/events"))
    }

    /// The events visible to the current user.
    pub fn user_events(&self) -> EventStreamRequest<Event> {
        EventStreamRequest::new(self.request(Method::GET))
    }

    /// The enterprise audit log, requires an admin session.
    pub fn enterprise_events(&self) -> EventStreamRequest<EnterpriseEvent> {
        EventStreamRequest::new(self.request::<ResponseBody>(Method::GET).with_query("stream_type", ADMIN_LOGS))
    }

    /// Discovers the realtime servers for long polling.
    pub fn realtime_server(&self) -> Request<PagedCollection<RealTimeServer>> {
        self.request(Method::OPTIONS)
    }

    /// A long-poll connection that waits for changes to the user events.
    pub fn realtime(&self) -> RealTimeServerConnection {
        RealTimeServerConnection::new(self.realtime_server())
    }
}

/// A request for a page of events.
#[derive(Clone, Debug)]
pub struct EventStreamRequest<E: EventEntry> {
    request: Request<ResponseBody>,
    filter_duplicates: bool,
    previous: Option<EventStream<E>>,
}

impl<E: EventEntry> EventStreamRequest<E> {
    fn new(request: Request<ResponseBody>) -> Self {
        Self {
            request,
            filter_duplicates: true,
            previous: None,
        }
    }

    /// Starts reading at a position returned by a previous page, `0` for
    /// the oldest events or `now` for the current position.
    pub fn with_stream_position<V: Into<String>>(mut self, v: V) -> Self {
        self.request = self.request.with_query("stream_position", v);
        self
    }

    pub fn with_stream_type(mut self, v: StreamType) -> Self {
        self.request = self.request.with_query("stream_type", v.as_str());
        self
    }

    /// The maximum number of events in the page.
    pub fn with_limit(mut self, v: u32) -> Self {
        self.request = self.request.with_query("stream_limit", v.to_string());
        self
    }

    /// Only events created after this time.
    pub fn with_created_after(mut self, v: DateTime<FixedOffset>) -> Self {
        self.request = self.request.with_query("created_after", date_format::format(&v));
        self
    }

    /// Only events created before this time.
    pub fn with_created_before(mut self, v: DateTime<FixedOffset>) -> Self {
        self.request = self.request.with_query("created_before", date_format::format(&v));
        self
    }

    /// Keeps events delivered more than once, the default drops them.
    pub fn with_filter_duplicates(mut self, v: bool) -> Self {
        self.filter_duplicates = v;
        self
    }

    /// Prepends the events of a previous page to the response.
    ///
    /// Duplicates across both pages are dropped unless filtering is off.
    pub fn with_previous(mut self, previous: EventStream<E>) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.request = self.request.with_timeout(v);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.request = self.request.with_cancellation(token);
        self
    }

    pub fn request(&self) -> &Request<ResponseBody> {
        &self.request
    }

    pub async fn send(self) -> gax::Result<EventStream<E>> {
        let body = self.request.send().await?;
        let object = body.json_object(E::page_schema())?;
        let page = EventStream::from_object(&object, self.filter_duplicates);
        Ok(match self.previous {
            Some(previous) => page.merge(previous),
            None => page,
        })
    }
}
