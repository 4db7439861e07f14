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

//! The entry point to the content management API.

use crate::api::{
    Bookmarks, Collaborations, Comments, Events, Files, Folders, MetadataApi, Search, SharedItems,
    Users,
};
use crate::request::Request;
use auth::session::Session;
use gax::http_client::{HttpTransport, ReqwestTransport};
use gax::polling_policy::AcceptedPolicy;
use gax::rate_limit_policy::RateLimitPolicy;
use http::Method;
use std::sync::Arc;
use std::time::Duration;

/// The default endpoint for API requests.
pub const DEFAULT_ENDPOINT: &str = "https://api.box.com/2.0";

/// The default endpoint for uploads.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://upload.box.com/api/2.0";

/// A client for the content management API.
///
/// # Example
/// ```
/// # use cloud_content::client::Client;
/// # use cloud_content::model::ItemLike;
/// # async fn sample(session: auth::session::Session) -> gax::Result<()> {
/// let client = Client::new(session);
/// let folder = client.folders().info("0").with_fields(["name", "item_collection"]).send().await?;
/// println!("{:?}", folder.name());
/// # Ok(()) }
/// ```
///
/// # Configuration
///
/// Use [Client::builder] to change the endpoints, the user agent, the
/// default timeout or the HTTP transport. The retry policies for throttled
/// requests and pending downloads are set once per client.
///
/// # Pooling and Cloning
///
/// `Client` holds a connection pool internally. Create one and clone it as
/// needed, clones share the pool and the [Session].
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
pub(crate) struct ClientInner {
    pub endpoint: String,
    pub upload_endpoint: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub transport: Arc<dyn HttpTransport>,
    pub session: Session,
    pub rate_limit: RateLimitPolicy,
    pub accepted: AcceptedPolicy,
}

impl ClientInner {
    /// The full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// The full URL for an upload path.
    pub fn upload_url(&self, path: &str) -> String {
        format!("{}{path}", self.upload_endpoint)
    }
}

impl Client {
    /// Creates a client with the default configuration.
    pub fn new(session: Session) -> Self {
        Self::builder().build(session)
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The session used to authenticate requests.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn files(&self) -> Files {
        Files::new(self.inner.clone())
    }

    pub fn folders(&self) -> Folders {
        Folders::new(self.inner.clone())
    }

    /// Operations on web links.
    pub fn bookmarks(&self) -> Bookmarks {
        Bookmarks::new(self.inner.clone())
    }

    pub fn collaborations(&self) -> Collaborations {
        Collaborations::new(self.inner.clone())
    }

    pub fn comments(&self) -> Comments {
        Comments::new(self.inner.clone())
    }

    pub fn users(&self) -> Users {
        Users::new(self.inner.clone())
    }

    pub fn metadata(&self) -> MetadataApi {
        MetadataApi::new(self.inner.clone())
    }

    pub fn events(&self) -> Events {
        Events::new(self.inner.clone())
    }

    pub fn search(&self) -> Search {
        Search::new(self.inner.clone())
    }

    /// Resolves shared links, use with a [Session::shared_link] session.
    pub fn shared_items(&self) -> SharedItems {
        SharedItems::new(self.inner.clone())
    }

    /// Creates a request for an endpoint without a dedicated builder.
    ///
    /// `path` is relative to the API endpoint, e.g. `/files/123/watermark`.
    pub fn request<T>(&self, method: Method, path: &str) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url(path))
    }
}

/// Configures a [Client].
///
/// # Example
/// ```
/// # use cloud_content::client::Client;
/// # use std::time::Duration;
/// # fn sample(session: auth::session::Session) {
/// let client = Client::builder()
///     .with_endpoint("https://api.example.com/2.0")
///     .with_timeout(Duration::from_secs(60))
///     .build(session);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    endpoint: String,
    upload_endpoint: String,
    user_agent: String,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn HttpTransport>>,
    rate_limit: RateLimitPolicy,
    accepted: AcceptedPolicy,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
            timeout: None,
            transport: None,
            rate_limit: RateLimitPolicy::default(),
            accepted: AcceptedPolicy::default(),
        }
    }
}

impl ClientBuilder {
    /// Changes the API endpoint, trailing slashes are removed.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = trim_endpoint(v.into());
        self
    }

    pub fn with_upload_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.upload_endpoint = trim_endpoint(v.into());
        self
    }

    pub fn with_user_agent<V: Into<String>>(mut self, v: V) -> Self {
        self.user_agent = v.into();
        self
    }

    /// Sets the default timeout for each attempt of a request.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = Some(v);
        self
    }

    /// Replaces the default [ReqwestTransport].
    pub fn with_transport<T: HttpTransport + 'static>(mut self, v: T) -> Self {
        self.transport = Some(Arc::new(v));
        self
    }

    /// Changes how throttled (HTTP 429) requests are resubmitted.
    pub fn with_rate_limit_policy(mut self, v: RateLimitPolicy) -> Self {
        self.rate_limit = v;
        self
    }

    /// Changes how downloads poll while the content is generated (HTTP 202).
    pub fn with_accepted_policy(mut self, v: AcceptedPolicy) -> Self {
        self.accepted = v;
        self
    }

    pub fn build(self, session: Session) -> Client {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        Client {
            inner: Arc::new(ClientInner {
                endpoint: self.endpoint,
                upload_endpoint: self.upload_endpoint,
                user_agent: self.user_agent,
                timeout: self.timeout,
                transport,
                session,
                rate_limit: self.rate_limit,
                accepted: self.accepted,
            }),
        }
    }
}

fn default_user_agent() -> String {
    format!("cloud-content-rust/{}", env!("CARGO_PKG_VERSION"))
}

fn trim_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}
