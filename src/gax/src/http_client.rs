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

//! Defines the HTTP transport used by the client libraries.
//!
//! The client libraries build requests (URL, headers, and body) and interpret
//! responses, but delegate opening connections, TLS, and compression to a
//! transport. Applications rarely need to implement [HttpTransport], the
//! default [ReqwestTransport] is based on [reqwest]. Tests and applications
//! with special networking requirements may provide their own.
//!
//! A transport supports cancellation by dropping: dropping the future
//! returned by [HttpTransport::execute], or the [HttpResponse] body, aborts
//! the underlying connection.

use crate::Result;
use crate::error::Error;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use http::{HeaderMap, Method};
use std::time::Duration;

/// The body of an [HttpRequest].
pub enum HttpBody {
    /// A fully buffered body.
    Bytes(Bytes),
    /// A body produced while it is sent, e.g. the contents of an upload.
    Stream(BoxStream<'static, Result<Bytes>>),
}

impl HttpBody {
    /// Receives the full body.
    pub async fn collect(self) -> Result<Bytes> {
        match self {
            Self::Bytes(b) => Ok(b),
            Self::Stream(s) => {
                let chunks = s.try_collect::<Vec<_>>().await?;
                Ok(Bytes::from(chunks.concat()))
            }
        }
    }
}

impl From<Bytes> for HttpBody {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl std::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// A request ready to be sent over the wire.
#[derive(Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The full URL, including any query parameters.
    pub url: String,
    /// The request headers.
    pub headers: HeaderMap,
    /// The request body, if any.
    pub body: Option<HttpBody>,
    /// The timeout for this request, if any.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request without headers, body, or timeout.
    pub fn new<U: Into<String>>(method: Method, url: U) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// The response received from the service.
///
/// The body is received incrementally. Use [chunk][HttpResponse::chunk] to
/// consume it piece by piece, or [collect][HttpResponse::collect] to receive
/// the full body.
pub struct HttpResponse {
    status: u16,
    headers: HeaderMap,
    body: BoxStream<'static, Result<Bytes>>,
}

impl HttpResponse {
    /// Creates a response with a fully buffered body.
    ///
    /// # Example
    /// ```
    /// # use cloud_content_gax::http_client::HttpResponse;
    /// # tokio_test::block_on(async {
    /// let response = HttpResponse::new(200, http::HeaderMap::new(), "hello");
    /// assert_eq!(response.status(), 200);
    /// assert_eq!(response.collect().await?, bytes::Bytes::from_static(b"hello"));
    /// # cloud_content_gax::Result::<()>::Ok(()) });
    /// ```
    pub fn new<B: Into<Bytes>>(status: u16, headers: HeaderMap, body: B) -> Self {
        let body: Bytes = body.into();
        let stream = futures::stream::iter([Ok(body)]).boxed();
        Self::from_stream(status, headers, stream)
    }

    /// Creates a response from a stream of body chunks.
    pub fn from_stream(
        status: u16,
        headers: HeaderMap,
        body: BoxStream<'static, Result<Bytes>>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Receives the next chunk of the body.
    ///
    /// Returns `Ok(None)` once the body is fully received.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.body.next().await.transpose()
    }

    /// Receives the full body.
    pub async fn collect(self) -> Result<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(match chunks.len() {
            1 => chunks.into_iter().next().unwrap_or_default(),
            _ => Bytes::from(chunks.concat()),
        })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// The interface the client libraries need from an HTTP transport.
#[async_trait::async_trait]
pub trait HttpTransport: std::fmt::Debug + Send + Sync {
    /// Sends a request and returns the response headers.
    ///
    /// Any HTTP status, including errors, is a successful result. Only
    /// failures to send the request or receive the response headers are
    /// reported as errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// An [HttpTransport] based on [reqwest].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default [reqwest::Client].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport using a pre-configured [reqwest::Client].
    ///
    /// Use this to configure proxies, connection pools, or custom TLS roots.
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .inner
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        match request.body {
            Some(HttpBody::Bytes(body)) => builder = builder.body(body),
            Some(HttpBody::Stream(body)) => builder = builder.body(reqwest::Body::wrap_stream(body)),
            None => {}
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await.map_err(Self::map_send_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(Self::map_send_error)
            .boxed();
        Ok(HttpResponse::from_stream(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    #[tokio::test]
    async fn collect_chunks() -> anyhow::Result<()> {
        let chunks = vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];
        let response = HttpResponse::from_stream(
            206,
            HeaderMap::new(),
            futures::stream::iter(chunks).boxed(),
        );
        assert!(response.is_success());
        assert_eq!(response.collect().await?, Bytes::from_static(b"hello world"));
        Ok(())
    }

    #[tokio::test]
    async fn chunk_error() -> anyhow::Result<()> {
        let chunks = vec![Ok(Bytes::from_static(b"hello")), Err(Error::io("reset"))];
        let mut response = HttpResponse::from_stream(
            200,
            HeaderMap::new(),
            futures::stream::iter(chunks).boxed(),
        );
        assert_eq!(response.chunk().await?, Some(Bytes::from_static(b"hello")));
        let err = response.chunk().await.expect_err("second chunk fails");
        assert!(err.is_io(), "{err:?}");
        Ok(())
    }

    #[test]
    fn header() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let response = HttpResponse::new(404, headers, Bytes::new());
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
        assert!(!response.is_success());
        let got = format!("{response:?}");
        assert!(got.contains("404"), "{got}");
    }

    #[tokio::test]
    async fn reqwest_transport() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PUT", "/files/123"),
                request::headers(contains(("if-match", "abc"))),
                request::body("{\"name\":\"new\"}"),
            ])
            .respond_with(
                status_code(200)
                    .append_header("etag", "def")
                    .body("{\"type\":\"file\",\"id\":\"123\"}"),
            ),
        );

        let transport = ReqwestTransport::new();
        let mut request = HttpRequest::new(Method::PUT, server.url_str("/files/123"));
        request
            .headers
            .insert("if-match", HeaderValue::from_static("abc"));
        request.body = Some(Bytes::from_static(b"{\"name\":\"new\"}").into());
        request.timeout = Some(Duration::from_secs(30));
        let response = transport.execute(request).await?;
        assert_eq!(response.status(), 200);
        assert_eq!(response.header("etag"), Some("def"));
        let body = response.collect().await?;
        assert_eq!(body, Bytes::from_static(b"{\"type\":\"file\",\"id\":\"123\"}"));
        Ok(())
    }

    #[tokio::test]
    async fn reqwest_transport_error_status() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/files/404"))
                .respond_with(status_code(404).body("not found")),
        );
        let transport = ReqwestTransport::new();
        let response = transport
            .execute(HttpRequest::new(Method::GET, server.url_str("/files/404")))
            .await?;
        assert_eq!(response.status(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn reqwest_transport_streamed_body() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/files/content"),
                request::body("hello world"),
            ])
            .respond_with(status_code(201)),
        );

        let chunks = vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];
        let mut request = HttpRequest::new(Method::POST, server.url_str("/files/content"));
        request.body = Some(HttpBody::Stream(futures::stream::iter(chunks).boxed()));
        let response = ReqwestTransport::new().execute(request).await?;
        assert_eq!(response.status(), 201);
        Ok(())
    }

    #[tokio::test]
    async fn collect_body() -> anyhow::Result<()> {
        let body = HttpBody::from(Bytes::from_static(b"buffered"));
        assert_eq!(format!("{body:?}"), "Bytes(8)");
        assert_eq!(body.collect().await?, Bytes::from_static(b"buffered"));

        let chunks = vec![Ok(Bytes::from_static(b"a")), Ok(Bytes::from_static(b"b"))];
        let body = HttpBody::Stream(futures::stream::iter(chunks).boxed());
        assert_eq!(body.collect().await?, Bytes::from_static(b"ab"));

        let chunks = vec![Ok(Bytes::from_static(b"a")), Err(Error::io("reset"))];
        let body = HttpBody::Stream(futures::stream::iter(chunks).boxed());
        let err = body.collect().await.expect_err("the stream fails");
        assert!(err.is_io(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn reqwest_transport_io_error() {
        let transport = ReqwestTransport::new();
        let err = transport
            .execute(HttpRequest::new(Method::GET, "http://127.0.0.1:1/unreachable"))
            .await
            .expect_err("nothing listens on port 1");
        assert!(err.is_io() || err.is_timeout(), "{err:?}");
    }
}
