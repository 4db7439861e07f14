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

//! Builds, sends, and interprets API requests.
//!
//! Every operation in this crate returns a [Request] configured for its
//! endpoint. The request is sent with [Request::send], which runs a bounded
//! loop:
//!
//! * Throttled requests (HTTP 429) are resubmitted after the delay in the
//!   `Retry-After` header, or a default delay with jitter, as configured by
//!   the client's [RateLimitPolicy][gax::rate_limit_policy::RateLimitPolicy].
//! * Requests rejected with an expired access token (HTTP 401 with
//!   `error=invalid_token` in `WWW-Authenticate`) are resubmitted once after
//!   refreshing the session.
//! * Other HTTP 401 responses clear the session user and run the full
//!   authentication flow. The request is resubmitted once if that yields a
//!   user.
//!
//! Any other error status is returned as a [service error][gax::error::Error::service].

use crate::client::ClientInner;
use crate::model::{JsonObject, PropertyBag, Schema, Value};
use crate::upload::MultipartBody;
use auth::session::SHARED_LINK_HEADER;
use bytes::Bytes;
use gax::error::Error;
use gax::http_client::{HttpRequest, HttpResponse};
use gax::rate_limit_policy::TOO_MANY_REQUESTS;
use gax::retry_after::retry_after;
use http::header::{
    ACCEPT_CHARSET, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, IF_MATCH,
    IF_NONE_MATCH, USER_AGENT, WWW_AUTHENTICATE,
};
use http::Method;
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const UNAUTHORIZED: u16 = 401;

/// Types that can be decoded from a response.
pub trait FromResponse: Sized {
    fn from_response(body: &ResponseBody) -> gax::Result<Self>;
}

/// A fully received response.
#[derive(Clone, Debug)]
pub struct ResponseBody {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseBody {
    pub fn new(status: u16, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Returns `true` if the body is declared as JSON.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|c| c.contains(ContentType::Json.as_str()))
    }

    /// Decodes the body as `T`.
    pub fn decode<T: FromResponse>(&self) -> gax::Result<T> {
        T::from_response(self)
    }

    /// Parses the body as JSON.
    ///
    /// Returns `None` for bodies that are not declared as JSON, or empty.
    pub fn json(&self) -> gax::Result<Option<Json>> {
        if !self.is_json() || self.body.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(Error::deser)
    }

    /// Decodes the body with `schema`.
    ///
    /// Bodies that are not JSON decode as an empty object.
    pub fn json_object(&self, schema: &'static Schema) -> gax::Result<JsonObject> {
        match self.json()? {
            None => Ok(JsonObject::new(schema)),
            Some(Json::Object(map)) => Ok(JsonObject::decode(schema, &map)),
            Some(other) => Err(Error::deser(format!(
                "expected a JSON object for {}, got {other}",
                schema.name
            ))),
        }
    }
}

impl FromResponse for () {
    fn from_response(_body: &ResponseBody) -> gax::Result<Self> {
        Ok(())
    }
}

impl FromResponse for Json {
    fn from_response(body: &ResponseBody) -> gax::Result<Self> {
        Ok(body.json()?.unwrap_or(Json::Null))
    }
}

impl FromResponse for ResponseBody {
    fn from_response(body: &ResponseBody) -> gax::Result<Self> {
        Ok(body.clone())
    }
}

/// The encoding of the request body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    Json,
    UrlEncoded,
    JsonPatch,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::JsonPatch => "application/json-patch+json",
        }
    }
}

#[derive(Clone, Debug)]
enum Body {
    Text(String),
    Json(Json),
    Multipart(MultipartBody),
    /// The body failed to serialize, reported when the request is sent.
    Invalid(String),
}

/// A request to the service, returning `T` on success.
///
/// Requests are cheap to clone. A clone can be sent again, for example to
/// repeat a request with a different [etag][Request::with_if_match].
pub struct Request<T> {
    inner: Arc<ClientInner>,
    method: Method,
    url: String,
    query: IndexMap<String, String>,
    headers: Vec<(String, String)>,
    if_match: Option<String>,
    if_none_match: Option<String>,
    fields: PropertyBag,
    body: Option<Body>,
    content_type: ContentType,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
    _response: PhantomData<fn() -> T>,
}

impl<T> Clone for Request<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            method: self.method.clone(),
            url: self.url.clone(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            if_match: self.if_match.clone(),
            if_none_match: self.if_none_match.clone(),
            fields: self.fields.clone(),
            body: self.body.clone(),
            content_type: self.content_type,
            timeout: self.timeout,
            cancel: self.cancel.clone(),
            _response: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("if_match", &self.if_match)
            .field("if_none_match", &self.if_none_match)
            .field("fields", &self.fields)
            .field("content_type", &self.content_type)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<T> Request<T> {
    pub(crate) fn new(inner: Arc<ClientInner>, method: Method, url: String) -> Self {
        Self {
            inner,
            method,
            url,
            query: IndexMap::new(),
            headers: Vec::new(),
            if_match: None,
            if_none_match: None,
            fields: PropertyBag::new(),
            body: None,
            content_type: ContentType::default(),
            timeout: None,
            cancel: None,
            _response: PhantomData,
        }
    }

    /// Limits the response to the given fields.
    pub fn with_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.with_query("fields", fields)
    }

    /// Only perform the operation if the object's etag is `etag`.
    pub fn with_if_match<V: Into<String>>(mut self, etag: V) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    /// Skip returning the object if its etag is still `etag`.
    pub fn with_if_none_match<V: Into<String>>(mut self, etag: V) -> Self {
        self.if_none_match = Some(etag.into());
        self
    }

    /// Sets the timeout for each attempt, overriding the client default.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = Some(v);
        self
    }

    /// Stops the request, including any pending retries, when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Adds a header. Invalid names or values fail the request when sent.
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a query parameter, replacing any previous value.
    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets a body field. Use [Value::Null] to send an explicit `null`.
    pub fn with_body_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.fields.insert(key, value);
        self
    }

    pub fn with_content_type(mut self, v: ContentType) -> Self {
        self.content_type = v;
        self
    }

    /// Sends `body` verbatim instead of the body fields.
    pub fn with_string_body<V: Into<String>>(mut self, body: V) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    pub(crate) fn with_json_body(mut self, body: Json) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Serializes `body` as the JSON body.
    pub(crate) fn with_serialized_body<B: serde::Serialize>(mut self, body: &B) -> Self {
        self.body = Some(match serde_json::to_value(body) {
            Ok(json) => Body::Json(json),
            Err(e) => Body::Invalid(e.to_string()),
        });
        self
    }

    pub(crate) fn with_multipart_body(mut self, body: MultipartBody) -> Self {
        self.body = Some(Body::Multipart(body));
        self
    }

    /// Returns the undecoded response instead of `T`.
    ///
    /// Useful to send requests with different response types in one
    /// [Batch][crate::batch::Batch].
    pub fn into_raw(self) -> Request<ResponseBody> {
        self.into_response()
    }

    /// Changes the response type.
    pub(crate) fn into_response<U>(self) -> Request<U> {
        Request {
            inner: self.inner,
            method: self.method,
            url: self.url,
            query: self.query,
            headers: self.headers,
            if_match: self.if_match,
            if_none_match: self.if_none_match,
            fields: self.fields,
            body: self.body,
            content_type: self.content_type,
            timeout: self.timeout,
            cancel: self.cancel,
            _response: PhantomData,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URL without query parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn body_field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub(crate) fn client(&self) -> &Arc<ClientInner> {
        &self.inner
    }

    /// Encodes the body, `None` if there is nothing to send or the body is
    /// a streamed upload.
    pub fn body(&self) -> Option<(Bytes, String)> {
        match &self.body {
            Some(Body::Text(s)) => Some((Bytes::from(s.clone()), self.content_type.as_str().to_string())),
            Some(Body::Json(j)) => Some((Bytes::from(j.to_string()), self.content_type.as_str().to_string())),
            Some(Body::Multipart(_)) | Some(Body::Invalid(_)) => None,
            None if self.fields.is_empty() => None,
            None => {
                let encoded = match self.content_type {
                    ContentType::Json | ContentType::JsonPatch => {
                        Json::Object(self.fields.to_json_map()).to_string()
                    }
                    ContentType::UrlEncoded => url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(self.fields.iter().map(|(k, v)| (k, v.to_string())))
                        .finish(),
                };
                Some((Bytes::from(encoded), self.content_type.as_str().to_string()))
            }
        }
    }

    /// Builds the wire request for one attempt.
    pub(crate) fn http_request(&self, access_token: Option<&str>) -> gax::Result<HttpRequest> {
        let mut url = url::Url::parse(&self.url).map_err(Error::binding)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        let mut request = HttpRequest::new(self.method.clone(), url.as_str());
        let headers = &mut request.headers;
        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }
        headers.insert(USER_AGENT, header_value(&self.inner.user_agent)?);
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
        if let Some(etag) = &self.if_match {
            headers.insert(IF_MATCH, header_value(etag)?);
        }
        if let Some(etag) = &self.if_none_match {
            headers.insert(IF_NONE_MATCH, header_value(etag)?);
        }
        if let Some(link) = self.inner.session.shared_link_header() {
            let name = HeaderName::try_from(SHARED_LINK_HEADER).map_err(Error::binding)?;
            headers.insert(name, header_value(&link)?);
        }
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(Error::binding)?;
            headers.insert(name, header_value(value)?);
        }
        if let Some(Body::Invalid(e)) = &self.body {
            return Err(Error::ser(e.clone()));
        }
        if let Some(Body::Multipart(multipart)) = &self.body {
            let (content_type, body) = multipart.encode()?;
            headers.insert(CONTENT_TYPE, header_value(&content_type)?);
            request.body = Some(body);
        } else if let Some((body, content_type)) = self.body() {
            headers.insert(CONTENT_TYPE, header_value(&content_type)?);
            request.body = Some(body.into());
        }
        request.timeout = self.timeout.or(self.inner.timeout);
        Ok(request)
    }

    /// Runs `future` unless the request is cancelled first.
    pub(crate) async fn cancellable<F, R>(&self, future: F) -> gax::Result<R>
    where
        F: Future<Output = gax::Result<R>>,
    {
        match &self.cancel {
            None => future.await,
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(Error::cancelled()),
                r = future => r,
            },
        }
    }

    pub(crate) async fn sleep(&self, delay: Duration) -> gax::Result<()> {
        self.cancellable(async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await
    }

    /// Sends the request, handling throttling and authentication failures.
    ///
    /// Returns the response headers for any 2xx status. The body is not
    /// received.
    pub(crate) async fn execute(&self) -> gax::Result<HttpResponse> {
        let session = &self.inner.session;
        let mut rate_limited = 0_u32;
        let mut refreshed = false;
        let mut reauthenticated = false;
        loop {
            let token = session.access_token().await;
            let request = self.http_request(token.as_deref())?;
            tracing::debug!(method = %request.method, url = %request.url, "sending request");
            let response = self
                .cancellable(self.inner.transport.execute(request))
                .await?;
            let status = response.status();
            tracing::debug!(status, url = %self.url, "received response");

            if response.is_success() {
                return Ok(response);
            }
            if status == TOO_MANY_REQUESTS {
                let delay = retry_after(response.headers());
                match self.inner.rate_limit.on_rate_limited(rate_limited, delay) {
                    Some(delay) => {
                        rate_limited += 1;
                        tracing::info!(attempt = rate_limited, ?delay, url = %self.url, "request throttled, retrying");
                        self.sleep(delay).await?;
                        continue;
                    }
                    None => {
                        let headers = response.headers().clone();
                        let payload = self.cancellable(response.collect()).await?;
                        return Err(Error::rate_limited(rate_limited, status, headers, payload));
                    }
                }
            }
            if status == UNAUTHORIZED && is_invalid_token(response.headers()) {
                if !refreshed {
                    refreshed = true;
                    tracing::info!(url = %self.url, "access token expired, refreshing");
                    session
                        .refresh(token.as_deref())
                        .await
                        .map_err(Error::refresh)?;
                    continue;
                }
            } else if status == UNAUTHORIZED && !reauthenticated {
                reauthenticated = true;
                tracing::info!(url = %self.url, "request unauthorized, authenticating");
                session.clear_user().await;
                match session.authenticate().await {
                    Ok(info) if info.user_id.is_some() => continue,
                    Ok(_) => tracing::info!("authentication did not yield a user"),
                    Err(e) => tracing::warn!("authentication failed: {e}"),
                }
            }
            return Err(self.service_error(response).await);
        }
    }

    async fn service_error(&self, response: HttpResponse) -> Error {
        let status = response.status();
        let headers = response.headers().clone();
        match self.cancellable(response.collect()).await {
            Ok(payload) => Error::service(status, headers, payload),
            Err(e) => e,
        }
    }
}

impl<T: FromResponse> Request<T> {
    /// Sends the request and decodes the response.
    pub async fn send(self) -> gax::Result<T> {
        let response = self.execute().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = self.cancellable(response.collect()).await?;
        T::from_response(&ResponseBody::new(status, headers, body))
    }
}

fn header_value(value: &str) -> gax::Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(Error::binding)
}

/// Detects `error=invalid_token` in a `WWW-Authenticate` header.
fn is_invalid_token(headers: &HeaderMap) -> bool {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|part| part.split_once('='))
        .any(|(key, value)| {
            let key = key.split_whitespace().last().unwrap_or_default();
            key.eq_ignore_ascii_case("error")
                && value.replace('"', "").trim().eq_ignore_ascii_case("invalid_token")
        })
}
