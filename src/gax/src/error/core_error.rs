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

use super::{CredentialsError, ServiceError};
use bytes::Bytes;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may return an error, the transport may be unable to create the
/// necessary connection to make a request, the token refresh may fail, or the
/// rate limit retries may be exhausted.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. The type also offers accessors to query the most common error details.
/// Applications can query the error [source][std::error::Error::source] for
/// deeper information.
///
/// # Example
/// ```
/// use cloud_content_gax::error::Error;
/// match example_function() {
///     Err(e) if e.is_rate_limited() => {
///         println!("too many requests after {:?} retries", e.attempts());
///     },
///     Err(e) if e.is_refresh_fatal() => { println!("login again {e}"); },
///     Err(e) if e.is_service() => {
///         println!("service error {e}, debug using {:?}", e.service_error());
///     },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # Err(Error::service(404, http::HeaderMap::new(), bytes::Bytes::from_static(b"{}")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// The payload is parsed, if possible, into a [ServiceError].
    ///
    /// # Example
    /// ```
    /// use cloud_content_gax::error::Error;
    /// let payload = bytes::Bytes::from_static(br#"{"code": "not_found", "status": 404}"#);
    /// let error = Error::service(404, http::HeaderMap::new(), payload);
    /// assert!(error.is_service());
    /// assert_eq!(error.http_status_code(), Some(404));
    /// assert_eq!(error.service_error().and_then(|e| e.code.as_deref()), Some("not_found"));
    /// ```
    pub fn service(status_code: u16, headers: HeaderMap, payload: Bytes) -> Self {
        let details = HttpDetails::new(status_code, headers, payload);
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// The service returned an error that the client cannot recover from.
    ///
    /// Use [http_status_code][Error::http_status_code] and
    /// [service_error][Error::service_error] to find more details.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service(_))
    }

    /// Creates an error representing exhausted rate limit retries.
    ///
    /// # Example
    /// ```
    /// use cloud_content_gax::error::Error;
    /// let error = Error::rate_limited(1, 429, http::HeaderMap::new(), bytes::Bytes::new());
    /// assert!(error.is_rate_limited());
    /// assert_eq!(error.attempts(), Some(1));
    /// ```
    pub fn rate_limited(attempts: u32, status_code: u16, headers: HeaderMap, payload: Bytes) -> Self {
        let details = HttpDetails::new(status_code, headers, payload);
        Self {
            kind: ErrorKind::RateLimited(attempts, Box::new(details)),
            source: None,
        }
    }

    /// The service kept rejecting the request with "too many requests".
    ///
    /// The client retries rate limited requests a small number of times. This
    /// error is returned once those retries are exhausted, the number of
    /// retries is available via [attempts][Error::attempts].
    ///
    /// # Troubleshooting
    ///
    /// The application is sending too many requests. Consider reducing the
    /// request rate, or spreading the requests over a longer period.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited(..))
    }

    /// Creates an error representing a failed token refresh.
    ///
    /// # Example
    /// ```
    /// use cloud_content_gax::error::{CredentialsError, Error};
    /// let error = Error::refresh(CredentialsError::from_str(false, "revoked"));
    /// assert!(error.is_refresh());
    /// assert!(error.is_refresh_fatal());
    /// ```
    pub fn refresh(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::Refresh,
            source: Some(source.into()),
        }
    }

    /// The access token expired and could not be refreshed.
    pub fn is_refresh(&self) -> bool {
        matches!(self.kind, ErrorKind::Refresh)
    }

    /// The access token could not be refreshed, and a new login is required.
    ///
    /// Returns `false` for transient refresh failures and for any other kind
    /// of error.
    pub fn is_refresh_fatal(&self) -> bool {
        self.is_refresh()
            && self
                .as_inner::<CredentialsError>()
                .is_some_and(CredentialsError::is_fatal)
    }

    /// Creates an error representing an exhausted polling policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use cloud_content_gax::error::Error;
    /// let error = Error::exhausted(3, "max wait time exceeded");
    /// assert!(error.is_exhausted());
    /// assert_eq!(error.attempts(), Some(3));
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(attempts: u32, source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted(attempts),
            source: Some(source.into()),
        }
    }

    /// The request did not complete before the polling policy expired.
    ///
    /// Downloads of content that the service generates on demand (e.g.
    /// thumbnails) are polled until the content is ready. This error is
    /// returned if the content is not ready before the maximum wait time.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted(_))
    }

    /// The number of retry attempts, for rate limited and exhausted errors.
    pub fn attempts(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::RateLimited(n, _) | ErrorKind::Exhausted(n) => Some(*n),
            _ => None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use cloud_content_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. Note that the request may
    /// or may not have started, and it may or may not complete in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a transport failure.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The transport could not send the request or receive the response.
    ///
    /// The request may or may not have reached the service.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a response that cannot be decoded.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be decoded as the declared type.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a request that cannot be serialized.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request body could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error representing a request that cannot be assembled.
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Binding,
            source: Some(source.into()),
        }
    }

    /// The request could not be assembled, e.g. the URL is invalid.
    pub fn is_binding(&self) -> bool {
        matches!(self.kind, ErrorKind::Binding)
    }

    /// Creates an error representing a cancelled request.
    pub fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            source: None,
        }
    }

    /// The application cancelled the request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// The parsed error body, if the service returned one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        self.http_details().and_then(|d| d.service_error.as_ref())
    }

    /// The HTTP status code, if any, associated with this error.
    pub fn http_status_code(&self) -> Option<u16> {
        self.http_details().map(|d| d.status_code)
    }

    /// The headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        self.http_details().map(|d| &d.headers)
    }

    /// The payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&Bytes> {
        self.http_details().map(|d| &d.payload)
    }

    /// Returns the source of the error if it has type `T`.
    ///
    /// # Example
    /// ```
    /// use cloud_content_gax::error::{CredentialsError, Error};
    /// let error = Error::refresh(CredentialsError::from_str(true, "try again"));
    /// let inner = error.as_inner::<CredentialsError>();
    /// assert!(inner.is_some_and(|e| e.is_retryable()));
    /// ```
    pub fn as_inner<T: StdError + Send + Sync + 'static>(&self) -> Option<&T> {
        self.source.as_ref().and_then(|e| e.downcast_ref::<T>())
    }

    fn http_details(&self) -> Option<&HttpDetails> {
        match &self.kind {
            ErrorKind::Service(d) | ErrorKind::RateLimited(_, d) => Some(d.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Binding, Some(e)) => write!(f, "cannot assemble the request {e}"),
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Refresh, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Io, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Exhausted(n), Some(e)) => write!(f, "{e} after {n} attempts"),
            (ErrorKind::Cancelled, _) => write!(f, "the request was cancelled"),
            (ErrorKind::RateLimited(n, d), _) => {
                write!(f, "max rate limit attempts exceeded ({n}), ")?;
                d.display(f)
            }
            (ErrorKind::Service(d), _) => d.display(f),
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

#[derive(Debug)]
enum ErrorKind {
    Binding,
    Serialization,
    Deserialization,
    Refresh,
    Timeout,
    Io,
    Cancelled,
    Exhausted(u32),
    RateLimited(u32, Box<HttpDetails>),
    Service(Box<HttpDetails>),
}

#[derive(Debug)]
struct HttpDetails {
    status_code: u16,
    headers: HeaderMap,
    payload: Bytes,
    service_error: Option<ServiceError>,
}

impl HttpDetails {
    fn new(status_code: u16, headers: HeaderMap, payload: Bytes) -> Self {
        let service_error = ServiceError::from_payload(&payload);
        Self {
            status_code,
            headers,
            payload,
            service_error,
        }
    }

    fn display(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.status_code;
        match &self.service_error {
            Some(e) => write!(
                f,
                "the service reports a [{code}] error with code {} described as: {}",
                e.error_code().unwrap_or_default(),
                e.message
                    .as_deref()
                    .or(e.error_description.as_deref())
                    .unwrap_or_default()
            ),
            None => match std::str::from_utf8(self.payload.as_ref()) {
                Ok(message) => write!(f, "the service reports a [{code}] error: {message}"),
                Err(_) => write!(f, "the service reports a [{code}] error: {:?}", self.payload),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use std::error::Error as StdError;

    static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn service() {
        let payload = Bytes::from_static(
            br#"{"type":"error","status":404,"code":"not_found","message":"Not Found","request_id":"r-123"}"#,
        );
        let error = Error::service(404, headers(), payload.clone());
        assert!(error.is_service(), "{error:?}");
        assert!(!error.is_rate_limited(), "{error:?}");
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(404));
        assert_eq!(error.http_payload(), Some(&payload));
        assert!(error.http_headers().is_some_and(|h| h.contains_key("content-type")));
        let details = error.service_error().expect("payload is valid JSON");
        assert_eq!(details.request_id.as_deref(), Some("r-123"));
        let got = format!("{error}");
        assert!(got.contains("not_found"), "{got}");
        assert!(got.contains("Not Found"), "{got}");
    }

    #[test]
    fn service_without_json() {
        let error = Error::service(502, HeaderMap::new(), Bytes::from_static(b"Bad Gateway"));
        assert!(error.service_error().is_none(), "{error:?}");
        let got = format!("{error}");
        assert!(got.contains("502"), "{got}");
        assert!(got.contains("Bad Gateway"), "{got}");
    }

    #[test]
    fn rate_limited() {
        let error = Error::rate_limited(1, 429, headers(), Bytes::new());
        assert!(error.is_rate_limited(), "{error:?}");
        assert!(!error.is_service(), "{error:?}");
        assert_eq!(error.attempts(), Some(1));
        assert_eq!(error.http_status_code(), Some(429));
        let got = format!("{error}");
        assert!(got.contains("(1)"), "{got}");
    }

    #[test]
    fn refresh() {
        let error = Error::refresh(CredentialsError::from_str(true, "test-only"));
        assert!(error.is_refresh(), "{error:?}");
        assert!(!error.is_refresh_fatal(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");

        let error = Error::refresh(CredentialsError::from_str(false, "test-only"));
        assert!(error.is_refresh_fatal(), "{error:?}");
        let got = format!("{error}");
        assert!(got.contains("test-only"), "{got}");
    }

    #[test]
    fn exhausted() {
        let error = Error::exhausted(2, "max wait time exceeded");
        assert!(error.is_exhausted(), "{error:?}");
        assert_eq!(error.attempts(), Some(2));
        let got = format!("{error}");
        assert!(got.contains("max wait time exceeded"), "{got}");
    }

    #[test]
    fn io_and_timeout() {
        let error = Error::io("connection reset");
        assert!(error.is_io(), "{error:?}");
        assert!(!error.is_timeout(), "{error:?}");
        let error = Error::timeout("deadline");
        assert!(error.is_timeout(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
    }

    #[test]
    fn other_kinds() {
        assert!(Error::deser("bad json").is_deserialization());
        assert!(Error::ser("bad body").is_serialization());
        assert!(Error::binding("bad url").is_binding());
        let error = Error::cancelled();
        assert!(error.is_cancelled(), "{error:?}");
        assert!(error.source().is_none(), "{error:?}");
        assert!(format!("{error}").contains("cancelled"));
    }

    #[test]
    fn as_inner() {
        let error = Error::io(std::io::Error::other("test-only"));
        assert!(error.as_inner::<std::io::Error>().is_some());
        assert!(error.as_inner::<CredentialsError>().is_none());
    }
}
