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

//! Errors created by the authentication flows.
//!
//! The OAuth endpoints report failures with an error code. Some of these
//! codes mean the refresh token is no longer usable and the user must log in
//! again. Others are transient, or can be fixed without a new login.

use bytes::Bytes;
pub use gax::error::CredentialsError;
use gax::error::ServiceError;

/// The error codes reported by the OAuth endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum OAuthError {
    /// The refresh token expired or was revoked.
    InvalidGrant,
    /// The user denied access.
    AccessDenied,
    /// The request is malformed.
    InvalidRequest,
    /// The client credentials are invalid.
    InvalidClient,
    /// The user must reset their password.
    PasswordResetRequired,
    /// The user must accept the terms of service.
    TermsOfServiceRequired,
    /// The trial ended without a credit card on file.
    NoCreditCardTrialEnded,
    /// The authorization server is temporarily unavailable.
    TemporarilyUnavailable,
    /// The service is blocked for this user.
    ServiceBlocked,
    /// The device is not authorized.
    UnauthorizedDevice,
    /// The grace period for this account has expired.
    GracePeriodExpired,
    /// Access from the current location is blocked.
    AccessFromLocationBlocked,
    /// An unrecognized error code.
    Other,
}

impl OAuthError {
    /// Maps the wire error code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid_grant" => Self::InvalidGrant,
            "access_denied" => Self::AccessDenied,
            "invalid_request" => Self::InvalidRequest,
            "invalid_client" => Self::InvalidClient,
            "password_reset_required" => Self::PasswordResetRequired,
            "terms_of_service_required" => Self::TermsOfServiceRequired,
            "no_credit_card_trial_ended" => Self::NoCreditCardTrialEnded,
            "temporarily_unavailable" => Self::TemporarilyUnavailable,
            "service_blocked" => Self::ServiceBlocked,
            "unauthorized_device" => Self::UnauthorizedDevice,
            "grace_period_expired" => Self::GracePeriodExpired,
            "access_from_location_blocked" => Self::AccessFromLocationBlocked,
            _ => Self::Other,
        }
    }

    /// Returns `true` if only a new login can recover from this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidGrant
                | Self::AccessDenied
                | Self::NoCreditCardTrialEnded
                | Self::ServiceBlocked
                | Self::InvalidClient
                | Self::UnauthorizedDevice
                | Self::GracePeriodExpired
                | Self::Other
        )
    }
}

/// Creates a [CredentialsError] from an OAuth error code.
///
/// # Example
/// ```
/// # use cloud_content_auth::errors::from_oauth_error;
/// let e = from_oauth_error("invalid_grant", Some("Refresh token has expired"));
/// assert!(e.is_fatal());
/// let e = from_oauth_error("temporarily_unavailable", None);
/// assert!(e.is_retryable());
/// ```
pub fn from_oauth_error(code: &str, description: Option<&str>) -> CredentialsError {
    let is_retryable = !OAuthError::from_code(code).is_fatal();
    let message = match description {
        Some(d) => format!("{code}: {d}"),
        None => code.to_string(),
    };
    CredentialsError::from_str(is_retryable, message)
}

/// Creates a [CredentialsError] from the response of an OAuth endpoint.
///
/// Responses without an error code are classified by their HTTP status:
/// server errors and rate limiting are transient, anything else is fatal.
pub fn from_http_response(status: u16, payload: &Bytes) -> CredentialsError {
    let body = ServiceError::from_payload(payload);
    let code = body.as_ref().and_then(|b| b.error_code().map(str::to_string));
    match (code, body) {
        (Some(code), body) => {
            let description = body
                .as_ref()
                .and_then(|b| b.error_description.as_deref().or(b.message.as_deref()));
            from_oauth_error(&code, description)
        }
        (None, _) => {
            let is_retryable = status == 429 || (500..600).contains(&status);
            CredentialsError::from_str(
                is_retryable,
                format!("the authorization server reports a [{status}] error"),
            )
        }
    }
}

/// Creates a transient [CredentialsError] from a network failure.
pub fn network_error<T: std::error::Error + Send + Sync + 'static>(source: T) -> CredentialsError {
    CredentialsError::new(true, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("invalid_grant", true)]
    #[test_case("access_denied", true)]
    #[test_case("invalid_client", true)]
    #[test_case("no_credit_card_trial_ended", true)]
    #[test_case("service_blocked", true)]
    #[test_case("unauthorized_device", true)]
    #[test_case("grace_period_expired", true)]
    #[test_case("something_new", true)]
    #[test_case("invalid_request", false)]
    #[test_case("password_reset_required", false)]
    #[test_case("terms_of_service_required", false)]
    #[test_case("temporarily_unavailable", false)]
    #[test_case("access_from_location_blocked", false)]
    fn classification(code: &str, fatal: bool) {
        assert_eq!(OAuthError::from_code(code).is_fatal(), fatal, "{code}");
        let got = from_oauth_error(code, Some("test-only"));
        assert_eq!(got.is_fatal(), fatal, "{got}");
        assert!(format!("{got}").contains(code), "{got}");
        assert!(format!("{got}").contains("test-only"), "{got}");
    }

    #[test]
    fn http_response_with_code() {
        let payload = Bytes::from_static(
            br#"{"error":"invalid_grant","error_description":"Refresh token has expired"}"#,
        );
        let got = from_http_response(400, &payload);
        assert!(got.is_fatal(), "{got}");
        assert!(format!("{got}").contains("Refresh token has expired"), "{got}");
    }

    #[test_case(503, true)]
    #[test_case(429, true)]
    #[test_case(400, false)]
    #[test_case(401, false)]
    fn http_response_without_code(status: u16, retryable: bool) {
        let got = from_http_response(status, &Bytes::from_static(b"oops"));
        assert_eq!(got.is_retryable(), retryable, "{got}");
    }

    #[test]
    fn network() {
        let got = network_error(std::io::Error::other("reset"));
        assert!(got.is_retryable(), "{got}");
    }
}
