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

use bytes::Bytes;

/// The error body returned by the service.
///
/// The service reports errors using one of two shapes. Most endpoints return
/// `{type, status, code, message, request_id, context_info, help_url}`, while
/// the OAuth endpoints return `{error, error_description}`. Both shapes are
/// captured here, any missing field is `None`.
///
/// The `context_info` field is kept as raw JSON, higher layers decode any
/// entities (e.g. name conflicts) it may contain.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ServiceError {
    /// The error body type, usually `error`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// The HTTP status code, as reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// A short, machine readable error code, e.g. `item_name_in_use`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// A human readable description of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The request id, useful when contacting support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// A link to the documentation for this error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Additional information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_info: Option<serde_json::Value>,

    /// The OAuth error code, e.g. `invalid_grant`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The OAuth error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ServiceError {
    /// Parses an error payload.
    ///
    /// Returns `None` if the payload is not a JSON object.
    pub fn from_payload(payload: &Bytes) -> Option<Self> {
        serde_json::from_slice::<Self>(payload.as_ref()).ok()
    }

    /// Returns the most specific error code in the body.
    ///
    /// This is the `code` field for API errors, and the `error` field for
    /// OAuth errors.
    pub fn error_code(&self) -> Option<&str> {
        self.code.as_deref().or(self.error.as_deref())
    }

    /// Sets the value of [code][ServiceError::code].
    pub fn set_code<T: Into<String>>(mut self, v: T) -> Self {
        self.code = Some(v.into());
        self
    }

    /// Sets the value of [message][ServiceError::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = Some(v.into());
        self
    }

    /// Sets the value of [status][ServiceError::status].
    pub fn set_status(mut self, v: u16) -> Self {
        self.status = Some(v);
        self
    }

    /// Sets the value of [request_id][ServiceError::request_id].
    pub fn set_request_id<T: Into<String>>(mut self, v: T) -> Self {
        self.request_id = Some(v.into());
        self
    }

    /// Sets the value of [error][ServiceError::error].
    pub fn set_error<T: Into<String>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn api_error_body() -> anyhow::Result<()> {
        let body = json!({
            "type": "error",
            "status": 409,
            "code": "item_name_in_use",
            "message": "Item with the same name already exists",
            "request_id": "abc123",
            "help_url": "http://developers.example.com/docs/#errors",
            "context_info": {"conflicts": [{"type": "file", "id": "42"}]},
        });
        let payload = Bytes::from(serde_json::to_vec(&body)?);
        let got = ServiceError::from_payload(&payload).expect("payload is an object");
        assert_eq!(got.error_type.as_deref(), Some("error"));
        assert_eq!(got.status, Some(409));
        assert_eq!(got.error_code(), Some("item_name_in_use"));
        assert_eq!(got.request_id.as_deref(), Some("abc123"));
        assert!(got.context_info.is_some(), "{got:?}");
        Ok(())
    }

    #[test]
    fn oauth_error_body() {
        let payload = Bytes::from_static(
            br#"{"error": "invalid_grant", "error_description": "Refresh token has expired"}"#,
        );
        let got = ServiceError::from_payload(&payload).expect("payload is an object");
        let want = ServiceError::default().set_error("invalid_grant");
        assert_eq!(got.error_code(), Some("invalid_grant"));
        assert_eq!(got.error, want.error);
        assert_eq!(
            got.error_description.as_deref(),
            Some("Refresh token has expired")
        );
    }

    #[test]
    fn not_json() {
        let payload = Bytes::from_static(b"<html>Bad Gateway</html>");
        assert!(ServiceError::from_payload(&payload).is_none());
    }
}
