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

use super::schema;
use super::{JsonObject, Object};
use gax::error::Error;

model! {
    /// A typed view of an error body.
    ///
    /// Unlike [gax::error::ServiceError], the conflicting entities in
    /// `context_info` are decoded into models.
    ErrorInfo => schema::ERROR_INFO
}

impl ErrorInfo {
    /// Decodes the payload of a service error.
    ///
    /// Returns `None` if `error` carries no payload or the payload is not a
    /// JSON object.
    pub fn from_error(error: &Error) -> Option<Self> {
        let payload = error.http_payload()?;
        let json = serde_json::from_slice::<serde_json::Value>(payload).ok()?;
        json.as_object()
            .map(|map| Self(JsonObject::decode(&schema::ERROR_INFO, map)))
    }

    pub fn error_type(&self) -> Option<&str> {
        self.0.get_str("type")
    }

    pub fn status(&self) -> Option<i64> {
        self.0.get_long("status")
    }

    pub fn code(&self) -> Option<&str> {
        self.0.get_str("code")
    }

    pub fn help_url(&self) -> Option<&str> {
        self.0.get_str("help_url")
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get_str("message")
    }

    pub fn request_id(&self) -> Option<&str> {
        self.0.get_str("request_id")
    }

    /// The OAuth error code.
    pub fn error(&self) -> Option<&str> {
        self.0.get_str("error")
    }

    pub fn error_description(&self) -> Option<&str> {
        self.0.get_str("error_description")
    }

    /// The existing objects that conflict with the request, e.g. an item with the same name.
    pub fn conflicts(&self) -> Vec<Object> {
        let Some(context) = self.0.get_object("context_info") else {
            return Vec::new();
        };
        context
            .get("conflicts")
            .and_then(|v| v.as_array())
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_object().cloned().map(Object::from))
            .collect()
    }
}
