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

use super::{enc, reference};
use crate::client::ClientInner;
use crate::model::Comment;
use crate::request::Request;
use http::Method;
use std::sync::Arc;

/// Operations on comments.
///
/// Use [Files::add_comment][super::Files::add_comment] to comment on a file.
#[derive(Clone, Debug)]
pub struct Comments {
    inner: Arc<ClientInner>,
}

impl Comments {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn request<T>(&self, method: Method, id: &str) -> Request<T> {
        let path = format!("/comments/{}", enc(id));
        Request::new(self.inner.clone(), method, self.inner.url(&path))
    }

    pub fn info(&self, id: &str) -> Request<Comment> {
        self.request(Method::GET, id)
    }

    /// Replies to the comment `id`.
    pub fn reply(&self, id: &str, message: &str) -> Request<Comment> {
        Request::<Comment>::new(self.inner.clone(), Method::POST, self.inner.url("/comments"))
            .with_body_field("item", reference("comment", id))
            .with_body_field("message", message)
    }

    pub fn update(&self, id: &str, message: &str) -> Request<Comment> {
        self.request::<Comment>(Method::PUT, id)
            .with_body_field("message", message)
    }

    pub fn delete(&self, id: &str) -> Request<()> {
        self.request(Method::DELETE, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn requests() {
        let comments = test_client(MockTransport::new()).comments();
        assert_eq!(comments.info("191969").url(), "https://api.test/2.0/comments/191969");
        let reply = comments.reply("191969", "thanks");
        assert_eq!(reply.url(), "https://api.test/2.0/comments");
        let (body, _) = reply.body().expect("reply has a body");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");
        assert_eq!(body, json!({"item": {"type": "comment", "id": "191969"}, "message": "thanks"}));

        let update = comments.update("191969", "edited");
        assert_eq!(update.method(), &Method::PUT);
        assert_eq!(update.body_field("message").map(|v| v.to_string()), Some("edited".to_string()));
        assert_eq!(comments.delete("191969").method(), &Method::DELETE);
    }
}
