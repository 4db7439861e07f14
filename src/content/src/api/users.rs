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

use super::enc;
use crate::client::ClientInner;
use crate::model::{PagedCollection, User};
use crate::request::Request;
use http::Method;
use std::sync::Arc;

/// Operations on users.
#[derive(Clone, Debug)]
pub struct Users {
    inner: Arc<ClientInner>,
}

impl Users {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn request<T>(&self, method: Method, path: &str) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url(path))
    }

    /// The user of the current session.
    pub fn current(&self) -> Request<User> {
        self.request(Method::GET, "/users/me")
    }

    pub fn info(&self, id: &str) -> Request<User> {
        self.request(Method::GET, &format!("/users/{}", enc(id)))
    }

    /// Lists the users in the enterprise, requires an admin session.
    ///
    /// # Parameters
    /// * `filter_term` - only return users whose name or login starts with
    ///   this value.
    pub fn enterprise_users(&self, filter_term: Option<&str>) -> Request<PagedCollection<User>> {
        let request = self.request::<PagedCollection<User>>(Method::GET, "/users");
        match filter_term {
            Some(term) => request.with_query("filter_term", term),
            None => request,
        }
    }

    /// Creates a managed user.
    pub fn create(&self, login: &str, name: &str) -> Request<User> {
        self.request::<User>(Method::POST, "/users")
            .with_body_field("login", login)
            .with_body_field("name", name)
    }

    pub fn update(&self, id: &str) -> Request<User> {
        self.request(Method::PUT, &format!("/users/{}", enc(id)))
    }

    /// Deletes a user.
    ///
    /// # Parameters
    /// * `notify` - send the user an email about the deletion.
    /// * `force` - delete the user even if they still own files.
    pub fn delete(&self, id: &str, notify: bool, force: bool) -> Request<()> {
        self.request::<()>(Method::DELETE, &format!("/users/{}", enc(id)))
            .with_query("notify", notify.to_string())
            .with_query("force", force.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::*;
    use crate::model::{EntityLike, UserRole};
    use gax::http_client::HttpResponse;
    use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn requests() {
        let users = test_client(MockTransport::new()).users();
        assert_eq!(users.current().url(), "https://api.test/2.0/users/me");
        let list = users.enterprise_users(Some("sean")).with_limit(10).with_offset(0);
        assert_eq!(list.url(), "https://api.test/2.0/users");
        assert_eq!(list.query("filter_term"), Some("sean"));
        assert_eq!(list.query("limit"), Some("10"));
        assert_eq!(users.enterprise_users(None).query("filter_term"), None);
        let create = users.create("sean@box.com", "Sean");
        assert_eq!(create.body_field("login").map(|v| v.to_string()), Some("sean@box.com".to_string()));
        let delete = users.delete("17738362", false, true);
        assert_eq!(delete.query("notify"), Some("false"));
        assert_eq!(delete.query("force"), Some("true"));
    }

    #[tokio::test]
    async fn current() -> anyhow::Result<()> {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            let body = json!({"type": "user", "id": "17738362", "login": "sean@box.com", "role": "admin"});
            Ok(HttpResponse::new(200, headers, body.to_string()))
        });
        let client = test_client(mock);
        let user = client.users().current().send().await?;
        assert_eq!(user.id(), Some("17738362"));
        assert_eq!(user.login(), Some("sean@box.com"));
        assert_eq!(user.role(), Some(UserRole::Admin));
        Ok(())
    }
}
