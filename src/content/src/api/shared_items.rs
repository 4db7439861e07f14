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
use crate::model::Object;
use crate::request::Request;
use http::Method;
use std::sync::Arc;

/// Resolves shared links.
///
/// The link and its password are taken from the client session, which must
/// be created with [Session::shared_link][auth::session::Session::shared_link].
#[derive(Clone, Debug)]
pub struct SharedItems {
    inner: Arc<ClientInner>,
}

impl SharedItems {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Returns the file, folder, or bookmark the shared link points to.
    pub fn get(&self) -> Request<Object> {
        Request::new(self.inner.clone(), Method::GET, self.inner.url("/shared_items"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::*;
    use auth::session::Session;
    use gax::http_client::HttpResponse;
    use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use serde_json::json;

    #[tokio::test]
    async fn resolve() -> anyhow::Result<()> {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .times(1)
            .withf(|r| {
                r.url == "https://api.test/2.0/shared_items"
                    && r.headers.get("boxapi").is_some_and(|v| v == "shared_link=https://app.box.com/s/xyz")
            })
            .returning(|_| {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                let body = json!({"type": "folder", "id": "11446498", "name": "Pictures"});
                Ok(HttpResponse::new(200, headers, body.to_string()))
            });
        let session = Session::shared_link(test_info(), MockAuthenticator::new(), "https://app.box.com/s/xyz", None);
        let client = test_client_with_session(mock, session);
        let item = client.shared_items().get().send().await?;
        assert!(matches!(&item, Object::Folder(_)), "{item:?}");
        assert_eq!(item.id(), Some("11446498"));
        Ok(())
    }
}
