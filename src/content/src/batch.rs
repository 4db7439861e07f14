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

//! Sends several requests as a unit.
//!
//! Requests in a batch are independent. Each one runs to completion, with its
//! own retries, and its result is captured in the batch response. A failed
//! request does not stop the requests after it.

use crate::request::{FromResponse, Request};

/// A list of requests sent in order.
///
/// # Example
/// ```no_run
/// # use cloud_content::batch::Batch;
/// # use cloud_content::Client;
/// # async fn sample(client: &Client) {
/// let mut batch = Batch::new();
/// for id in ["1", "2", "3"] {
///     batch.push(client.files().info(id));
/// }
/// for (i, result) in batch.send().await.into_iter().enumerate() {
///     match result {
///         Ok(file) => println!("{i}: {file:?}"),
///         Err(e) => println!("{i} failed: {e}"),
///     }
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Batch<T> {
    requests: Vec<Request<T>>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
        }
    }
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: Request<T>) {
        self.requests.push(request);
    }

    pub fn with_request(mut self, request: Request<T>) -> Self {
        self.push(request);
        self
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<T: FromResponse> Batch<T> {
    /// Sends every request and returns their results, in order.
    pub async fn send(self) -> Vec<gax::Result<T>> {
        let mut responses = Vec::with_capacity(self.requests.len());
        for (index, request) in self.requests.into_iter().enumerate() {
            let result = request.send().await;
            if let Err(e) = &result {
                tracing::debug!(index, "batch request failed: {e}");
            }
            responses.push(result);
        }
        responses
    }
}

impl<T> FromIterator<Request<T>> for Batch<T> {
    fn from_iter<I: IntoIterator<Item = Request<T>>>(iter: I) -> Self {
        Self {
            requests: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<Request<T>> for Batch<T> {
    fn extend<I: IntoIterator<Item = Request<T>>>(&mut self, iter: I) {
        self.requests.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::*;
    use crate::model::{EntityLike, File, Folder};
    use gax::http_client::HttpResponse;
    use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use http::Method;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> HttpResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        HttpResponse::new(status, headers, body.to_string())
    }

    #[tokio::test]
    async fn partial_failure() -> anyhow::Result<()> {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(3).returning(|r| {
            if r.url.ends_with("/files/2") {
                return Ok(response(404, json!({"type": "error", "status": 404, "code": "not_found"})));
            }
            let id = r.url.rsplit('/').next().unwrap_or_default().to_string();
            Ok(response(200, json!({"type": "file", "id": id})))
        });
        let client = test_client(mock);
        let batch: Batch<File> = ["1", "2", "3"]
            .into_iter()
            .map(|id| client.request(Method::GET, &format!("/files/{id}")))
            .collect();
        assert_eq!(batch.len(), 3);

        let responses = batch.send().await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].as_ref().map(|f| f.id().map(str::to_string)).ok().flatten().as_deref(), Some("1"));
        let err = responses[1].as_ref().expect_err("second request fails");
        assert_eq!(err.http_status_code(), Some(404));
        assert_eq!(responses[2].as_ref().map(|f| f.id().map(str::to_string)).ok().flatten().as_deref(), Some("3"));
        Ok(())
    }

    #[tokio::test]
    async fn mixed_types() -> anyhow::Result<()> {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(2).returning(|r| {
            let kind = if r.url.contains("/folders/") { "folder" } else { "file" };
            Ok(response(200, json!({"type": kind, "id": "7"})))
        });
        let client = test_client(mock);
        let batch = Batch::new()
            .with_request(client.request::<File>(Method::GET, "/files/7").into_raw())
            .with_request(client.request::<Folder>(Method::GET, "/folders/7").into_raw());
        let responses = batch.send().await;
        let file: File = responses[0].as_ref().map_err(|e| anyhow::anyhow!("{e}"))?.decode()?;
        let folder: Folder = responses[1].as_ref().map_err(|e| anyhow::anyhow!("{e}"))?.decode()?;
        assert_eq!(file.entity_type(), Some("file"));
        assert_eq!(folder.entity_type(), Some("folder"));
        Ok(())
    }

    #[tokio::test]
    async fn empty() {
        let batch = Batch::<File>::default();
        assert!(batch.is_empty());
        assert!(batch.send().await.is_empty());
    }
}
