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
use crate::model::{Metadata, MetadataUpdate, Model, PagedCollection};
use crate::request::{ContentType, Request};
use http::Method;
use std::sync::Arc;

/// The scope of enterprise metadata templates.
pub const DEFAULT_SCOPE: &str = "enterprise";

/// Operations on the metadata attached to files.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # use cloud_content::model::{Metadata, MetadataUpdate};
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let metadata = client.metadata();
/// metadata
///     .add("5010739061", "marketingCollateral", Metadata::with_values([("audience", "internal")]))
///     .send()
///     .await?;
/// metadata
///     .update("5010739061", "marketingCollateral", MetadataUpdate::new().replace("audience", "external"))
///     .send()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct MetadataApi {
    inner: Arc<ClientInner>,
    scope: String,
}

impl MetadataApi {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self {
            inner,
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Uses templates from another scope, e.g. `global`.
    pub fn with_scope<V: Into<String>>(mut self, v: V) -> Self {
        self.scope = v.into();
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn request<T>(&self, method: Method, path: &str) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url(path))
    }

    fn instance_path(&self, file_id: &str, template: &str) -> String {
        format!("/files/{}/metadata/{}/{}", enc(file_id), enc(&self.scope), enc(template))
    }

    /// Attaches an instance of `template` to a file.
    pub fn add(&self, file_id: &str, template: &str, values: Metadata) -> Request<Metadata> {
        self.request::<Metadata>(Method::POST, &self.instance_path(file_id, template))
            .with_json_body(values.to_json())
    }

    /// Lists all the metadata attached to a file.
    pub fn get_all(&self, file_id: &str) -> Request<PagedCollection<Metadata>> {
        self.request(Method::GET, &format!("/files/{}/metadata", enc(file_id)))
    }

    pub fn get(&self, file_id: &str, template: &str) -> Request<Metadata> {
        self.request(Method::GET, &self.instance_path(file_id, template))
    }

    /// Applies a JSON-patch document to the metadata of a file.
    pub fn update(&self, file_id: &str, template: &str, update: MetadataUpdate) -> Request<Metadata> {
        self.request::<Metadata>(Method::PUT, &self.instance_path(file_id, template))
            .with_content_type(ContentType::JsonPatch)
            .with_serialized_body(&update)
    }

    pub fn delete(&self, file_id: &str, template: &str) -> Request<()> {
        self.request(Method::DELETE, &self.instance_path(file_id, template))
    }

    /// Lists the templates in the scope.
    pub fn templates(&self) -> Request<serde_json::Value> {
        self.request(Method::GET, &format!("/metadata_templates/{}", enc(&self.scope)))
    }

    /// The fields of a template.
    pub fn template_schema(&self, template: &str) -> Request<serde_json::Value> {
        let path = format!("/metadata_templates/{}/{}/schema", enc(&self.scope), enc(template));
        self.request(Method::GET, &path)
    }
}
