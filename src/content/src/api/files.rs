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

use super::items::Items;
use super::enc;
use crate::client::ClientInner;
use crate::download::Download;
use crate::model::{Comment, File, FileVersion, PagedCollection, SharedLink};
use crate::request::Request;
use crate::upload::Upload;
use http::Method;
use std::sync::Arc;

/// Operations on files.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # use cloud_content::model::ItemLike;
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let file = client
///     .files()
///     .info("5000948880")
///     .with_fields(["name", "size", "etag"])
///     .send()
///     .await?;
/// println!("{:?} has {:?} bytes", file.name(), file.size());
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Files {
    items: Items,
}

impl Files {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self {
            items: Items::new(inner, "files", "file"),
        }
    }

    pub fn info(&self, id: &str) -> Request<File> {
        self.items.info(id)
    }

    /// Updates the file, configure the changes with the [Request] setters.
    ///
    /// # Example
    /// ```no_run
    /// # use cloud_content::Client;
    /// # async fn sample(client: &Client) -> cloud_content::Result<()> {
    /// let file = client
    ///     .files()
    ///     .update("5000948880")
    ///     .with_description("quarterly numbers")
    ///     .with_tags(["finance"])
    ///     .with_if_match("1")
    ///     .send()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn update(&self, id: &str) -> Request<File> {
        self.items.update(id)
    }

    pub fn rename(&self, id: &str, name: &str) -> Request<File> {
        self.update(id).with_name(name)
    }

    /// Moves the file into the folder `parent_id`.
    pub fn move_to(&self, id: &str, parent_id: &str) -> Request<File> {
        self.update(id).with_parent_id(parent_id)
    }

    /// Copies the file into the folder `parent_id`.
    pub fn copy(&self, id: &str, parent_id: &str) -> Request<File> {
        self.items.copy(id, parent_id)
    }

    /// Moves the file to the trash.
    pub fn delete(&self, id: &str) -> Request<()> {
        self.items.delete(id)
    }

    pub fn create_shared_link(&self, id: &str, link: SharedLink) -> Request<File> {
        self.update(id).with_shared_link(link)
    }

    pub fn disable_shared_link(&self, id: &str) -> Request<File> {
        self.update(id).with_shared_link_removed()
    }

    pub fn add_comment(&self, id: &str, message: &str) -> Request<Comment> {
        self.items.add_comment(id, message)
    }

    pub fn comments(&self, id: &str) -> Request<PagedCollection<Comment>> {
        self.items.comments(id)
    }

    /// Uploads a new file into the folder `parent_id`.
    pub fn upload(&self, parent_id: &str, name: &str) -> Upload {
        let inner = self.items.inner();
        let request = Request::new(inner.clone(), Method::POST, inner.upload_url("/files/content"));
        Upload::new(request).with_parent_id(parent_id).with_name(name)
    }

    /// Uploads a new version of the file.
    pub fn upload_version(&self, id: &str) -> Upload {
        let inner = self.items.inner();
        let path = format!("/files/{}/content", enc(id));
        Upload::new(Request::new(inner.clone(), Method::POST, inner.upload_url(&path)))
    }

    /// Downloads the file contents.
    pub fn download(&self, id: &str) -> Download {
        Download::new(self.items.request(Method::GET, &self.items.path(id, "/content")))
    }

    /// Downloads a PNG thumbnail of the file.
    ///
    /// Use the [Download] size setters to pick the thumbnail size.
    pub fn thumbnail(&self, id: &str) -> Download {
        Download::new(self.items.request(Method::GET, &self.items.path(id, "/thumbnail.png")))
    }

    pub fn trashed_info(&self, id: &str) -> Request<File> {
        self.items.trashed_info(id)
    }

    /// Permanently deletes a trashed file.
    pub fn delete_trashed(&self, id: &str) -> Request<()> {
        self.items.delete_trashed(id)
    }

    /// Restores a trashed file. Set a name or parent to avoid conflicts.
    pub fn restore(&self, id: &str) -> Request<File> {
        self.items.restore(id)
    }

    pub fn versions(&self, id: &str) -> Request<PagedCollection<FileVersion>> {
        self.items.request(Method::GET, &self.items.path(id, "/versions"))
    }

    /// Makes a previous version the current version.
    pub fn promote_version(&self, id: &str, version_id: &str) -> Request<FileVersion> {
        self.items
            .request::<FileVersion>(Method::POST, &self.items.path(id, "/versions/current"))
            .with_body_field("type", "file_version")
            .with_body_field("id", version_id)
    }

    pub fn delete_version(&self, id: &str, version_id: &str) -> Request<()> {
        let suffix = format!("/versions/{}", enc(version_id));
        self.items.request(Method::DELETE, &self.items.path(id, &suffix))
    }

    pub fn add_to_collection(&self, id: &str, collection_id: &str) -> Request<File> {
        self.update(id).with_collections([collection_id])
    }

    pub fn remove_from_collections(&self, id: &str) -> Request<File> {
        self.update(id).with_collections(Vec::<String>::new())
    }
}
