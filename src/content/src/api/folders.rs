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
use crate::client::ClientInner;
use crate::model::{Collaboration, Entity, EntityLike, Folder, Object, PagedCollection, SharedLink};
use crate::request::Request;
use http::Method;
use std::sync::Arc;

const DEFAULT_LIMIT: &str = "1000";

/// Operations on folders.
///
/// The root folder of every user has the id `0`.
#[derive(Clone, Debug)]
pub struct Folders {
    items: Items,
}

impl Folders {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self {
            items: Items::new(inner, "folders", "folder"),
        }
    }

    pub fn info(&self, id: &str) -> Request<Folder> {
        self.items.info(id)
    }

    /// Lists the files, folders, and bookmarks in a folder.
    ///
    /// Returns the first 1000 items, use [Request::with_limit] and
    /// [Request::with_offset] to page through larger folders.
    ///
    /// # Example
    /// ```no_run
    /// # use cloud_content::Client;
    /// # use cloud_content::model::Object;
    /// # async fn sample(client: &Client) -> cloud_content::Result<()> {
    /// let items = client.folders().items("0").send().await?;
    /// for item in &items {
    ///     if let Object::Folder(folder) = item {
    ///         println!("folder {folder:?}");
    ///     }
    /// }
    /// # Ok(()) }
    /// ```
    pub fn items(&self, id: &str) -> Request<PagedCollection<Object>> {
        self.items
            .request::<PagedCollection<Object>>(Method::GET, &self.items.path(id, "/items"))
            .with_query("limit", DEFAULT_LIMIT)
            .with_query("offset", "0")
    }

    /// Creates the folder `name` inside `parent_id`.
    pub fn create(&self, parent_id: &str, name: &str) -> Request<Folder> {
        self.items
            .request::<Folder>(Method::POST, "/folders")
            .with_body_field("name", name)
            .with_body_field("parent", Entity::with_id(parent_id))
    }

    pub fn update(&self, id: &str) -> Request<Folder> {
        self.items.update(id)
    }

    pub fn rename(&self, id: &str, name: &str) -> Request<Folder> {
        self.update(id).with_name(name)
    }

    pub fn move_to(&self, id: &str, parent_id: &str) -> Request<Folder> {
        self.update(id).with_parent_id(parent_id)
    }

    pub fn copy(&self, id: &str, parent_id: &str) -> Request<Folder> {
        self.items.copy(id, parent_id)
    }

    /// Moves the folder to the trash.
    ///
    /// Folders that are not empty are only deleted if `recursive` is set.
    pub fn delete(&self, id: &str, recursive: bool) -> Request<()> {
        self.items
            .delete(id)
            .with_query("recursive", recursive.to_string())
    }

    pub fn collaborations(&self, id: &str) -> Request<PagedCollection<Collaboration>> {
        self.items.request(Method::GET, &self.items.path(id, "/collaborations"))
    }

    pub fn create_shared_link(&self, id: &str, link: SharedLink) -> Request<Folder> {
        self.update(id).with_shared_link(link)
    }

    pub fn disable_shared_link(&self, id: &str) -> Request<Folder> {
        self.update(id).with_shared_link_removed()
    }

    pub fn add_to_collection(&self, id: &str, collection_id: &str) -> Request<Folder> {
        self.update(id).with_collections([collection_id])
    }

    pub fn remove_from_collections(&self, id: &str) -> Request<Folder> {
        self.update(id).with_collections(Vec::<String>::new())
    }

    /// Lists the items in the trash.
    pub fn trashed_items(&self) -> Request<PagedCollection<Object>> {
        self.items
            .request::<PagedCollection<Object>>(Method::GET, "/folders/trash/items")
            .with_query("limit", DEFAULT_LIMIT)
            .with_query("offset", "0")
    }

    pub fn trashed_info(&self, id: &str) -> Request<Folder> {
        self.items.trashed_info(id)
    }

    pub fn delete_trashed(&self, id: &str) -> Request<()> {
        self.items.delete_trashed(id)
    }

    pub fn restore(&self, id: &str) -> Request<Folder> {
        self.items.restore(id)
    }
}
