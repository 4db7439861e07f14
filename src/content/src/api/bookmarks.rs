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
use crate::model::{Bookmark, Comment, Entity, EntityLike, PagedCollection, SharedLink};
use crate::request::Request;
use http::Method;
use std::sync::Arc;

/// Operations on bookmarks (web links).
#[derive(Clone, Debug)]
pub struct Bookmarks {
    items: Items,
}

impl Bookmarks {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self {
            items: Items::new(inner, "web_links", "web_link"),
        }
    }

    pub fn info(&self, id: &str) -> Request<Bookmark> {
        self.items.info(id)
    }

    /// Creates a bookmark to `url` inside the folder `parent_id`.
    pub fn create(&self, parent_id: &str, url: &str) -> Request<Bookmark> {
        self.items
            .request::<Bookmark>(Method::POST, "/web_links")
            .with_body_field("url", url)
            .with_body_field("parent", Entity::with_id(parent_id))
    }

    pub fn update(&self, id: &str) -> Request<Bookmark> {
        self.items.update(id)
    }

    pub fn rename(&self, id: &str, name: &str) -> Request<Bookmark> {
        self.update(id).with_name(name)
    }

    pub fn move_to(&self, id: &str, parent_id: &str) -> Request<Bookmark> {
        self.update(id).with_parent_id(parent_id)
    }

    pub fn copy(&self, id: &str, parent_id: &str) -> Request<Bookmark> {
        self.items.copy(id, parent_id)
    }

    pub fn delete(&self, id: &str) -> Request<()> {
        self.items.delete(id)
    }

    pub fn create_shared_link(&self, id: &str, link: SharedLink) -> Request<Bookmark> {
        self.update(id).with_shared_link(link)
    }

    pub fn disable_shared_link(&self, id: &str) -> Request<Bookmark> {
        self.update(id).with_shared_link_removed()
    }

    pub fn comments(&self, id: &str) -> Request<PagedCollection<Comment>> {
        self.items.comments(id)
    }

    pub fn add_comment(&self, id: &str, message: &str) -> Request<Comment> {
        self.items.add_comment(id, message)
    }

    pub fn add_to_collection(&self, id: &str, collection_id: &str) -> Request<Bookmark> {
        self.update(id).with_collections([collection_id])
    }

    pub fn remove_from_collections(&self, id: &str) -> Request<Bookmark> {
        self.update(id).with_collections(Vec::<String>::new())
    }

    pub fn trashed_info(&self, id: &str) -> Request<Bookmark> {
        self.items.trashed_info(id)
    }

    pub fn delete_trashed(&self, id: &str) -> Request<()> {
        self.items.delete_trashed(id)
    }

    pub fn restore(&self, id: &str) -> Request<Bookmark> {
        self.items.restore(id)
    }
}
