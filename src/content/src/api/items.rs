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

//! Operations shared by files, folders, and bookmarks.

use super::{enc, reference};
use crate::client::ClientInner;
use crate::model::{Comment, Entity, EntityLike, PagedCollection};
use crate::request::Request;
use http::Method;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub(crate) struct Items {
    inner: Arc<ClientInner>,
    collection: &'static str,
    item_type: &'static str,
}

impl Items {
    pub(crate) fn new(inner: Arc<ClientInner>, collection: &'static str, item_type: &'static str) -> Self {
        Self {
            inner,
            collection,
            item_type,
        }
    }

    pub(crate) fn inner(&self) -> &Arc<ClientInner> {
        &self.inner
    }

    pub(crate) fn request<T>(&self, method: Method, path: &str) -> Request<T> {
        Request::new(self.inner.clone(), method, self.inner.url(path))
    }

    /// `/{collection}/{id}{suffix}`
    pub(crate) fn path(&self, id: &str, suffix: &str) -> String {
        format!("/{}/{}{suffix}", self.collection, enc(id))
    }

    pub(crate) fn info<T>(&self, id: &str) -> Request<T> {
        self.request(Method::GET, &self.path(id, ""))
    }

    pub(crate) fn update<T>(&self, id: &str) -> Request<T> {
        self.request(Method::PUT, &self.path(id, ""))
    }

    pub(crate) fn copy<T>(&self, id: &str, parent_id: &str) -> Request<T> {
        self.request::<T>(Method::POST, &self.path(id, "/copy"))
            .with_body_field("parent", Entity::with_id(parent_id))
    }

    pub(crate) fn delete(&self, id: &str) -> Request<()> {
        self.request(Method::DELETE, &self.path(id, ""))
    }

    pub(crate) fn trashed_info<T>(&self, id: &str) -> Request<T> {
        self.request(Method::GET, &self.path(id, "/trash"))
    }

    pub(crate) fn delete_trashed(&self, id: &str) -> Request<()> {
        self.request(Method::DELETE, &self.path(id, "/trash"))
    }

    pub(crate) fn restore<T>(&self, id: &str) -> Request<T> {
        self.request(Method::POST, &self.path(id, ""))
    }

    pub(crate) fn comments(&self, id: &str) -> Request<PagedCollection<Comment>> {
        self.request(Method::GET, &self.path(id, "/comments"))
    }

    pub(crate) fn add_comment(&self, id: &str, message: &str) -> Request<Comment> {
        self.request::<Comment>(Method::POST, "/comments")
            .with_body_field("item", reference(self.item_type, id))
            .with_body_field("message", message)
    }
}
