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

//! Per-resource request builders.
//!
//! Each facade is created from a [Client][crate::Client] and returns
//! [Request] values configured for one endpoint. The requests are sent with
//! [Request::send].

mod bookmarks;
mod collaborations;
mod comments;
mod events;
mod files;
mod folders;
mod items;
mod metadata;
mod search;
mod shared_items;
mod users;

pub use bookmarks::Bookmarks;
pub use collaborations::Collaborations;
pub use comments::Comments;
pub use events::{EventStreamRequest, Events};
pub use files::Files;
pub use folders::Folders;
pub use metadata::{DEFAULT_SCOPE, MetadataApi};
pub use search::{DateRange, Search, SearchRequest};
pub use shared_items::SharedItems;
pub use users::Users;

use crate::model::{
    Bookmark, Collaboration, CollaborationRole, CollaborationStatus, Entity, EntityLike, Entry,
    Folder, ItemLike, JsonObject, PagedCollection, SharedLink, SyncState, UploadEmail,
    UploadEmailAccess, Value, schema,
};
use crate::request::Request;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escapes a value used as a path segment.
pub(crate) fn enc(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// A `{type, id}` reference used in request bodies.
pub(crate) fn reference(item_type: &str, id: &str) -> JsonObject {
    let mut object = JsonObject::new(&schema::ENTITY);
    object.set("type", item_type);
    object.set("id", id);
    object
}

/// Fields shared by files, folders, and bookmarks.
impl<T: ItemLike> Request<T> {
    pub fn with_name<V: Into<String>>(self, v: V) -> Self {
        self.with_body_field("name", v.into())
    }

    pub fn with_description<V: Into<String>>(self, v: V) -> Self {
        self.with_body_field("description", v.into())
    }

    /// Moves the item into another folder.
    pub fn with_parent_id<V: Into<String>>(self, v: V) -> Self {
        self.with_body_field("parent", Entity::with_id(v))
    }

    /// Replaces the tags of the item.
    pub fn with_tags<I, V>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.with_body_field("tags", tags)
    }

    /// Creates or changes the shared link of the item.
    pub fn with_shared_link(self, v: SharedLink) -> Self {
        self.with_body_field("shared_link", v)
    }

    /// Removes the shared link of the item.
    ///
    /// This sends an explicit `"shared_link": null`.
    pub fn with_shared_link_removed(self) -> Self {
        self.with_body_field("shared_link", Value::Null)
    }

    /// Replaces the collections containing the item.
    ///
    /// An empty list removes the item from all collections.
    pub fn with_collections<I, V>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let collections: Vec<Value> = ids
            .into_iter()
            .map(|id| Value::from(Entity::with_id(id)))
            .collect();
        self.with_body_field("collections", Value::Array(collections))
    }
}

impl Request<Folder> {
    pub fn with_sync_state(self, v: SyncState) -> Self {
        self.with_body_field("sync_state", v)
    }

    /// Enables the upload email of the folder, or changes who can use it.
    pub fn with_upload_email_access(self, v: UploadEmailAccess) -> Self {
        self.with_body_field("folder_upload_email", UploadEmail::new(v))
    }

    /// Transfers the ownership of the folder.
    pub fn with_owner_id<V: Into<String>>(self, v: V) -> Self {
        self.with_body_field("owned_by", Entity::with_id(v))
    }

    pub fn with_can_non_owners_invite(self, v: bool) -> Self {
        self.with_body_field("can_non_owners_invite", v)
    }
}

impl Request<Bookmark> {
    pub fn with_url<V: Into<String>>(self, v: V) -> Self {
        self.with_body_field("url", v.into())
    }
}

impl Request<Collaboration> {
    pub fn with_role(self, v: CollaborationRole) -> Self {
        self.with_body_field("role", v)
    }

    /// Accepts or rejects a pending collaboration.
    pub fn with_status(self, v: CollaborationStatus) -> Self {
        self.with_body_field("status", v)
    }

    /// Whether the collaborator is notified by email.
    pub fn with_notify(self, v: bool) -> Self {
        self.with_query("notify", v.to_string())
    }
}

impl<E: Entry> Request<PagedCollection<E>> {
    /// The maximum number of entries in the page.
    pub fn with_limit(self, v: u32) -> Self {
        self.with_query("limit", v.to_string())
    }

    /// The index of the first entry in the page.
    pub fn with_offset(self, v: u64) -> Self {
        self.with_query("offset", v.to_string())
    }
}
