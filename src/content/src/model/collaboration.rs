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

use super::schema;
use super::{CollaborationRole, CollaborationStatus, EntityLike, Object, User};
use chrono::{DateTime, FixedOffset};

model! {
    /// Grants a user or group access to a folder.
    Collaboration => schema::COLLABORATION
}

impl EntityLike for Collaboration {}

impl Collaboration {
    pub fn created_by(&self) -> Option<User> {
        self.0.get_model("created_by")
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("created_at")
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("modified_at")
    }

    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("expires_at")
    }

    pub fn acknowledged_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("acknowledged_at")
    }

    pub fn status(&self) -> Option<CollaborationStatus> {
        self.0.get_str("status").and_then(CollaborationStatus::from_wire)
    }

    pub fn role(&self) -> Option<CollaborationRole> {
        self.0.get_str("role").and_then(CollaborationRole::from_wire)
    }

    /// The user or group granted access.
    pub fn accessible_by(&self) -> Option<Object> {
        self.0.get_object("accessible_by").cloned().map(Object::from)
    }

    /// The folder shared by this collaboration.
    pub fn item(&self) -> Option<Object> {
        self.0.get_object("item").cloned().map(Object::from)
    }
}

model! {
    /// A comment on a file, a bookmark, or another comment.
    Comment => schema::COMMENT
}

impl EntityLike for Comment {}

impl Comment {
    pub fn is_reply_comment(&self) -> Option<bool> {
        self.0.get_bool("is_reply_comment")
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get_str("message")
    }

    /// The message with `@[user_id:name]` mentions.
    pub fn tagged_message(&self) -> Option<&str> {
        self.0.get_str("tagged_message")
    }

    pub fn created_by(&self) -> Option<User> {
        self.0.get_model("created_by")
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("created_at")
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("modified_at")
    }

    /// The commented object.
    ///
    /// `None` if the service returned an object of an unknown type.
    pub fn item(&self) -> Option<Object> {
        self.0.get_object("item").cloned().map(Object::from)
    }
}

model! {
    /// A collection of items, such as the favorites.
    Collection => schema::COLLECTION
}

impl EntityLike for Collection {}

impl Collection {
    pub fn name(&self) -> Option<&str> {
        self.0.get_str("name")
    }

    pub fn collection_type(&self) -> Option<&str> {
        self.0.get_str("collection_type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::as_map;
    use crate::model::{CollaboratorLike, ItemLike, Model, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn collaboration() {
        let json = json!({
            "type": "collaboration",
            "id": "791293",
            "created_by": {"type": "user", "id": "17738362", "name": "sean rose", "login": "sean@box.com"},
            "created_at": "2012-12-12T10:54:37-08:00",
            "modified_at": "2012-12-12T11:30:43-08:00",
            "expires_at": null,
            "status": "accepted",
            "accessible_by": {"type": "group", "id": "119720", "name": "family"},
            "role": "previewer uploader",
            "acknowledged_at": "2012-12-12T11:30:43-08:00",
            "item": {"type": "folder", "id": "11446500", "sequence_id": "0", "etag": "0", "name": "Shared Pictures"}
        });
        let collaboration = Collaboration::from_json(&as_map(json.clone()));
        assert_eq!(collaboration.status(), Some(CollaborationStatus::Accepted));
        assert_eq!(collaboration.role(), Some(CollaborationRole::PreviewerUploader));
        let Some(Object::Group(group)) = collaboration.accessible_by() else {
            panic!("expected a group: {collaboration:?}");
        };
        assert_eq!(group.name(), Some("family"));
        let Some(Object::Folder(folder)) = collaboration.item() else {
            panic!("expected a folder: {collaboration:?}");
        };
        assert_eq!(folder.name(), Some("Shared Pictures"));
        assert_eq!(collaboration.expires_at(), None);
        assert_eq!(collaboration.to_json(), json);
        assert_eq!(Collaboration::from_json(&as_map(collaboration.to_json())), collaboration);
    }

    #[test]
    fn collaboration_item_must_be_an_item() {
        let json = json!({
            "type": "collaboration",
            "id": "791293",
            "item": {"type": "user", "id": "1"}
        });
        let collaboration = Collaboration::from_json(&as_map(json));
        assert_eq!(collaboration.get("item"), Some(&Value::Null));
        assert_eq!(collaboration.item(), None);
    }

    #[test]
    fn comment() {
        let json = json!({
            "type": "comment",
            "id": "191969",
            "is_reply_comment": false,
            "message": "These tigers are cool!",
            "created_by": {"type": "user", "id": "17738362", "name": "sean rose", "login": "sean@box.com"},
            "created_at": "2012-12-12T11:25:01-08:00",
            "item": {"id": "5000948880", "type": "file"},
            "modified_at": "2012-12-12T11:25:01-08:00"
        });
        let comment = Comment::from_json(&as_map(json.clone()));
        assert_eq!(comment.message(), Some("These tigers are cool!"));
        assert_eq!(comment.is_reply_comment(), Some(false));
        assert!(matches!(comment.item(), Some(Object::File(_))));
        assert_eq!(comment.to_json(), json);
        assert_eq!(Comment::from_json(&as_map(comment.to_json())), comment);
    }

    #[test]
    fn reply_comment() {
        let json = json!({
            "type": "comment",
            "id": "191970",
            "is_reply_comment": true,
            "item": {"id": "191969", "type": "comment"}
        });
        let comment = Comment::from_json(&as_map(json));
        let Some(Object::Comment(parent)) = comment.item() else {
            panic!("expected a comment: {comment:?}");
        };
        assert_eq!(parent.id(), Some("191969"));
    }

    #[test]
    fn collection() {
        let json = json!({"type": "collection", "id": "405151", "name": "Favorites", "collection_type": "favorites"});
        let collection = Collection::from_json(&as_map(json.clone()));
        assert_eq!(collection.name(), Some("Favorites"));
        assert_eq!(collection.collection_type(), Some("favorites"));
        assert_eq!(collection.to_json(), json);
        assert_eq!(Collection::from_json(&as_map(collection.to_json())), collection);
    }
}
