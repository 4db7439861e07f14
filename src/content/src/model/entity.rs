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
use super::{
    Bookmark, Collaboration, Collection, Comment, Enterprise, EnterpriseEvent, Entry, Event, File,
    FileVersion, Folder, Group, JsonObject, Model, PagedCollection, RealTimeServer, SharedLink,
    User,
};
use chrono::{DateTime, FixedOffset};

model! {
    /// An object with an id and a type, but no other known fields.
    ///
    /// Objects without a discriminator decode to this type.
    Entity => schema::ENTITY
}

/// Objects identified by an id and a type.
pub trait EntityLike: Model {
    /// The id, falling back to `item_id` in legacy event payloads.
    fn id(&self) -> Option<&str> {
        let object = self.as_object();
        object.get_str("id").or_else(|| object.get_str("item_id"))
    }

    /// The discriminator, falling back to `item_type` in legacy event payloads.
    fn entity_type(&self) -> Option<&str> {
        let object = self.as_object();
        object
            .get_str("type")
            .or_else(|| object.get_str("item_type"))
    }

    /// Creates a reference to an existing object, with only its type and id.
    fn with_id<T: Into<String>>(id: T) -> Self {
        let mut object = JsonObject::new(Self::schema());
        if let Some(type_name) = Self::schema().type_name {
            object.set("type", type_name);
        }
        object.set("id", id.into());
        Self::wrap(object)
    }
}

/// Users and groups.
pub trait CollaboratorLike: EntityLike {
    fn name(&self) -> Option<&str> {
        self.as_object().get_str("name")
    }

    fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("created_at")
    }

    fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("modified_at")
    }
}

/// Files, folders, and bookmarks.
pub trait ItemLike: EntityLike {
    fn name(&self) -> Option<&str> {
        self.as_object().get_str("name")
    }

    fn etag(&self) -> Option<&str> {
        self.as_object().get_str("etag")
    }

    fn sequence_id(&self) -> Option<&str> {
        self.as_object().get_str("sequence_id")
    }

    fn description(&self) -> Option<&str> {
        self.as_object().get_str("description")
    }

    fn size(&self) -> Option<i64> {
        self.as_object().get_long("size")
    }

    fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("created_at")
    }

    fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("modified_at")
    }

    fn trashed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("trashed_at")
    }

    fn purged_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("purged_at")
    }

    fn content_created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("content_created_at")
    }

    fn content_modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.as_object().get_date("content_modified_at")
    }

    /// The ancestors of this item, from the root folder down.
    fn path_collection(&self) -> Option<PagedCollection<Folder>> {
        self.as_object()
            .get_object("path_collection")
            .map(PagedCollection::from_object)
    }

    fn created_by(&self) -> Option<User> {
        self.as_object().get_model("created_by")
    }

    fn modified_by(&self) -> Option<User> {
        self.as_object().get_model("modified_by")
    }

    fn owned_by(&self) -> Option<User> {
        self.as_object().get_model("owned_by")
    }

    fn shared_link(&self) -> Option<SharedLink> {
        self.as_object().get_model("shared_link")
    }

    /// The folder containing this item.
    ///
    /// This is a copy of what the service returned, usually just the id and
    /// name, not the same instance as any other decoded folder.
    fn parent(&self) -> Option<Folder> {
        self.as_object().get_model("parent")
    }

    fn item_status(&self) -> Option<super::ItemStatus> {
        self.as_object()
            .get_str("item_status")
            .and_then(super::ItemStatus::from_wire)
    }

    fn is_synced(&self) -> Option<bool> {
        self.as_object().get_bool("synced")
    }

    fn comment_count(&self) -> Option<i64> {
        self.as_object().get_long("comment_count")
    }

    fn allowed_shared_link_access_levels(&self) -> Vec<super::Access> {
        self.as_object()
            .get_strings("allowed_shared_link_access_levels")
            .iter()
            .filter_map(|s| super::Access::from_wire(s))
            .collect()
    }

    fn tags(&self) -> Vec<String> {
        self.as_object().get_strings("tags")
    }

    /// The names of the permissions the current user has on this item.
    fn permissions(&self) -> Vec<String> {
        self.as_object().get_strings("permissions")
    }

    fn has_permission(&self, name: &str) -> bool {
        self.permissions().iter().any(|p| p == name)
    }
}

impl EntityLike for Entity {}

/// Any object whose type was selected by its discriminator.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Object {
    File(File),
    Folder(Folder),
    Bookmark(Bookmark),
    User(User),
    Group(Group),
    Comment(Comment),
    Collaboration(Collaboration),
    Collection(Collection),
    Enterprise(Enterprise),
    FileVersion(FileVersion),
    Event(Event),
    EnterpriseEvent(EnterpriseEvent),
    RealTimeServer(RealTimeServer),
    /// An entity without a discriminator, or with an unexpected one.
    Entity(Entity),
}

impl Object {
    pub fn as_object(&self) -> &JsonObject {
        match self {
            Object::File(v) => v.as_object(),
            Object::Folder(v) => v.as_object(),
            Object::Bookmark(v) => v.as_object(),
            Object::User(v) => v.as_object(),
            Object::Group(v) => v.as_object(),
            Object::Comment(v) => v.as_object(),
            Object::Collaboration(v) => v.as_object(),
            Object::Collection(v) => v.as_object(),
            Object::Enterprise(v) => v.as_object(),
            Object::FileVersion(v) => v.as_object(),
            Object::Event(v) => v.as_object(),
            Object::EnterpriseEvent(v) => v.as_object(),
            Object::RealTimeServer(v) => v.as_object(),
            Object::Entity(v) => v.as_object(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        let object = self.as_object();
        object.get_str("id").or_else(|| object.get_str("item_id"))
    }

    pub fn entity_type(&self) -> Option<&str> {
        let object = self.as_object();
        object
            .get_str("type")
            .or_else(|| object.get_str("item_type"))
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.as_object().to_json()
    }
}

impl From<JsonObject> for Object {
    fn from(object: JsonObject) -> Self {
        let schema = object.schema();
        macro_rules! select {
            ($($schema:path => $variant:ident),*) => {
                $(
                    if schema == &$schema {
                        return Object::$variant(Model::wrap(object));
                    }
                )*
            };
        }
        select!(
            schema::FILE => File,
            schema::FOLDER => Folder,
            schema::BOOKMARK => Bookmark,
            schema::USER => User,
            schema::GROUP => Group,
            schema::COMMENT => Comment,
            schema::COLLABORATION => Collaboration,
            schema::COLLECTION => Collection,
            schema::ENTERPRISE => Enterprise,
            schema::FILE_VERSION => FileVersion,
            schema::EVENT => Event,
            schema::ENTERPRISE_EVENT => EnterpriseEvent,
            schema::REALTIME_SERVER => RealTimeServer
        );
        Object::Entity(Entity::wrap(object))
    }
}

impl Entry for Object {
    fn from_entry(object: JsonObject) -> Option<Self> {
        Some(Object::from(object))
    }

    fn entry_object(&self) -> &JsonObject {
        self.as_object()
    }
}

impl crate::request::FromResponse for Object {
    fn from_response(body: &crate::request::ResponseBody) -> gax::Result<Self> {
        let Some(serde_json::Value::Object(map)) = body.json()? else {
            return Err(gax::error::Error::deser("expected a JSON object"));
        };
        super::resolve(schema::Resolver::Entity, &map)
            .map(Object::from)
            .ok_or_else(|| gax::error::Error::deser("the object type is not known"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::as_map;
    use crate::model::{ItemStatus, resolve};
    use crate::model::schema::Resolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn legacy_id_and_type() {
        let entity = Entity::from_json(&as_map(json!({"item_id": "123", "item_type": "file"})));
        assert_eq!(entity.id(), Some("123"));
        assert_eq!(entity.entity_type(), Some("file"));

        let entity = Entity::from_json(&as_map(json!({"id": "1", "type": "folder", "item_id": "2"})));
        assert_eq!(entity.id(), Some("1"));
        assert_eq!(entity.entity_type(), Some("folder"));
    }

    #[test]
    fn with_id() {
        let folder = Folder::with_id("0");
        assert_eq!(folder.to_json(), json!({"type": "folder", "id": "0"}));
        let entity = Entity::with_id("42");
        assert_eq!(entity.to_json(), json!({"id": "42"}));
    }

    #[test]
    fn object_from_resolved() {
        let map = as_map(json!({"type": "folder", "id": "11446498", "name": "Pictures"}));
        let object = resolve(Resolver::Entity, &map).map(Object::from);
        let Some(Object::Folder(folder)) = object else {
            panic!("expected a folder, got {object:?}");
        };
        assert_eq!(folder.name(), Some("Pictures"));

        let map = as_map(json!({"type": "user", "id": "17738362"}));
        let object = resolve(Resolver::Entity, &map).map(Object::from);
        assert!(matches!(object, Some(Object::User(_))), "{object:?}");

        let map = as_map(json!({"id": "5"}));
        let object = resolve(Resolver::Entity, &map).map(Object::from);
        assert!(matches!(&object, Some(Object::Entity(e)) if e.id() == Some("5")), "{object:?}");
    }

    #[test]
    fn item_accessors() {
        let file = File::from_json(&as_map(json!({
            "type": "file",
            "id": "5000948880",
            "etag": "3",
            "sequence_id": "3",
            "name": "tigers.jpeg",
            "description": "a picture of tigers",
            "size": 629644,
            "item_status": "active",
            "synced": true,
            "comment_count": 2,
            "tags": ["cats"],
            "permissions": {"can_download": true, "can_upload": false},
            "allowed_shared_link_access_levels": ["open", "company"],
            "parent": {"type": "folder", "id": "11446498", "name": "Pictures"},
            "owned_by": {"type": "user", "id": "17738362", "name": "sean rose"},
            "path_collection": {
                "total_count": 2,
                "entries": [
                    {"type": "folder", "id": "0", "name": "All Files"},
                    {"type": "folder", "id": "11446498", "name": "Pictures"}
                ]
            }
        })));
        assert_eq!(file.id(), Some("5000948880"));
        assert_eq!(ItemLike::name(&file), Some("tigers.jpeg"));
        assert_eq!(file.etag(), Some("3"));
        assert_eq!(file.sequence_id(), Some("3"));
        assert_eq!(file.description(), Some("a picture of tigers"));
        assert_eq!(file.size(), Some(629644));
        assert_eq!(file.item_status(), Some(ItemStatus::Active));
        assert_eq!(file.is_synced(), Some(true));
        assert_eq!(file.comment_count(), Some(2));
        assert_eq!(file.tags(), vec!["cats"]);
        assert!(file.has_permission("can_download"));
        assert!(!file.has_permission("can_upload"));
        assert_eq!(
            file.allowed_shared_link_access_levels(),
            vec![crate::model::Access::Open, crate::model::Access::Company]
        );
        assert_eq!(file.parent().and_then(|p| p.id().map(str::to_string)).as_deref(), Some("11446498"));
        assert_eq!(
            file.owned_by().and_then(|u| CollaboratorLike::name(&u).map(str::to_string)).as_deref(),
            Some("sean rose")
        );
        let path = file.path_collection().expect("path collection is present");
        assert_eq!(path.len(), 2);
        assert_eq!(path.total_count(), Some(2));
        assert_eq!(ItemLike::name(&path.entries()[0]), Some("All Files"));
        assert_eq!(file.created_at(), None);
        assert_eq!(file.shared_link(), None);
    }
}
