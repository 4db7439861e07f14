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

//! Field tables for every object in the API.
//!
//! Each [Schema] lists the fields a type knows how to convert, and inherits
//! the fields of its parent. A single generic loop in the codec walks a JSON
//! object and looks up each member in these tables.

/// Describes how to convert the members of a JSON object.
pub struct Schema {
    /// The name of the type, used in logs and errors.
    pub name: &'static str,
    /// The discriminator value for types that carry one.
    pub type_name: Option<&'static str>,
    pub parent: Option<&'static Schema>,
    pub fields: &'static [Field],
}

impl Schema {
    /// Finds the conversion for `name` in this schema or its ancestors.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        let mut current = Some(self);
        while let Some(schema) = current {
            if let Some(f) = schema.fields.iter().find(|f| f.name == name) {
                return Some(f);
            }
            current = schema.parent;
        }
        None
    }

    /// Returns `true` if this schema is `other` or derives from it.
    pub fn is_a(&self, other: &Schema) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if std::ptr::eq(schema, other) {
                return true;
            }
            current = schema.parent;
        }
        false
    }
}

// Schemas reference each other, possibly in cycles. Compare by identity.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema").field("name", &self.name).finish()
    }
}

/// A known field and its conversion.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub conversion: Conversion,
}

/// The conversions from JSON members to [Value][super::Value]s.
#[derive(Clone, Copy, Debug)]
pub enum Conversion {
    String,
    /// Integers, also accepted as floating point numbers or numeric strings.
    Long,
    Double,
    Boolean,
    Date,
    /// A string restricted to the given values.
    Enum(&'static [&'static str]),
    StringArray,
    EnumArray(&'static [&'static str]),
    /// An object of `{name: bool}`, keeping the names set to `true`.
    Permissions,
    /// A nested object of a fixed type.
    Object(&'static Schema),
    ObjectArray(&'static Schema),
    /// A nested object whose type is found by its discriminator.
    Resolve(Resolver),
    ResolveArray(Resolver),
    /// Any JSON, kept as its text.
    RawJson,
    /// A stream position, an integer possibly wrapped in quotes.
    Cursor,
}

/// The families of types a discriminator may select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolver {
    /// Any entity with a known discriminator.
    Entity,
    /// Files, folders, and bookmarks.
    Item,
    /// Users and groups.
    Collaborator,
}

macro_rules! fields {
    ($($name:literal => $conversion:expr),* $(,)?) => {
        &[$(Field { name: $name, conversion: $conversion }),*]
    };
}

use super::enums::*;
use Conversion::*;

pub static ENTITY: Schema = Schema {
    name: "Entity",
    type_name: None,
    parent: None,
    fields: fields! {
        "id" => String,
        "type" => String,
        "item_id" => String,
        "item_type" => String,
    },
};

pub static ITEM: Schema = Schema {
    name: "Item",
    type_name: None,
    parent: Some(&ENTITY),
    fields: fields! {
        "name" => String,
        "sequence_id" => String,
        "etag" => String,
        "created_at" => Date,
        "modified_at" => Date,
        "description" => String,
        "size" => Long,
        "trashed_at" => Date,
        "purged_at" => Date,
        "content_created_at" => Date,
        "content_modified_at" => Date,
        "path_collection" => Object(&COLLECTION_PAGE),
        "created_by" => Object(&USER),
        "modified_by" => Object(&USER),
        "owned_by" => Object(&USER),
        "shared_link" => Object(&SHARED_LINK),
        "parent" => Object(&FOLDER),
        "item_status" => Enum(ItemStatus::WIRE),
        "synced" => Boolean,
        "comment_count" => Long,
        "allowed_shared_link_access_levels" => EnumArray(Access::WIRE),
        "tags" => StringArray,
        "permissions" => Permissions,
    },
};

pub static FILE: Schema = Schema {
    name: "File",
    type_name: Some("file"),
    parent: Some(&ITEM),
    fields: fields! {
        "sha1" => String,
        "version_number" => String,
        "extension" => String,
        "is_package" => Boolean,
        "file_version" => Object(&FILE_VERSION),
    },
};

pub static FOLDER: Schema = Schema {
    name: "Folder",
    type_name: Some("folder"),
    parent: Some(&ITEM),
    fields: fields! {
        "folder_upload_email" => Object(&UPLOAD_EMAIL),
        "has_collaborations" => Boolean,
        "sync_state" => Enum(SyncState::WIRE),
        "can_non_owners_invite" => Boolean,
        "item_collection" => Object(&COLLECTION_PAGE),
        "is_externally_owned" => Boolean,
        "allowed_invitee_roles" => EnumArray(CollaborationRole::WIRE),
    },
};

pub static BOOKMARK: Schema = Schema {
    name: "Bookmark",
    type_name: Some("web_link"),
    parent: Some(&ITEM),
    fields: fields! {
        "url" => String,
    },
};

pub static COLLABORATOR: Schema = Schema {
    name: "Collaborator",
    type_name: None,
    parent: Some(&ENTITY),
    fields: fields! {
        "name" => String,
        "created_at" => Date,
        "modified_at" => Date,
    },
};

pub static USER: Schema = Schema {
    name: "User",
    type_name: Some("user"),
    parent: Some(&COLLABORATOR),
    fields: fields! {
        "login" => String,
        "role" => Enum(UserRole::WIRE),
        "language" => String,
        "timezone" => String,
        "space_amount" => Long,
        "space_used" => Long,
        "max_upload_size" => Long,
        "status" => Enum(UserStatus::WIRE),
        "job_title" => String,
        "phone" => String,
        "address" => String,
        "avatar_url" => String,
        "tracking_codes" => RawJson,
        "can_see_managed_users" => Boolean,
        "is_sync_enabled" => Boolean,
        "is_external_collab_restricted" => Boolean,
        "is_exempt_from_device_limits" => Boolean,
        "is_exempt_from_login_verification" => Boolean,
        "enterprise" => Object(&ENTERPRISE),
        "hostname" => String,
        "my_tags" => StringArray,
    },
};

pub static GROUP: Schema = Schema {
    name: "Group",
    type_name: Some("group"),
    parent: Some(&COLLABORATOR),
    fields: &[],
};

pub static ENTERPRISE: Schema = Schema {
    name: "Enterprise",
    type_name: Some("enterprise"),
    parent: Some(&ENTITY),
    fields: fields! {
        "name" => String,
    },
};

pub static FILE_VERSION: Schema = Schema {
    name: "FileVersion",
    type_name: Some("file_version"),
    parent: Some(&ENTITY),
    fields: fields! {
        "name" => String,
        "sha1" => String,
        "deleted_at" => Date,
        "size" => Long,
        "modified_by" => Object(&USER),
        "created_at" => Date,
        "modified_at" => Date,
    },
};

pub static COMMENT: Schema = Schema {
    name: "Comment",
    type_name: Some("comment"),
    parent: Some(&ENTITY),
    fields: fields! {
        "is_reply_comment" => Boolean,
        "message" => String,
        "tagged_message" => String,
        "created_by" => Object(&USER),
        "created_at" => Date,
        "modified_at" => Date,
        "item" => Resolve(Resolver::Entity),
    },
};

pub static COLLABORATION: Schema = Schema {
    name: "Collaboration",
    type_name: Some("collaboration"),
    parent: Some(&ENTITY),
    fields: fields! {
        "created_by" => Object(&USER),
        "created_at" => Date,
        "modified_at" => Date,
        "expires_at" => Date,
        "status" => Enum(CollaborationStatus::WIRE),
        "accessible_by" => Resolve(Resolver::Collaborator),
        "role" => Enum(CollaborationRole::WIRE),
        "acknowledged_at" => Date,
        "item" => Resolve(Resolver::Item),
    },
};

pub static COLLECTION: Schema = Schema {
    name: "Collection",
    type_name: Some("collection"),
    parent: Some(&ENTITY),
    fields: fields! {
        "name" => String,
        "collection_type" => String,
    },
};

pub static EVENT: Schema = Schema {
    name: "Event",
    type_name: Some("event"),
    parent: Some(&ENTITY),
    fields: fields! {
        "event_id" => String,
        "created_by" => Object(&USER),
        "event_type" => String,
        "session_id" => String,
        "is_package" => Boolean,
        "source" => Resolve(Resolver::Entity),
        "created_at" => Date,
        "recorded_at" => Date,
    },
};

pub static ENTERPRISE_EVENT: Schema = Schema {
    name: "EnterpriseEvent",
    type_name: Some("event"),
    parent: Some(&EVENT),
    fields: fields! {
        "ip_address" => String,
        "accessible_by" => Resolve(Resolver::Collaborator),
        "additional_details" => RawJson,
    },
};

pub static METADATA: Schema = Schema {
    name: "Metadata",
    type_name: None,
    parent: None,
    fields: fields! {
        "$parent" => String,
        "$template" => String,
        "$scope" => String,
    },
};

pub static SHARED_LINK: Schema = Schema {
    name: "SharedLink",
    type_name: None,
    parent: None,
    fields: fields! {
        "url" => String,
        "download_url" => String,
        "vanity_url" => String,
        "is_password_enabled" => Boolean,
        "unshared_at" => Date,
        "download_count" => Long,
        "preview_count" => Long,
        "access" => Enum(Access::WIRE),
        "effective_access" => Enum(Access::WIRE),
        "permissions" => Permissions,
        "password" => String,
    },
};

pub static UPLOAD_EMAIL: Schema = Schema {
    name: "UploadEmail",
    type_name: None,
    parent: None,
    fields: fields! {
        "access" => Enum(UploadEmailAccess::WIRE),
        "email" => String,
    },
};

pub static REALTIME_SERVER: Schema = Schema {
    name: "RealTimeServer",
    type_name: Some("realtime_server"),
    parent: Some(&ENTITY),
    fields: fields! {
        "url" => String,
        "ttl" => Long,
        "max_retries" => Long,
        "retry_timeout" => Long,
    },
};

pub static SIMPLE_MESSAGE: Schema = Schema {
    name: "SimpleMessage",
    type_name: None,
    parent: None,
    fields: fields! {
        "message" => Enum(Message::WIRE),
    },
};

pub static ERROR_INFO: Schema = Schema {
    name: "ErrorInfo",
    type_name: None,
    parent: None,
    fields: fields! {
        "type" => String,
        "status" => Long,
        "code" => String,
        "context_info" => Object(&ERROR_CONTEXT),
        "help_url" => String,
        "message" => String,
        "request_id" => String,
        "error" => String,
        "error_description" => String,
    },
};

pub static ERROR_CONTEXT: Schema = Schema {
    name: "ErrorContext",
    type_name: None,
    parent: None,
    fields: fields! {
        "conflicts" => ResolveArray(Resolver::Entity),
    },
};

pub static ORDER: Schema = Schema {
    name: "Order",
    type_name: None,
    parent: None,
    fields: fields! {
        "by" => String,
        "direction" => Enum(Direction::WIRE),
    },
};

pub static DOWNLOAD_INFO: Schema = Schema {
    name: "DownloadInfo",
    type_name: None,
    parent: None,
    fields: fields! {
        "content_length" => Long,
        "content_type" => String,
        "file_name" => String,
        "start_range" => Long,
        "end_range" => Long,
        "total_range" => Long,
        "date" => Date,
        "expiration" => Date,
    },
};

/// A page of entities of any type.
pub static COLLECTION_PAGE: Schema = Schema {
    name: "PagedCollection",
    type_name: None,
    parent: None,
    fields: fields! {
        "total_count" => Long,
        "offset" => Long,
        "limit" => Long,
        "order" => ObjectArray(&ORDER),
        "entries" => ResolveArray(Resolver::Entity),
    },
};

pub static EVENT_PAGE: Schema = Schema {
    name: "EventStream",
    type_name: None,
    parent: Some(&COLLECTION_PAGE),
    fields: fields! {
        "chunk_size" => Long,
        "next_stream_position" => Cursor,
        "entries" => ObjectArray(&EVENT),
    },
};

pub static ENTERPRISE_EVENT_PAGE: Schema = Schema {
    name: "EnterpriseEventStream",
    type_name: None,
    parent: Some(&EVENT_PAGE),
    fields: fields! {
        "entries" => ObjectArray(&ENTERPRISE_EVENT),
    },
};

pub static REALTIME_SERVER_PAGE: Schema = Schema {
    name: "RealTimeServers",
    type_name: None,
    parent: Some(&COLLECTION_PAGE),
    fields: fields! {
        "entries" => ObjectArray(&REALTIME_SERVER),
    },
};

pub static METADATA_PAGE: Schema = Schema {
    name: "MetadataList",
    type_name: None,
    parent: Some(&COLLECTION_PAGE),
    fields: fields! {
        "entries" => ObjectArray(&METADATA),
    },
};

/// Maps a discriminator to the schema used to decode it.
///
/// Events resolve to [ENTERPRISE_EVENT], a superset of [EVENT].
pub fn by_discriminator(resolver: Resolver, type_name: &str) -> Option<&'static Schema> {
    let items: [&'static Schema; 3] = [&FILE, &FOLDER, &BOOKMARK];
    let collaborators: [&'static Schema; 2] = [&USER, &GROUP];
    let specific: [&'static Schema; 5] = [
        &COLLECTION,
        &COMMENT,
        &COLLABORATION,
        &ENTERPRISE,
        &FILE_VERSION,
    ];
    let find = |list: &[&'static Schema]| list.iter().copied().find(|s| s.type_name == Some(type_name));
    match resolver {
        Resolver::Item => find(&items),
        Resolver::Collaborator => find(&collaborators),
        Resolver::Entity => {
            if type_name == "event" {
                return Some(&ENTERPRISE_EVENT);
            }
            find(&specific)
                .or_else(|| find(&items))
                .or_else(|| find(&collaborators))
        }
    }
}
