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

//! The typed entity model.
//!
//! Every object returned by the service is stored in a [PropertyBag] and
//! typed by a [Schema]. The typed models in this module are thin wrappers
//! that provide named accessors. Fields the service returns but this crate
//! does not know about are preserved, see [JsonObject::decode].

macro_rules! model {
    ($(#[$attr:meta])* $name:ident => $schema:path $(, page = $page:path)?) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name($crate::model::JsonObject);

        impl $crate::model::Model for $name {
            fn schema() -> &'static $crate::model::Schema {
                &$schema
            }
            fn wrap(object: $crate::model::JsonObject) -> Self {
                Self(object)
            }
            fn as_object(&self) -> &$crate::model::JsonObject {
                &self.0
            }
            fn as_object_mut(&mut self) -> &mut $crate::model::JsonObject {
                &mut self.0
            }
            fn into_object(self) -> $crate::model::JsonObject {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($crate::model::JsonObject::new(&$schema))
            }
        }

        impl From<$name> for $crate::model::Value {
            fn from(v: $name) -> Self {
                $crate::model::Value::from(v.0)
            }
        }

        impl $crate::model::Entry for $name {
            fn from_entry(object: $crate::model::JsonObject) -> Option<Self> {
                <Self as $crate::model::Model>::try_from_object(object)
            }
            fn entry_object(&self) -> &$crate::model::JsonObject {
                &self.0
            }
            $(
                fn page_schema() -> &'static $crate::model::Schema {
                    &$page
                }
            )?
        }

        impl $crate::request::FromResponse for $name {
            fn from_response(body: &$crate::request::ResponseBody) -> gax::Result<Self> {
                body.json_object(&$schema)
                    .map(|o| <Self as $crate::model::Model>::wrap(o))
            }
        }
    };
}
pub(crate) use model;

mod codec;
mod collaboration;
mod collection;
mod download;
mod entity;
mod enums;
mod error_info;
mod event;
mod item;
mod metadata;
pub mod schema;
mod user;
mod value;

pub use codec::{JsonObject, resolve};
pub use collaboration::{Collaboration, Collection, Comment};
pub use collection::{EventEntry, EventStream, Order, OutOfBounds, PagedCollection};
pub use download::DownloadInfo;
pub use entity::{CollaboratorLike, Entity, EntityLike, ItemLike, Object};
pub use enums::*;
pub use error_info::ErrorInfo;
pub use event::{EnterpriseEvent, Event, RealTimeServer, SimpleMessage};
pub use item::{Bookmark, File, FileVersion, Folder, SharedLink, UploadEmail};
pub use metadata::{Metadata, MetadataOp, MetadataUpdate};
pub use schema::Schema;
pub use user::{Enterprise, Group, User};
pub use value::{PropertyBag, Value};

use serde_json::{Map, Value as Json};

/// The behavior shared by all typed models.
pub trait Model: Clone + std::fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    /// The field table for this type.
    fn schema() -> &'static Schema;

    #[doc(hidden)]
    fn wrap(object: JsonObject) -> Self;

    fn as_object(&self) -> &JsonObject;

    fn as_object_mut(&mut self) -> &mut JsonObject;

    fn into_object(self) -> JsonObject;

    /// Converts a decoded object if its schema is this type or derives from it.
    fn try_from_object(object: JsonObject) -> Option<Self> {
        object
            .schema()
            .is_a(Self::schema())
            .then(|| Self::wrap(object))
    }

    /// Creates a model from a copy of `properties`.
    fn from_properties(properties: &PropertyBag) -> Self {
        Self::wrap(JsonObject::with_properties(Self::schema(), properties))
    }

    fn from_json(json: &Map<String, Json>) -> Self {
        Self::wrap(JsonObject::decode(Self::schema(), json))
    }

    fn from_json_str(json: &str) -> serde_json::Result<Self> {
        JsonObject::from_json_str(Self::schema(), json).map(Self::wrap)
    }

    fn properties(&self) -> &PropertyBag {
        self.as_object().properties()
    }

    /// Returns a field by its wire name.
    fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().get(key)
    }

    /// Sets a field by its wire name.
    fn set<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.as_object_mut().set(key, value);
        self
    }

    fn to_json(&self) -> Json {
        self.as_object().to_json()
    }

    fn to_json_string(&self) -> String {
        self.as_object().to_json_string()
    }
}

/// Types that can be the entries of a [PagedCollection].
pub trait Entry: Clone + std::fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    /// Converts a decoded entry, `None` if it has the wrong type.
    fn from_entry(object: JsonObject) -> Option<Self>;

    fn entry_object(&self) -> &JsonObject;

    /// The schema used to decode pages of this type.
    fn page_schema() -> &'static Schema {
        &schema::COLLECTION_PAGE
    }
}
