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

use super::schema::{self, Conversion, Resolver, Schema};
use super::{Model, PropertyBag, Value};
use crate::date_format;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value as Json};

/// A JSON object decoded with a [Schema].
///
/// Every typed model wraps one of these. The schema selects the conversion
/// used for each member, both when decoding and when encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonObject {
    schema: &'static Schema,
    properties: PropertyBag,
}

#[derive(thiserror::Error, Debug)]
#[error("expected {expected} for field `{field}` in {schema}, got {got}")]
struct ConversionError {
    expected: &'static str,
    field: String,
    schema: &'static str,
    got: String,
}

impl JsonObject {
    /// Creates an empty object.
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            properties: PropertyBag::new(),
        }
    }

    /// Creates an object from existing properties.
    ///
    /// The properties are copied, not shared with the caller.
    pub fn with_properties(schema: &'static Schema, properties: &PropertyBag) -> Self {
        Self {
            schema,
            properties: properties.clone(),
        }
    }

    /// Decodes `json` member by member.
    ///
    /// Known fields are converted as their schema says. Explicit nulls are
    /// kept. Unknown fields, and known fields whose conversion fails, keep
    /// the raw string form of their value.
    pub fn decode(schema: &'static Schema, json: &Map<String, Json>) -> Self {
        let mut object = Self::new(schema);
        for (name, value) in json {
            let converted = match (value, schema.field(name)) {
                (Json::Null, _) => Value::Null,
                (_, None) => raw_string(value),
                (_, Some(field)) => {
                    convert(schema, name, field.conversion, value).unwrap_or_else(|e| {
                        tracing::warn!("{e}, keeping the raw value");
                        raw_string(value)
                    })
                }
            };
            object.properties.insert(name.as_str(), converted);
        }
        object
    }

    /// Decodes a JSON string.
    ///
    /// Fails if the string is not a JSON object.
    pub fn from_json_str(schema: &'static Schema, json: &str) -> serde_json::Result<Self> {
        let map = serde_json::from_str::<Map<String, Json>>(json)?;
        Ok(Self::decode(schema, &map))
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Converts the object back to JSON.
    ///
    /// Permission sets are encoded as `{name: true}` objects and raw JSON
    /// fields as the JSON they hold. Every other value uses
    /// [Value::to_json].
    pub fn to_json_map(&self) -> Map<String, Json> {
        self.properties
            .iter()
            .map(|(name, value)| {
                let conversion = self.schema.field(name).map(|f| f.conversion);
                let json = match (conversion, value) {
                    (Some(Conversion::Permissions), Value::Array(names)) => Json::Object(
                        names
                            .iter()
                            .map(|n| (n.to_string(), Json::Bool(true)))
                            .collect(),
                    ),
                    (Some(Conversion::RawJson), Value::String(text)) => {
                        serde_json::from_str(text).unwrap_or_else(|_| Json::String(text.clone()))
                    }
                    _ => value.to_json(),
                };
                (name.to_string(), json)
            })
            .collect()
    }

    pub fn to_json(&self) -> Json {
        Json::Object(self.to_json_map())
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_long)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_double)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_date(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.get(key).and_then(Value::as_timestamp).copied()
    }

    pub fn get_object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(Value::as_object)
    }

    /// Returns a nested object as a typed model, if it has the right type.
    pub fn get_model<M: Model>(&self, key: &str) -> Option<M> {
        self.get_object(key)
            .and_then(|o| M::try_from_object(o.clone()))
    }

    /// Returns the elements of an array field that are `M` objects.
    pub fn get_models<M: Model>(&self, key: &str) -> Vec<M> {
        self.get(key)
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|o| M::try_from_object(o.clone()))
            .collect()
    }

    /// Returns the string form of each element of an array field.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Sets a field, keeping its position if it already exists.
    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.properties.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}

/// Decodes an object whose type is selected by its discriminator.
///
/// The object is first decoded as a bare entity. Objects without a
/// discriminator remain bare entities. Returns `None` if the discriminator
/// matches no type known to `resolver`.
pub fn resolve(resolver: Resolver, json: &Map<String, Json>) -> Option<JsonObject> {
    let entity = JsonObject::decode(&schema::ENTITY, json);
    let type_name = entity.get_str("type").or_else(|| entity.get_str("item_type"));
    let Some(type_name) = type_name else {
        return Some(entity);
    };
    match schema::by_discriminator(resolver, type_name) {
        Some(schema) => Some(JsonObject::decode(schema, json)),
        None => {
            tracing::debug!("ignoring object with unknown type `{type_name}`");
            None
        }
    }
}

fn raw_string(value: &Json) -> Value {
    match value {
        Json::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

fn convert(
    schema: &'static Schema,
    field: &str,
    conversion: Conversion,
    value: &Json,
) -> Result<Value, ConversionError> {
    let error = |expected: &'static str| ConversionError {
        expected,
        field: field.to_string(),
        schema: schema.name,
        got: value.to_string(),
    };
    let converted = match conversion {
        Conversion::String => match value {
            Json::String(s) => Value::String(s.clone()),
            Json::Number(n) => Value::String(n.to_string()),
            _ => return Err(error("a string")),
        },
        Conversion::Long => to_long(value).map(Value::Long).ok_or_else(|| error("an integer"))?,
        Conversion::Double => match value {
            Json::Number(n) => n.as_f64().map(Value::Double),
            Json::String(s) => s.trim().parse::<f64>().ok().map(Value::Double),
            _ => None,
        }
        .ok_or_else(|| error("a number"))?,
        Conversion::Boolean => match value {
            Json::Bool(b) => Value::Boolean(*b),
            Json::String(s) if s == "true" || s == "false" => Value::Boolean(s == "true"),
            _ => return Err(error("a boolean")),
        },
        Conversion::Date => value
            .as_str()
            .and_then(date_format::parse)
            .map(Value::Timestamp)
            .ok_or_else(|| error("a date"))?,
        Conversion::Enum(allowed) => to_enum(value, allowed).ok_or_else(|| error("one of the enumerated values"))?,
        Conversion::StringArray => to_array(value, |v| v.as_str().map(Value::from))
            .ok_or_else(|| error("an array of strings"))?,
        Conversion::EnumArray(allowed) => to_array(value, |v| to_enum(v, allowed))
            .ok_or_else(|| error("an array of enumerated values"))?,
        Conversion::Permissions => match value {
            Json::Object(map) => Value::Array(
                map.iter()
                    .filter(|(_, v)| v.as_bool() == Some(true))
                    .map(|(k, _)| Value::Enum(k.clone()))
                    .collect(),
            ),
            _ => return Err(error("a permissions object")),
        },
        Conversion::Object(nested) => match value {
            Json::Object(map) => JsonObject::decode(nested, map).into(),
            _ => return Err(error("an object")),
        },
        Conversion::ObjectArray(nested) => to_array(value, |v| {
            v.as_object().map(|map| JsonObject::decode(nested, map).into())
        })
        .ok_or_else(|| error("an array of objects"))?,
        Conversion::Resolve(resolver) => match value {
            Json::Object(map) => resolve(resolver, map).into(),
            _ => return Err(error("an object")),
        },
        Conversion::ResolveArray(resolver) => match value {
            Json::Array(items) => Value::Array(
                items
                    .iter()
                    .filter_map(Json::as_object)
                    .filter_map(|map| resolve(resolver, map))
                    .map(Value::from)
                    .collect(),
            ),
            _ => return Err(error("an array of objects")),
        },
        Conversion::RawJson => Value::String(value.to_string()),
        Conversion::Cursor => match value {
            Json::Number(n) => n.as_i64().map(Value::Long),
            Json::String(s) => s.replace('"', "").trim().parse::<i64>().ok().map(Value::Long),
            _ => None,
        }
        .ok_or_else(|| error("a stream position"))?,
    };
    Ok(converted)
}

fn to_long(value: &Json) -> Option<i64> {
    match value {
        Json::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Json::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn to_enum(value: &Json, allowed: &[&str]) -> Option<Value> {
    value
        .as_str()
        .filter(|s| allowed.contains(s))
        .map(|s| Value::Enum(s.to_string()))
}

fn to_array<F>(value: &Json, element: F) -> Option<Value>
where
    F: Fn(&Json) -> Option<Value>,
{
    value
        .as_array()?
        .iter()
        .map(element)
        .collect::<Option<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn as_map(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn decode_known_and_unknown() {
        let json = json!({
            "type": "file",
            "id": "5000948880",
            "size": 629644,
            "created_at": "2012-12-12T10:53:43-08:00",
            "tags": ["approved", "q4"],
            "shared_link": null,
            "new_field": {"nested": 1},
            "another": "plain"
        });
        let object = JsonObject::decode(&schema::FILE, &as_map(json));
        assert_eq!(object.get_str("id"), Some("5000948880"));
        assert_eq!(object.get_long("size"), Some(629644));
        assert!(object.get_date("created_at").is_some());
        assert_eq!(object.get_strings("tags"), vec!["approved", "q4"]);
        assert_eq!(object.get("shared_link"), Some(&Value::Null));
        assert_eq!(object.get("missing"), None);
        assert_eq!(object.get_str("new_field"), Some(r#"{"nested":1}"#));
        assert_eq!(object.get_str("another"), Some("plain"));
        assert_eq!(
            object.properties().keys().collect::<Vec<_>>(),
            vec!["type", "id", "size", "created_at", "tags", "shared_link", "new_field", "another"]
        );
    }

    #[test]
    fn conversion_failures_keep_raw_value() {
        let json = json!({
            "type": "file",
            "created_at": "yesterday",
            "size": "big",
            "item_status": "archived",
        });
        let object = JsonObject::decode(&schema::FILE, &as_map(json));
        assert_eq!(object.get("created_at"), Some(&Value::from("yesterday")));
        assert_eq!(object.get_date("created_at"), None);
        assert_eq!(object.get("size"), Some(&Value::from("big")));
        assert_eq!(object.get("item_status"), Some(&Value::from("archived")));
    }

    #[test_case(json!(42), Some(42))]
    #[test_case(json!(42.0), Some(42))]
    #[test_case(json!(1.0e10), Some(10_000_000_000))]
    #[test_case(json!("17"), Some(17))]
    #[test_case(json!(true), None)]
    fn longs(input: Json, want: Option<i64>) {
        assert_eq!(to_long(&input), want);
    }

    #[test_case(json!(123), 123)]
    #[test_case(json!("123"), 123)]
    #[test_case(json!("\"1348790499819\""), 1348790499819)]
    fn cursor(input: Json, want: i64) {
        let object = JsonObject::decode(
            &schema::EVENT_PAGE,
            &as_map(json!({"next_stream_position": input})),
        );
        assert_eq!(object.get_long("next_stream_position"), Some(want));
    }

    #[test]
    fn permissions() {
        let json = json!({
            "type": "file",
            "permissions": {"can_download": true, "can_upload": false, "can_preview": true}
        });
        let object = JsonObject::decode(&schema::FILE, &as_map(json));
        assert_eq!(object.get_strings("permissions"), vec!["can_download", "can_preview"]);
        assert_eq!(
            object.to_json(),
            json!({
                "type": "file",
                "permissions": {"can_download": true, "can_preview": true}
            })
        );
    }

    #[test]
    fn raw_json() {
        let json = json!({
            "type": "event",
            "additional_details": {"size": 10, "ekm_id": "abc"}
        });
        let object = JsonObject::decode(&schema::ENTERPRISE_EVENT, &as_map(json.clone()));
        assert_eq!(
            object.get_str("additional_details"),
            Some(r#"{"size":10,"ekm_id":"abc"}"#)
        );
        assert_eq!(object.to_json(), json);
    }

    #[test]
    fn resolve_by_discriminator() {
        let folder = resolve(
            Resolver::Entity,
            &as_map(json!({"type": "folder", "id": "11446498", "name": "Pictures"})),
        )
        .expect("folders are known");
        assert_eq!(folder.schema(), &schema::FOLDER);
        assert_eq!(folder.get_str("name"), Some("Pictures"));

        let user = resolve(
            Resolver::Entity,
            &as_map(json!({"type": "user", "id": "17738362", "login": "sean@box.com"})),
        )
        .expect("users are known");
        assert_eq!(user.schema(), &schema::USER);

        let unknown = resolve(Resolver::Entity, &as_map(json!({"type": "unicorn", "id": "1"})));
        assert_eq!(unknown, None);

        let bare = resolve(Resolver::Entity, &as_map(json!({"id": "1"}))).expect("bare entity");
        assert_eq!(bare.schema(), &schema::ENTITY);
    }

    #[test]
    fn resolve_legacy_item_type() {
        let file = resolve(
            Resolver::Entity,
            &as_map(json!({"item_type": "file", "item_id": "123"})),
        )
        .expect("legacy discriminator");
        assert_eq!(file.schema(), &schema::FILE);
        assert_eq!(file.get_str("item_id"), Some("123"));
    }

    #[test]
    fn resolve_unknown_nested_is_null() {
        let json = json!({
            "type": "event",
            "event_id": "f82c3ba03e41f7e8a7608363cc6c0390183c3f83",
            "source": {"type": "unicorn", "id": "1"}
        });
        let object = JsonObject::decode(&schema::EVENT, &as_map(json));
        assert_eq!(object.get("source"), Some(&Value::Null));
    }

    #[test]
    fn encode_round_trip() -> anyhow::Result<()> {
        let json = json!({
            "type": "folder",
            "id": "11446498",
            "sequence_id": "1",
            "etag": "1",
            "name": "Pictures",
            "created_at": "2012-12-12T10:53:43-08:00",
            "size": 629644,
            "parent": {"type": "folder", "id": "0", "name": "All Files"},
            "path_collection": {
                "total_count": 1,
                "entries": [{"type": "folder", "id": "0", "name": "All Files"}]
            },
            "allowed_invitee_roles": ["editor", "viewer"],
            "sync_state": "synced",
            "unknown": "kept",
        });
        let object = JsonObject::from_json_str(&schema::FOLDER, &json.to_string())?;
        assert_eq!(object.to_json(), json);
        let again = JsonObject::decode(&schema::FOLDER, &object.to_json_map());
        assert_eq!(again, object);
        Ok(())
    }

    #[test]
    fn not_an_object() {
        let got = JsonObject::from_json_str(&schema::FILE, "[1, 2]");
        assert!(got.is_err(), "{got:?}");
    }
}
