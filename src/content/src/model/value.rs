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

use super::JsonObject;
use crate::date_format;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

/// A value stored in a [PropertyBag].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An explicit null. Distinct from a missing key.
    Null,
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
    /// An enumerated value, kept in its wire form.
    Enum(String),
    /// A nested object, typed by its schema.
    Object(Box<JsonObject>),
    Array(Vec<Value>),
}

impl Value {
    /// Converts the value to JSON.
    ///
    /// Objects recurse, numbers and booleans become literals, enums and
    /// strings become strings, and timestamps use the shared date format.
    /// Array elements other than objects are converted to their string form,
    /// objects in arrays are encoded as JSON objects.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Object(o) => Json::Object(o.to_json_map()),
            Value::Long(v) => Json::from(*v),
            Value::Double(v) => Json::from(*v),
            Value::Boolean(v) => Json::Bool(*v),
            Value::Enum(v) => Json::String(v.clone()),
            Value::Timestamp(v) => Json::String(date_format::format(v)),
            Value::String(v) => Json::String(v.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|v| match v {
                        Value::Object(o) => Json::Object(o.to_json_map()),
                        other => Json::String(other.to_string()),
                    })
                    .collect(),
            ),
            Value::Null => Json::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string held by `String` and `Enum` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(v) | Value::Enum(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", date_format::format(v)),
            Value::Object(_) | Value::Array(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<JsonObject> for Value {
    fn from(v: JsonObject) -> Self {
        Value::Object(Box::new(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// An ordered map from field names to values.
///
/// Keys keep the order in which they were first inserted, so encoding a
/// decoded object produces its members in the same order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    properties: IndexMap<String, Value>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, `None` if the key is absent.
    ///
    /// An explicit null returns `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Inserts a value, keeping the position of an existing key.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    /// Removes a key, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts every value with [Value::to_json], in key order.
    pub fn to_json_map(&self) -> Map<String, Json> {
        self.properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn insertion_order() {
        let mut bag = PropertyBag::new();
        bag.insert("zeta", "z");
        bag.insert("alpha", 1_i64);
        bag.insert("mid", true);
        bag.insert("zeta", "again");
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(bag.get("zeta"), Some(&Value::from("again")));

        bag.remove("zeta");
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["alpha", "mid"]);
    }

    #[test]
    fn null_is_not_missing() {
        let mut bag = PropertyBag::new();
        bag.insert("shared_link", Value::Null);
        assert_eq!(bag.get("shared_link"), Some(&Value::Null));
        assert_eq!(bag.get("missing"), None);
        assert_eq!(
            serde_json::to_string(&bag.to_json_map()).ok().as_deref(),
            Some(r#"{"shared_link":null}"#)
        );
    }

    #[test]
    fn to_json_precedence() {
        let date = crate::date_format::parse("2013-01-01T00:00:00-08:00").expect("valid date");
        let bag: PropertyBag = [
            ("s", Value::from("text")),
            ("l", Value::from(42_i64)),
            ("d", Value::from(1.5)),
            ("b", Value::from(false)),
            ("e", Value::Enum("open".to_string())),
            ("t", Value::from(date)),
            (
                "a",
                Value::Array(vec![Value::from(1_i64), Value::from("x"), Value::from(true)]),
            ),
            ("n", Value::Null),
        ]
        .into_iter()
        .collect();
        let got = Json::Object(bag.to_json_map());
        let want = json!({
            "s": "text",
            "l": 42,
            "d": 1.5,
            "b": false,
            "e": "open",
            "t": "2013-01-01T00:00:00-08:00",
            "a": ["1", "x", "true"],
            "n": null,
        });
        assert_eq!(got, want);
    }

    #[test]
    fn array_of_objects() {
        use crate::model::{EntityLike, File, Model};
        let files = Value::Array(vec![
            Value::from(File::with_id("1").into_object()),
            Value::from("2"),
        ]);
        assert_eq!(
            files.to_json(),
            json!([{"type": "file", "id": "1"}, "2"])
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::Enum("b".into()).as_str(), Some("b"));
        assert_eq!(Value::from(7_i64).as_long(), Some(7));
        assert_eq!(Value::from(7_i64).as_double(), Some(7.0));
        assert_eq!(Value::from("7").as_long(), None);
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert!(Value::Null.is_null());
    }
}
