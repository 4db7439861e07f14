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
use super::{Model, Value};
use gax::error::Error;
use serde::Serialize;
use serde_json::Value as Json;

model! {
    /// Metadata attached to a file from a template.
    ///
    /// Template fields are dynamic. They are kept in the property bag next to
    /// the `$parent`, `$template` and `$scope` keys.
    Metadata => schema::METADATA, page = schema::METADATA_PAGE
}

impl Metadata {
    /// Creates metadata with the given template values.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .fold(Self::default(), |m, (k, v)| m.set(k, v))
    }

    /// The object the metadata belongs to, for example `file_123`.
    pub fn parent(&self) -> Option<&str> {
        self.0.get_str("$parent")
    }

    pub fn template(&self) -> Option<&str> {
        self.0.get_str("$template")
    }

    pub fn scope(&self) -> Option<&str> {
        self.0.get_str("$scope")
    }

    /// Returns a template field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The template fields, without the `$`-prefixed system keys.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .properties()
            .iter()
            .filter(|(k, _)| !k.starts_with('$'))
    }
}

/// The operations of a metadata update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataOp {
    Add,
    Replace,
    Remove,
    Test,
}

impl MetadataOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
            Self::Test => "test",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Operation {
    op: MetadataOp,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

/// A JSON-patch document updating the fields of a [Metadata] instance.
///
/// # Example
/// ```
/// # use cloud_content::model::MetadataUpdate;
/// let update = MetadataUpdate::new()
///     .replace("audience", "internal")
///     .remove("draft");
/// assert_eq!(
///     update.to_json()?,
///     serde_json::json!([
///         {"op": "replace", "path": "/audience", "value": "internal"},
///         {"op": "remove", "path": "/draft"}
///     ])
/// );
/// # Ok::<(), cloud_content::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataUpdate {
    operations: Vec<Operation>,
}

impl MetadataUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation on `key`. The value is ignored for [MetadataOp::Remove].
    pub fn with_operation<K: AsRef<str>, V: Into<String>>(
        mut self,
        op: MetadataOp,
        key: K,
        value: V,
    ) -> Self {
        let value = (op != MetadataOp::Remove).then(|| value.into());
        self.operations.push(Operation {
            op,
            path: format!("/{}", key.as_ref()),
            value,
        });
        self
    }

    pub fn add<K: AsRef<str>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.with_operation(MetadataOp::Add, key, value)
    }

    pub fn replace<K: AsRef<str>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.with_operation(MetadataOp::Replace, key, value)
    }

    pub fn remove<K: AsRef<str>>(self, key: K) -> Self {
        self.with_operation(MetadataOp::Remove, key, "")
    }

    /// Fails the whole update unless `key` currently has `value`.
    pub fn test<K: AsRef<str>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.with_operation(MetadataOp::Test, key, value)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn to_json(&self) -> gax::Result<Json> {
        serde_json::to_value(self).map_err(Error::ser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PagedCollection;
    use crate::model::tests::as_map;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn metadata() {
        let json = json!({
            "audience": "internal",
            "documentType": "Q1 plans",
            "$type": "properties-6bcba49f-ca6d-4d2a-a758-57fe6edf44d0",
            "$parent": "file_5010739061",
            "$id": "2094c584-68e1-475c-a581-534a4609594e",
            "$version": 0,
            "$typeVersion": 0,
            "$template": "properties",
            "$scope": "global"
        });
        let metadata = Metadata::from_json(&as_map(json));
        assert_eq!(metadata.parent(), Some("file_5010739061"));
        assert_eq!(metadata.template(), Some("properties"));
        assert_eq!(metadata.scope(), Some("global"));
        assert_eq!(metadata.field("audience").and_then(Value::as_str), Some("internal"));
        let names: Vec<_> = metadata.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["audience", "documentType"]);
        assert_eq!(Metadata::from_json(&as_map(metadata.to_json())), metadata);
    }

    #[test]
    fn with_values() {
        let metadata = Metadata::with_values([("audience", "internal"), ("documentType", "plans")]);
        assert_eq!(
            metadata.to_json(),
            json!({"audience": "internal", "documentType": "plans"})
        );
    }

    #[test]
    fn metadata_list() {
        let json = json!({
            "entries": [
                {"$parent": "file_1", "$template": "properties", "$scope": "global"},
                {"$parent": "file_1", "$template": "marketing", "$scope": "enterprise"}
            ],
            "limit": 100
        });
        let page = PagedCollection::<Metadata>::from_json(&as_map(json));
        let templates: Vec<_> = page.iter().map(Metadata::template).collect();
        assert_eq!(templates, vec![Some("properties"), Some("marketing")]);
    }

    #[test]
    fn update() -> anyhow::Result<()> {
        let update = MetadataUpdate::new()
            .add("a", "1")
            .replace("b", "2")
            .test("c", "3")
            .with_operation(MetadataOp::Remove, "d", "ignored");
        assert_eq!(update.len(), 4);
        assert_eq!(
            update.to_json()?,
            json!([
                {"op": "add", "path": "/a", "value": "1"},
                {"op": "replace", "path": "/b", "value": "2"},
                {"op": "test", "path": "/c", "value": "3"},
                {"op": "remove", "path": "/d"}
            ])
        );
        assert!(MetadataUpdate::new().is_empty());
        assert_eq!(MetadataUpdate::new().to_json()?, json!([]));
        Ok(())
    }

    #[test]
    fn update_values_are_strings() -> anyhow::Result<()> {
        let update = MetadataUpdate::new().replace("quote", "say \"hi\"\n").add("empty", "");
        assert_eq!(
            update.to_json()?,
            json!([
                {"op": "replace", "path": "/quote", "value": "say \"hi\"\n"},
                {"op": "add", "path": "/empty", "value": ""}
            ])
        );
        Ok(())
    }
}
