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

//! Paged collections and event streams.

use super::schema;
use super::{Direction, Entry, Event, JsonObject, Value};
use crate::request::{FromResponse, ResponseBody};
use serde_json::{Map, Value as Json};
use std::collections::HashSet;

const ENTRIES: &str = "entries";

/// The error returned by [PagedCollection::get] for an index past the end.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("index {index} is out of bounds for a page with {len} entries")]
pub struct OutOfBounds {
    pub index: usize,
    pub len: usize,
}

model! {
    /// The sort order of a page.
    Order => schema::ORDER
}

impl Order {
    pub fn by(&self) -> Option<&str> {
        self.0.get_str("by")
    }

    pub fn direction(&self) -> Option<Direction> {
        self.0.get_str("direction").and_then(Direction::from_wire)
    }
}

/// One page of a server-side list.
///
/// The page metadata (`offset`, `limit`, `total_count` and `order`) is kept
/// in a [JsonObject]. The entries are typed. Entries of the wrong type, and
/// entries with an unknown discriminator, are dropped while decoding.
///
/// # Example
/// ```
/// # use cloud_content::model::{Folder, PagedCollection};
/// let json = serde_json::json!({
///     "total_count": 5, "offset": 0, "limit": 2,
///     "entries": [{"type": "folder", "id": "1"}, {"type": "folder", "id": "2"}]
/// });
/// let page = PagedCollection::<Folder>::from_json(json.as_object().unwrap());
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_count(), Some(5));
/// assert!(page.get(2).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PagedCollection<E: Entry> {
    metadata: JsonObject,
    entries: Vec<E>,
}

impl<E: Entry> Default for PagedCollection<E> {
    fn default() -> Self {
        Self {
            metadata: JsonObject::new(E::page_schema()),
            entries: Vec::new(),
        }
    }
}

impl<E: Entry> PagedCollection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a decoded page into its metadata and typed entries.
    pub fn from_object(object: &JsonObject) -> Self {
        let mut metadata = object.clone();
        let entries = match metadata.remove(ENTRIES) {
            Some(Value::Array(values)) => values
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(o) => E::from_entry(*o),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { metadata, entries }
    }

    pub fn from_json(json: &Map<String, Json>) -> Self {
        Self::from_object(&JsonObject::decode(E::page_schema(), json))
    }

    pub fn offset(&self) -> Option<i64> {
        self.metadata.get_long("offset")
    }

    pub fn limit(&self) -> Option<i64> {
        self.metadata.get_long("limit")
    }

    /// The size of the full server-side list.
    pub fn total_count(&self) -> Option<i64> {
        self.metadata.get_long("total_count")
    }

    pub fn order(&self) -> Vec<Order> {
        self.metadata.get_models("order")
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<E> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&E, OutOfBounds> {
        self.entries.get(index).ok_or(OutOfBounds {
            index,
            len: self.entries.len(),
        })
    }

    pub fn first(&self) -> Option<&E> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub fn push(&mut self, entry: E) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, index: usize) -> Result<E, OutOfBounds> {
        if index >= self.entries.len() {
            return Err(OutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns a page metadata field by its wire name.
    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn to_json_map(&self) -> Map<String, Json> {
        let mut map = self.metadata.to_json_map();
        let entries = self
            .entries
            .iter()
            .map(|e| e.entry_object().to_json())
            .collect();
        map.insert(ENTRIES.to_string(), Json::Array(entries));
        map
    }

    pub fn to_json(&self) -> Json {
        Json::Object(self.to_json_map())
    }
}

impl<'a, E: Entry> IntoIterator for &'a PagedCollection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<E: Entry> IntoIterator for PagedCollection<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<E: Entry> From<PagedCollection<E>> for Value {
    fn from(v: PagedCollection<E>) -> Self {
        let mut object = v.metadata;
        let entries: Vec<Value> = v
            .entries
            .iter()
            .map(|e| Value::from(e.entry_object().clone()))
            .collect();
        object.set(ENTRIES, entries);
        Value::from(object)
    }
}

impl<E: Entry> FromResponse for PagedCollection<E> {
    fn from_response(body: &ResponseBody) -> gax::Result<Self> {
        body.json_object(E::page_schema())
            .map(|o| Self::from_object(&o))
    }
}

/// Entries of an [EventStream].
pub trait EventEntry: Entry {
    /// The identifier used to drop duplicate deliveries.
    fn event_id(&self) -> Option<&str>;
}

/// A page of events with its stream position.
///
/// The service may deliver the same event more than once. With duplicate
/// filtering on, the default, an event whose id was already added is
/// rejected. Events without an id are always kept.
///
/// An `EventStream` is not synchronized. Mutate it from one task at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct EventStream<E: EventEntry = Event> {
    page: PagedCollection<E>,
    seen: HashSet<String>,
    filter_duplicates: bool,
}

impl<E: EventEntry> Default for EventStream<E> {
    fn default() -> Self {
        Self {
            page: PagedCollection::default(),
            seen: HashSet::new(),
            filter_duplicates: true,
        }
    }
}

impl<E: EventEntry> EventStream<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a page, dropping duplicates if `filter_duplicates` is set.
    pub fn from_object(object: &JsonObject, filter_duplicates: bool) -> Self {
        let decoded = PagedCollection::<E>::from_object(object);
        let mut stream = Self {
            page: PagedCollection {
                metadata: decoded.metadata,
                entries: Vec::new(),
            },
            seen: HashSet::new(),
            filter_duplicates,
        };
        stream.add_all(decoded.entries);
        stream
    }

    pub fn from_json(json: &Map<String, Json>) -> Self {
        Self::from_object(&JsonObject::decode(E::page_schema(), json), true)
    }

    pub fn filter_duplicates(&self) -> bool {
        self.filter_duplicates
    }

    /// Changes the filtering mode for future additions.
    pub fn set_filter_duplicates(&mut self, filter: bool) {
        self.filter_duplicates = filter;
    }

    /// Adds an event, returns `false` if it was rejected as a duplicate.
    pub fn add(&mut self, event: E) -> bool {
        if let Some(id) = event.event_id() {
            let fresh = self.seen.insert(id.to_string());
            if !fresh && self.filter_duplicates {
                return false;
            }
        }
        self.page.entries.push(event);
        true
    }

    /// Adds all events, returns `true` if any was added.
    pub fn add_all<I: IntoIterator<Item = E>>(&mut self, events: I) -> bool {
        events
            .into_iter()
            .fold(false, |changed, e| self.add(e) || changed)
    }

    pub fn remove(&mut self, index: usize) -> Result<E, OutOfBounds> {
        let removed = self.page.remove(index)?;
        self.forget(&removed);
        Ok(removed)
    }

    /// Removes every event matching `predicate`, returns `true` if any was.
    pub fn remove_all<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&E) -> bool,
    {
        let (removed, kept): (Vec<E>, Vec<E>) =
            std::mem::take(&mut self.page.entries)
                .into_iter()
                .partition(|e| predicate(e));
        self.page.entries = kept;
        removed.iter().for_each(|e| self.forget(e));
        !removed.is_empty()
    }

    pub fn clear(&mut self) {
        self.page.clear();
        self.seen.clear();
    }

    // An id stays seen while another retained event still carries it.
    fn forget(&mut self, removed: &E) {
        let Some(id) = removed.event_id() else {
            return;
        };
        if !self.page.entries.iter().any(|e| e.event_id() == Some(id)) {
            self.seen.remove(id);
        }
    }

    /// The cursor to request the next page from.
    pub fn next_stream_position(&self) -> Option<i64> {
        self.page.metadata.get_long("next_stream_position")
    }

    pub fn chunk_size(&self) -> Option<i64> {
        self.page.metadata.get_long("chunk_size")
    }

    pub fn entries(&self) -> &[E] {
        self.page.entries()
    }

    pub fn len(&self) -> usize {
        self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&E, OutOfBounds> {
        self.page.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.page.iter()
    }

    /// Appends this page to `previous`.
    ///
    /// The result keeps the events of `previous` first and the stream
    /// position of `self`.
    pub fn merge(self, previous: EventStream<E>) -> Self {
        let mut merged = Self {
            page: PagedCollection {
                metadata: self.page.metadata,
                entries: Vec::new(),
            },
            seen: HashSet::new(),
            filter_duplicates: self.filter_duplicates,
        };
        merged.add_all(previous.page.entries);
        merged.add_all(self.page.entries);
        merged
    }

    pub fn to_json(&self) -> Json {
        self.page.to_json()
    }
}

impl<'a, E: EventEntry> IntoIterator for &'a EventStream<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;
    fn into_iter(self) -> Self::IntoIter {
        self.page.iter()
    }
}

impl<E: EventEntry> FromResponse for EventStream<E> {
    fn from_response(body: &ResponseBody) -> gax::Result<Self> {
        body.json_object(E::page_schema())
            .map(|o| Self::from_object(&o, true))
    }
}
