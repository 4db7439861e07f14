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

use crate::client::ClientInner;
use crate::date_format;
use crate::model::{Object, PagedCollection, SearchScope};
use crate::request::Request;
use chrono::{DateTime, FixedOffset};
use http::Method;
use std::sync::Arc;

/// The bounds of a date filter, either end may be open.
pub type DateRange = (Option<DateTime<FixedOffset>>, Option<DateTime<FixedOffset>>);

/// Searches files, folders, and bookmarks.
#[derive(Clone, Debug)]
pub struct Search {
    inner: Arc<ClientInner>,
}

impl Search {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Searches for `query` in names, descriptions, and contents.
    ///
    /// # Example
    /// ```no_run
    /// # use cloud_content::Client;
    /// # use cloud_content::model::SearchScope;
    /// # async fn sample(client: &Client) -> cloud_content::Result<()> {
    /// let results = client
    ///     .search()
    ///     .query("quarterly report")
    ///     .with_file_extensions(["pdf", "docx"])
    ///     .with_scope(SearchScope::EnterpriseContent)
    ///     .send()
    ///     .await?;
    /// println!("{} matches", results.total_count().unwrap_or_default());
    /// # Ok(()) }
    /// ```
    pub fn query(&self, query: &str) -> SearchRequest {
        let request = Request::new(self.inner.clone(), Method::GET, self.inner.url("/search"))
            .with_query("query", query);
        SearchRequest { request }
    }
}

/// A search query and its filters.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    request: Request<PagedCollection<Object>>,
}

impl SearchRequest {
    fn with_query<V: Into<String>>(mut self, key: &str, value: V) -> Self {
        self.request = self.request.with_query(key, value);
        self
    }

    fn with_list<I, V>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.with_query(key, joined)
    }

    fn with_date_range(
        self,
        key: &str,
        from: Option<DateTime<FixedOffset>>,
        to: Option<DateTime<FixedOffset>>,
    ) -> Self {
        match date_format::format_range(from.as_ref(), to.as_ref()) {
            Some(range) => self.with_query(key, range),
            None => self,
        }
    }

    fn date_range(&self, key: &str) -> Option<DateRange> {
        self.request.query(key).and_then(date_format::parse_range)
    }

    pub fn with_scope(self, v: SearchScope) -> Self {
        self.with_query("scope", v.as_str())
    }

    pub fn with_file_extensions<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_list("file_extensions", v)
    }

    /// Items created in this range, either end may be open.
    pub fn with_created_at_range(self, from: Option<DateTime<FixedOffset>>, to: Option<DateTime<FixedOffset>>) -> Self {
        self.with_date_range("created_at_range", from, to)
    }

    /// Items updated in this range, either end may be open.
    pub fn with_updated_at_range(self, from: Option<DateTime<FixedOffset>>, to: Option<DateTime<FixedOffset>>) -> Self {
        self.with_date_range("updated_at_range", from, to)
    }

    /// The bounds set by [with_created_at_range][Self::with_created_at_range].
    pub fn created_at_range(&self) -> Option<DateRange> {
        self.date_range("created_at_range")
    }

    pub fn updated_at_range(&self) -> Option<DateRange> {
        self.date_range("updated_at_range")
    }

    /// Items whose size in bytes is in this range, either end may be open.
    pub fn with_size_range(self, lower: Option<u64>, upper: Option<u64>) -> Self {
        if lower.is_none() && upper.is_none() {
            return self;
        }
        let bound = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_default();
        self.with_query("size_range", format!("{},{}", bound(lower), bound(upper)))
    }

    pub fn with_owner_user_ids<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_list("owner_user_ids", v)
    }

    pub fn with_ancestor_folder_ids<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_list("ancestor_folder_ids", v)
    }

    /// Where the query matches, e.g. `name`, `description`, or `file_content`.
    pub fn with_content_types<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_list("content_types", v)
    }

    /// Only return items of this type: `file`, `folder`, or `web_link`.
    pub fn with_type<V: Into<String>>(self, v: V) -> Self {
        self.with_query("type", v)
    }

    pub fn with_limit(self, v: u32) -> Self {
        self.with_query("limit", v.to_string())
    }

    pub fn with_offset(self, v: u64) -> Self {
        self.with_query("offset", v.to_string())
    }

    pub fn request(&self) -> &Request<PagedCollection<Object>> {
        &self.request
    }

    /// Returns the request, for example to add fields or a timeout.
    pub fn into_request(self) -> Request<PagedCollection<Object>> {
        self.request
    }

    pub async fn send(self) -> gax::Result<PagedCollection<Object>> {
        self.request.send().await
    }
}
