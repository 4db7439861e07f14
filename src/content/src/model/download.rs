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
use super::schema;
use crate::date_format;
use chrono::{DateTime, FixedOffset};
use http::HeaderMap;
use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, DATE};

const EXPIRATION: &str = "expiration";

model! {
    /// The metadata of a download, parsed from the response headers.
    DownloadInfo => schema::DOWNLOAD_INFO
}

impl DownloadInfo {
    /// Parses the download headers.
    ///
    /// Headers that are missing or malformed leave the corresponding field unset.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
        };
        let mut object = JsonObject::new(&schema::DOWNLOAD_INFO);
        if let Some(name) = header(CONTENT_DISPOSITION.as_str()).and_then(file_name) {
            object.set("file_name", name);
        }
        if let Some(length) = header(CONTENT_LENGTH.as_str()).and_then(|v| v.trim().parse::<i64>().ok()) {
            object.set("content_length", length);
        }
        if let Some(content_type) = header(CONTENT_TYPE.as_str()) {
            object.set("content_type", content_type);
        }
        if let Some(range) = header(CONTENT_RANGE.as_str()) {
            match content_range(range) {
                Some((start, end, total)) => {
                    object.set("start_range", start);
                    object.set("end_range", end);
                    object.set("total_range", total);
                }
                None => tracing::warn!("ignoring malformed content-range `{range}`"),
            }
        }
        if let Some(date) = header(DATE.as_str()).and_then(date_format::parse_header_date) {
            object.set("date", date);
        }
        if let Some(date) = header(EXPIRATION).and_then(date_format::parse_header_date) {
            object.set("expiration", date);
        }
        Self(object)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.get_str("file_name")
    }

    pub fn content_length(&self) -> Option<i64> {
        self.0.get_long("content_length")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.0.get_str("content_type")
    }

    pub fn start_range(&self) -> Option<i64> {
        self.0.get_long("start_range")
    }

    pub fn end_range(&self) -> Option<i64> {
        self.0.get_long("end_range")
    }

    pub fn total_range(&self) -> Option<i64> {
        self.0.get_long("total_range")
    }

    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("date")
    }

    /// When the download url expires.
    pub fn expiration(&self) -> Option<DateTime<FixedOffset>> {
        self.0.get_date("expiration")
    }
}

// Accepts both `filename="name"` and `filename=name`.
fn file_name(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .filter_map(|part| part.strip_prefix("filename="))
        .map(|name| match name.strip_suffix('"') {
            Some(quoted) => quoted.trim_start_matches('"').to_string(),
            None => name.to_string(),
        })
        .last()
}

// Parses `bytes start-end/total`.
fn content_range(value: &str) -> Option<(i64, i64, i64)> {
    let range = value.trim().strip_prefix("bytes")?.trim_start();
    let (range, total) = range.rsplit_once('/')?;
    let (start, end) = range.split_once('-')?;
    Some((
        start.trim().parse().ok()?,
        end.trim().parse().ok()?,
        total.trim().parse().ok()?,
    ))
}
