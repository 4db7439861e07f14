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

//! Uploads new files and new versions of existing files.
//!
//! Uploads use a `multipart/form-data` body with two parts: an `attributes`
//! JSON document and the `file` contents. The contents are streamed while the
//! request is sent. Uploads from bytes or a path are resubmitted if they are
//! rate limited, uploads from a reader cannot be replayed and fail instead.

use crate::date_format;
use crate::model::{File, PagedCollection};
use crate::request::Request;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use gax::error::Error;
use gax::http_client::HttpBody;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value as Json, json};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

const CONTENT_MD5: &str = "content-md5";

type ChunkStream = BoxStream<'static, std::io::Result<Bytes>>;

/// A pending upload.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let file = client
///     .files()
///     .upload("0", "notes.txt")
///     .from_bytes("hello world")
///     .await?;
/// println!("uploaded {file:?}");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Upload {
    request: Request<PagedCollection<File>>,
    name: Option<String>,
    parent_id: Option<String>,
    content_created_at: Option<DateTime<FixedOffset>>,
    content_modified_at: Option<DateTime<FixedOffset>>,
}

impl Upload {
    pub(crate) fn new(request: Request<PagedCollection<File>>) -> Self {
        Self {
            request,
            name: None,
            parent_id: None,
            content_created_at: None,
            content_modified_at: None,
        }
    }

    /// The file name. Uploads from a path default to the path's file name.
    pub fn with_name<V: Into<String>>(mut self, v: V) -> Self {
        self.name = Some(v.into());
        self
    }

    pub(crate) fn with_parent_id<V: Into<String>>(mut self, v: V) -> Self {
        self.parent_id = Some(v.into());
        self
    }

    pub fn with_content_created_at(mut self, v: DateTime<FixedOffset>) -> Self {
        self.content_created_at = Some(v);
        self
    }

    pub fn with_content_modified_at(mut self, v: DateTime<FixedOffset>) -> Self {
        self.content_modified_at = Some(v);
        self
    }

    /// The SHA-1 digest of the contents, verified by the service.
    pub fn with_sha1<V: Into<String>>(mut self, v: V) -> Self {
        self.request = self.request.with_header(CONTENT_MD5, v);
        self
    }

    /// Only upload a new version if the file's etag is `etag`.
    pub fn with_if_match<V: Into<String>>(mut self, etag: V) -> Self {
        self.request = self.request.with_if_match(etag);
        self
    }

    pub fn with_cancellation(mut self, token: tokio_util::sync::CancellationToken) -> Self {
        self.request = self.request.with_cancellation(token);
        self
    }

    pub fn with_timeout(mut self, v: std::time::Duration) -> Self {
        self.request = self.request.with_timeout(v);
        self
    }

    pub fn request(&self) -> &Request<PagedCollection<File>> {
        &self.request
    }

    /// Uploads `contents`.
    pub async fn from_bytes<B: Into<Bytes>>(self, contents: B) -> gax::Result<File> {
        self.send(Source::Bytes(contents.into())).await
    }

    /// Uploads everything `reader` produces.
    ///
    /// The reader is streamed, not buffered, so the upload is not resubmitted
    /// if it is rate limited. To keep using a file handle after the upload,
    /// pass a clone of it, e.g. from [tokio::fs::File::try_clone].
    pub async fn from_reader<R>(self, reader: R) -> gax::Result<File>
    where
        R: AsyncRead + Send + 'static,
    {
        let stream: ChunkStream = ReaderStream::new(reader).boxed();
        self.send(Source::Reader(Arc::new(Mutex::new(Some(stream)))))
            .await
    }

    /// Uploads the file at `path`.
    ///
    /// The file is opened for each attempt and closed once it is sent.
    pub async fn from_path<P: AsRef<Path>>(mut self, path: P) -> gax::Result<File> {
        let path = path.as_ref();
        if self.name.is_none() {
            self.name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string);
        }
        let metadata = tokio::fs::metadata(path).await.map_err(Error::io)?;
        if !metadata.is_file() {
            return Err(Error::binding(format!("{} is not a file", path.display())));
        }
        self.send(Source::Path(path.to_path_buf(), metadata.len()))
            .await
    }

    fn attributes(&self) -> Json {
        let mut attributes = Map::new();
        if let Some(name) = &self.name {
            attributes.insert("name".to_string(), json!(name));
        }
        if let Some(id) = &self.parent_id {
            attributes.insert("parent".to_string(), json!({ "id": id }));
        }
        if let Some(v) = &self.content_created_at {
            attributes.insert("content_created_at".to_string(), json!(date_format::format(v)));
        }
        if let Some(v) = &self.content_modified_at {
            attributes.insert("content_modified_at".to_string(), json!(date_format::format(v)));
        }
        Json::Object(attributes)
    }

    async fn send(self, source: Source) -> gax::Result<File> {
        let body = MultipartBody {
            attributes: self.attributes().to_string(),
            file_name: self.name.as_deref().map(header_safe).unwrap_or_default(),
            source,
        };
        tracing::debug!(name = %body.file_name, "uploading");
        let page = self.request.with_multipart_body(body).send().await?;
        page.into_entries()
            .into_iter()
            .next()
            .ok_or_else(|| Error::deser("the upload response has no entries"))
    }
}

#[derive(Clone)]
enum Source {
    Bytes(Bytes),
    Path(PathBuf, u64),
    Reader(Arc<Mutex<Option<ChunkStream>>>),
}

/// The multipart body of an upload, rebuilt for each attempt.
#[derive(Clone)]
pub(crate) struct MultipartBody {
    attributes: String,
    file_name: String,
    source: Source,
}

impl MultipartBody {
    /// Creates the form for one attempt, returning the content type and the body.
    pub(crate) fn encode(&self) -> gax::Result<(String, HttpBody)> {
        let attributes = Part::text(self.attributes.clone())
            .mime_str("application/json")
            .map_err(Error::ser)?;
        let contents = match &self.source {
            Source::Bytes(b) => Part::stream_with_length(reqwest::Body::from(b.clone()), b.len() as u64),
            Source::Path(path, len) => {
                Part::stream_with_length(reqwest::Body::wrap_stream(read_file(path.clone())), *len)
            }
            Source::Reader(reader) => {
                let stream = reader
                    .lock()
                    .map_err(|_| Error::io("the upload source is unavailable"))?
                    .take()
                    .ok_or_else(|| Error::io("the upload source was already sent and cannot be replayed"))?;
                Part::stream(reqwest::Body::wrap_stream(stream))
            }
        };
        let contents = contents
            .file_name(self.file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(Error::ser)?;
        let form = Form::new()
            .part("attributes", attributes)
            .part("file", contents);
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let body = form.into_stream().map_err(Error::io).boxed();
        Ok((content_type, HttpBody::Stream(body)))
    }
}

impl std::fmt::Debug for MultipartBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartBody")
            .field("attributes", &self.attributes)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Drops control characters, they cannot appear in the part headers.
fn header_safe(name: &str) -> String {
    name.chars().filter(|c| !c.is_control()).collect()
}

/// Streams the file at `path`, opening it on the first poll.
fn read_file(path: PathBuf) -> ChunkStream {
    futures::stream::once(async move { tokio::fs::File::open(path).await })
        .map_ok(ReaderStream::new)
        .try_flatten()
        .boxed()
}
