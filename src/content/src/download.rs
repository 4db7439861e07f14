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

//! Downloads file contents and thumbnails.
//!
//! Some content is generated on demand. While it is not ready the service
//! replies with HTTP 202 (Accepted), and the download polls with the client's
//! [AcceptedPolicy][gax::polling_policy::AcceptedPolicy] until the content is
//! available or the policy gives up.

use crate::model::DownloadInfo;
use crate::request::Request;
use gax::error::Error;
use gax::http_client::HttpResponse;
use gax::polling_policy::{ACCEPTED, PollingState};
use gax::retry_after::retry_after;
use http::header::RANGE;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

type ProgressFn = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// A pending download.
///
/// # Example
/// ```no_run
/// # use cloud_content::Client;
/// # async fn sample(client: &Client) -> cloud_content::Result<()> {
/// let info = client
///     .files()
///     .download("5000948880")
///     .with_range(0, Some(1023))
///     .to_file("/tmp")
///     .await?;
/// println!("downloaded {:?}", info.file_name());
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Download {
    request: Request<DownloadInfo>,
    progress: Option<ProgressFn>,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("request", &self.request)
            .field("progress", &self.progress.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Download {
    pub(crate) fn new(request: Request<DownloadInfo>) -> Self {
        Self {
            request,
            progress: None,
        }
    }

    /// Downloads the bytes in `start..=end`, or from `start` to the end of
    /// the file.
    pub fn with_range(mut self, start: u64, end: Option<u64>) -> Self {
        let range = match end {
            Some(end) => format!("bytes={start}-{end}"),
            None => format!("bytes={start}-"),
        };
        self.request = self.request.with_header(RANGE.as_str(), range);
        self
    }

    /// Downloads a previous version of the file.
    pub fn with_version<V: Into<String>>(mut self, version_id: V) -> Self {
        self.request = self.request.with_query("version", version_id);
        self
    }

    /// The minimum thumbnail width, in pixels.
    pub fn with_min_width(self, v: u32) -> Self {
        self.with_query("min_width", v.to_string())
    }

    pub fn with_min_height(self, v: u32) -> Self {
        self.with_query("min_height", v.to_string())
    }

    pub fn with_max_width(self, v: u32) -> Self {
        self.with_query("max_width", v.to_string())
    }

    pub fn with_max_height(self, v: u32) -> Self {
        self.with_query("max_height", v.to_string())
    }

    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.request = self.request.with_query(key, value);
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.request = self.request.with_header(name, value);
        self
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.request = self.request.with_timeout(v);
        self
    }

    /// Aborts the transfer, or any polling, when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.request = self.request.with_cancellation(token);
        self
    }

    /// Calls `f(downloaded, total)` after every chunk.
    ///
    /// The total is the `Content-Length` of the response, if known.
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn request(&self) -> &Request<DownloadInfo> {
        &self.request
    }

    /// Writes the content to `writer`.
    ///
    /// The writer is flushed but not closed.
    pub async fn to_writer<W>(self, writer: &mut W) -> gax::Result<DownloadInfo>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.open().await?;
        let info = DownloadInfo::from_headers(response.headers());
        self.copy(response, info.content_length(), writer).await?;
        Ok(info)
    }

    /// Writes the content to a file.
    ///
    /// If `path` is a directory the file is created inside it, using the name
    /// from the `Content-Disposition` header.
    pub async fn to_file<P: AsRef<Path>>(self, path: P) -> gax::Result<DownloadInfo> {
        let response = self.open().await?;
        let info = DownloadInfo::from_headers(response.headers());
        let target = target_path(path.as_ref(), &info).await?;
        tracing::debug!(path = %target.display(), "downloading to file");
        let mut file = tokio::fs::File::create(&target).await.map_err(Error::io)?;
        self.copy(response, info.content_length(), &mut file).await?;
        file.sync_all().await.map_err(Error::io)?;
        Ok(info)
    }

    /// Sends the request until the content is ready.
    async fn open(&self) -> gax::Result<HttpResponse> {
        let mut state = PollingState::default();
        loop {
            let response = self.request.execute().await?;
            if response.status() != ACCEPTED {
                return Ok(response);
            }
            let delay = retry_after(response.headers());
            match self.request.client().accepted.on_accepted(&mut state, delay) {
                Some(delay) => {
                    tracing::info!(attempt = state.attempt_count(), ?delay, url = %self.request.url(), "content not ready, polling");
                    self.request.sleep(delay).await?;
                }
                None => {
                    return Err(Error::exhausted(
                        state.attempt_count(),
                        format!("content at {} is still being generated", self.request.url()),
                    ));
                }
            }
        }
    }

    async fn copy<W>(&self, mut response: HttpResponse, total: Option<i64>, writer: &mut W) -> gax::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let total = total.and_then(|t| u64::try_from(t).ok());
        let mut downloaded = 0_u64;
        while let Some(chunk) = self.request.cancellable(response.chunk()).await? {
            writer.write_all(&chunk).await.map_err(Error::io)?;
            downloaded += chunk.len() as u64;
            if let Some(progress) = &self.progress {
                progress(downloaded, total);
            }
        }
        writer.flush().await.map_err(Error::io)?;
        Ok(downloaded)
    }
}

async fn target_path(path: &Path, info: &DownloadInfo) -> gax::Result<PathBuf> {
    let is_dir = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Ok(path.to_path_buf());
    }
    let name = info
        .file_name()
        .and_then(|n| Path::new(n).file_name())
        .ok_or_else(|| Error::binding(format!("no file name to download into {}", path.display())))?;
    Ok(path.join(name))
}
