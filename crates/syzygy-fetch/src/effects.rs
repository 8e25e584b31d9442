//! Effects layer: HTTP access behind a trait and streaming downloads with
//! temp-file staging.

use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::time::Instant;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

use syzygy_index::TableEntry;

use crate::data::{DownloadOutcome, DownloadReport, FetchOptions};
use crate::error::FetchError;

/// Suffix marking an in-flight staging file next to its final path.
const PART_SUFFIX: &str = ".part";

pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Minimal HTTP surface the downloader needs: one text body (the index) and
/// one byte stream (a table). Implementations report non-success statuses
/// as errors.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + 'static;

    fn text(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send;
}

/// Sequential fetcher for one mirror. Holds no per-transfer state; every
/// call runs to completion before the next starts.
pub struct Fetcher<C: HttpClient> {
    client: C,
    base_url: Url,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches the mirror index as decoded text. One GET, no retry.
    pub async fn fetch_index(&self) -> Result<String, FetchError> {
        self.client
            .text(self.base_url.as_str())
            .await
            .map_err(Self::map_error)
    }

    /// Streams one table into `dest_dir`, committing it with a single
    /// rename. With overwrite disabled an existing table short-circuits to
    /// [`DownloadOutcome::Skipped`] before any network activity.
    ///
    /// On a failed transfer the `.part` staging file is left in place for
    /// inspection; the final path is never touched.
    pub async fn download_table(
        &self,
        entry: &TableEntry,
        dest_dir: &Path,
    ) -> Result<DownloadReport, FetchError> {
        let relative = safe_relative_path(&entry.name)?;
        let dest_path = dest_dir.join(relative);

        if dest_path.exists() && !self.options.overwrite {
            return Ok(DownloadReport::skipped());
        }

        let tmp_path = part_path(&dest_path);
        if tmp_path.exists() {
            tracing::debug!(path = %tmp_path.display(), "removing stale staging file");
            tokio::fs::remove_file(&tmp_path).await?;
        }
        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let url = self
            .base_url
            .join(&entry.name)
            .map_err(|err| FetchError::InvalidUrl {
                name: entry.name.clone(),
                reason: err.to_string(),
            })?;

        let start = Instant::now();
        let bytes_written = self.stream_to_staging(url.as_str(), &tmp_path).await?;

        // Sole commit point: nothing is visible at the final name until the
        // staging file is complete.
        tokio::fs::rename(&tmp_path, &dest_path).await?;

        Ok(DownloadReport {
            outcome: DownloadOutcome::Downloaded,
            bytes_written,
            elapsed: start.elapsed(),
        })
    }

    async fn stream_to_staging(&self, url: &str, tmp_path: &Path) -> Result<u64, FetchError> {
        let mut stream = self.client.stream(url).await.map_err(Self::map_error)?;
        let file = tokio::fs::File::create(tmp_path).await?;
        let mut writer = BufWriter::with_capacity(self.options.chunk_size.max(1), file);
        let mut bytes_written = 0u64;

        while let Some(chunk_result) = stream.try_next().await.transpose() {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(err) => {
                    // Push everything already received out to the staging
                    // file before aborting, so the leftover holds the
                    // partial bytes and not just what escaped the buffer.
                    let _ = writer.flush().await;
                    return Err(Self::map_error(err));
                }
            };
            writer.write_all(&bytes).await?;
            bytes_written += bytes.len() as u64;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        Ok(bytes_written)
    }

    fn map_error(err: C::Error) -> FetchError {
        FetchError::Network(err.to_string())
    }
}

/// Validates an index-supplied name before using it as a path below the
/// destination directory. The index is untrusted; anything absolute or
/// containing a parent/root component is rejected.
fn safe_relative_path(name: &str) -> Result<PathBuf, FetchError> {
    let path = Path::new(name);
    if name.is_empty() || path.is_absolute() {
        return Err(FetchError::UnsafeName(name.to_string()));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(FetchError::UnsafeName(name.to_string())),
        }
    }
    Ok(path.to_path_buf())
}

fn part_path(dest_path: &Path) -> PathBuf {
    let mut tmp = dest_path.as_os_str().to_os_string();
    tmp.push(PART_SUFFIX);
    PathBuf::from(tmp)
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use reqwest::Client;

    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        /// Builds a client that sends `user_agent` on every request.
        pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
            let client = Client::builder().user_agent(user_agent).build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn text(&self, url: &str) -> Result<String, Self::Error> {
            // `text()` honors the server-declared charset and replaces
            // invalid sequences rather than failing.
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }

        async fn stream(
            &self,
            url: &str,
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok(Box::pin(response.bytes_stream()))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
