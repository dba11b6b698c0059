use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

use super::transport::{ByteStream, Transport};

/// Knobs applied to every fetch.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Upper bound for a single transport call: the request itself and each
    /// body chunk. A stalled transfer fails instead of hanging the pass.
    pub idle_timeout: Duration,
    /// Compare downloads (and cached files) against their declared SHA-1.
    /// Off by default: a non-empty file is trusted as complete.
    pub verify_sha1: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            verify_sha1: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A complete copy was already on disk; no network access happened.
    Cached,
    Downloaded { bytes: u64 },
}

/// Idempotent, sequential fetcher for the on-disk cache.
///
/// A destination that exists with a non-empty size is complete; anything
/// else is (re)fetched. Bodies are streamed into `<dest>.part` and renamed
/// into place only once fully written, and the staging file is removed on
/// any failure, so an incomplete download is never mistaken for a finished one.
#[derive(Clone)]
pub struct ContentFetcher {
    transport: Arc<dyn Transport>,
    settings: FetchSettings,
}

impl ContentFetcher {
    pub fn new(transport: Arc<dyn Transport>, settings: FetchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    // ── Fetch to file ───────────────────────────────────

    /// Make sure `dest` holds the object at `url`.
    pub async fn ensure(&self, url: &str, dest: &Path) -> LauncherResult<FetchOutcome> {
        self.ensure_verified(url, dest, None).await
    }

    /// Like [`ensure`](Self::ensure), checking `expected_sha1` when strict
    /// verification is enabled.
    pub async fn ensure_verified(
        &self,
        url: &str,
        dest: &Path,
        expected_sha1: Option<&str>,
    ) -> LauncherResult<FetchOutcome> {
        let expected = expected_sha1.filter(|_| self.settings.verify_sha1);

        if is_complete(dest).await {
            let Some(expected) = expected else {
                return Ok(FetchOutcome::Cached);
            };
            if file_sha1(dest).await? == expected {
                return Ok(FetchOutcome::Cached);
            }
            warn!("Cached file {:?} fails SHA-1 check, fetching again", dest);
            remove_if_present(dest).await;
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let staging = staging_path(dest);
        match self.stream_to_file(url, &staging, expected).await {
            Ok(bytes) => {
                tokio::fs::rename(&staging, dest).await.map_err(|e| {
                    LauncherError::io(dest, e)
                })?;
                debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, bytes);
                Ok(FetchOutcome::Downloaded { bytes })
            }
            Err(err) => {
                remove_if_present(&staging).await;
                Err(err)
            }
        }
    }

    async fn stream_to_file(
        &self,
        url: &str,
        staging: &Path,
        expected_sha1: Option<&str>,
    ) -> LauncherResult<u64> {
        let mut stream = self.open(url).await?;
        let mut hasher = expected_sha1.map(|_| Sha1::new());
        let mut written: u64 = 0;

        // The handle lives inside this block so it is closed before the rename.
        {
            let mut file = tokio::fs::File::create(staging)
                .await
                .map_err(|e| LauncherError::io(staging, e))?;

            while let Some(chunk) = self.next_chunk(url, &mut stream).await? {
                if let Some(hasher) = hasher.as_mut() {
                    hasher.update(&chunk);
                }
                file.write_all(&chunk)
                    .await
                    .map_err(|e| LauncherError::io(staging, e))?;
                written += chunk.len() as u64;
            }

            file.flush()
                .await
                .map_err(|e| LauncherError::io(staging, e))?;
        }

        if written == 0 {
            return Err(LauncherError::Other(format!("{url} returned an empty body")));
        }

        if let (Some(hasher), Some(expected)) = (hasher, expected_sha1) {
            let actual = hex::encode(hasher.finalize());
            if actual != expected {
                return Err(LauncherError::Sha1Mismatch {
                    path: staging.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(written)
    }

    // ── Fetch to buffer ─────────────────────────────────

    /// Fetch a small document into memory. Never touches the cache.
    pub async fn fetch_to_buffer(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let mut stream = self.open(url).await?;
        let mut buffer = Vec::new();
        while let Some(chunk) = self.next_chunk(url, &mut stream).await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }

    pub async fn fetch_text(&self, url: &str) -> LauncherResult<String> {
        let buffer = self.fetch_to_buffer(url).await?;
        String::from_utf8(buffer)
            .map_err(|e| LauncherError::Other(format!("{url} is not valid UTF-8: {e}")))
    }

    /// Fetch-or-read-cached: a complete copy at `cache_path` is read back
    /// instead of fetching `url` again.
    pub async fn fetch_text_cached(&self, url: &str, cache_path: &Path) -> LauncherResult<String> {
        self.ensure(url, cache_path).await?;
        tokio::fs::read_to_string(cache_path)
            .await
            .map_err(|e| LauncherError::io(cache_path, e))
    }

    // ── Timeout boundary ────────────────────────────────

    async fn open(&self, url: &str) -> LauncherResult<ByteStream> {
        self.within_timeout(url, self.transport.open(url)).await?
    }

    async fn next_chunk(
        &self,
        url: &str,
        stream: &mut ByteStream,
    ) -> LauncherResult<Option<bytes::Bytes>> {
        match self.within_timeout(url, stream.next()).await? {
            None => Ok(None),
            Some(chunk) => chunk.map(Some),
        }
    }

    async fn within_timeout<F: Future>(&self, url: &str, fut: F) -> LauncherResult<F::Output> {
        tokio::time::timeout(self.settings.idle_timeout, fut)
            .await
            .map_err(|_| LauncherError::Timeout {
                url: url.to_string(),
                secs: self.settings.idle_timeout.as_secs(),
            })
    }
}

/// A path holds a complete artifact iff it is a file with non-zero size.
pub async fn is_complete(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

async fn file_sha1(path: &Path) -> LauncherResult<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

pub(crate) fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn remove_if_present(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {:?}: {}", path, e);
        }
    }
}
