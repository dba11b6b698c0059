use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::core::downloader::{ContentFetcher, FetchOutcome};
use crate::core::error::LauncherResult;
use crate::core::metadata::{self, MetadataExt};
use crate::core::version::AssetIndexInfo;

/// Manages asset objects (sounds, textures referenced by the asset index).
pub struct AssetManager;

/// Top-level asset index JSON structure. Objects keep declaration order.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: IndexMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: u64,
}

impl AssetIndex {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let tree = metadata::parse_document(raw)?;
        tree.require_object("objects")?;
        metadata::decode_str(raw)
    }
}

impl AssetObject {
    /// Two-character shard directory (`hash[0..2]`).
    fn shard(&self) -> &str {
        self.hash.get(..2).unwrap_or(&self.hash)
    }

    /// `objects/<xx>/<hash>`
    pub fn object_path(&self, objects_dir: &Path) -> PathBuf {
        objects_dir.join(self.shard()).join(&self.hash)
    }

    /// `<base>/<xx>/<hash>`
    pub fn url(&self, resources_base: &str) -> String {
        format!(
            "{}/{}/{}",
            resources_base.trim_end_matches('/'),
            self.shard(),
            self.hash
        )
    }
}

/// Result of one pass over an asset index.
#[derive(Debug, Default, Clone)]
pub struct AssetSyncSummary {
    pub total: usize,
    pub downloaded: usize,
    /// Logical names of objects that could not be obtained.
    pub failed: Vec<String>,
}

impl AssetManager {
    /// Fetch (or read the cached copy of) the asset index document.
    /// Failure here is fatal to the caller.
    pub async fn load_index(
        fetcher: &ContentFetcher,
        info: &AssetIndexInfo,
        index_path: &Path,
    ) -> LauncherResult<AssetIndex> {
        let raw = fetcher.fetch_text_cached(&info.url, index_path).await?;
        AssetIndex::parse(&raw)
    }

    /// Ensure every object of `index` is present under `objects_dir`, one at a
    /// time in declaration order. Per-object failures are logged and recorded.
    pub async fn sync_objects(
        fetcher: &ContentFetcher,
        index: &AssetIndex,
        objects_dir: &Path,
        resources_base: &str,
    ) -> AssetSyncSummary {
        let mut summary = AssetSyncSummary {
            total: index.objects.len(),
            ..Default::default()
        };

        for (name, object) in &index.objects {
            let dest = object.object_path(objects_dir);
            let url = object.url(resources_base);
            match fetcher
                .ensure_verified(&url, &dest, Some(&object.hash))
                .await
            {
                Ok(FetchOutcome::Downloaded { .. }) => summary.downloaded += 1,
                Ok(FetchOutcome::Cached) => {}
                Err(e) => {
                    warn!("Asset {} ({}) failed: {}", name, object.hash, e);
                    summary.failed.push(name.clone());
                }
            }
        }

        debug!("Asset objects dir: {:?}", objects_dir);
        info!(
            "Assets: {} objects, {} downloaded, {} failed",
            summary.total,
            summary.downloaded,
            summary.failed.len()
        );
        summary
    }
}
