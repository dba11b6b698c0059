// ─── Release Index ───
// Fetching and parsing the top-level version manifest.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::core::downloader::ContentFetcher;
use crate::core::error::LauncherResult;
use crate::core::metadata::{self, MetadataExt};

/// Top-level release index.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(rename = "releaseTime", default)]
    pub release_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionManifest {
    /// Fetch the release index. Always goes to the network.
    pub async fn fetch(fetcher: &ContentFetcher, url: &str) -> LauncherResult<Self> {
        info!("Fetching release index...");
        let raw = fetcher.fetch_text(url).await?;
        let manifest = Self::parse(&raw)?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let tree = metadata::parse_document(raw)?;
        tree.require_array("versions")?;
        metadata::decode(tree)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Entries to list: releases only unless `include_all`.
    pub fn listed(&self, include_all: bool) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| include_all || v.version_type == "release")
            .collect()
    }
}
