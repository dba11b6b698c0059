// ─── Dependency Resolver ───
// Walks a release's metadata, filters it for the host, and drives the fetch
// cache so that every library, native archive and asset object is on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::assets::AssetManager;
use crate::core::downloader::{is_complete, ContentFetcher};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::rules::HostDescriptor;
use crate::core::state::{CacheLayout, Endpoints};
use crate::core::version::{LibDownloadArtifact, LibraryEntry, VersionJson, VersionManifest};

use super::natives;

/// Everything a launch needs, located on disk.
#[derive(Debug, Clone)]
pub struct ResolvedDependencySet {
    /// Library jars in declaration order, primary artifact last.
    pub classpath: Vec<PathBuf>,
    /// Files present in the natives directory.
    pub natives: Vec<PathBuf>,
    pub assets_dir: PathBuf,
    pub report: ResolutionReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Client,
    Library,
    Native,
    Asset,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Client => "client",
            ItemKind::Library => "library",
            ItemKind::Native => "native",
            ItemKind::Asset => "asset",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct FailedItem {
    pub kind: ItemKind,
    pub name: String,
    pub reason: String,
}

/// Per-item outcome of a resolution pass. Failures here never abort the pass.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub libraries: usize,
    pub natives: usize,
    pub assets: usize,
    pub failures: Vec<FailedItem>,
}

impl ResolutionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, kind: ItemKind, name: impl Into<String>, reason: impl fmt::Display) {
        let name = name.into();
        warn!("{} {} failed: {}", kind, name, reason);
        self.failures.push(FailedItem {
            kind,
            name,
            reason: reason.to_string(),
        });
    }
}

pub struct DependencyResolver {
    fetcher: ContentFetcher,
    host: HostDescriptor,
    layout: CacheLayout,
    endpoints: Endpoints,
}

impl DependencyResolver {
    pub fn new(
        fetcher: ContentFetcher,
        host: HostDescriptor,
        layout: CacheLayout,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            fetcher,
            host,
            layout,
            endpoints,
        }
    }

    /// Resolve `release_id` against the release index and populate the cache.
    ///
    /// Fatal: the id is absent from the index, or the release metadata or
    /// asset index cannot be obtained and parsed. Everything else is recorded
    /// in the returned report.
    pub async fn resolve(&self, release_id: &str) -> LauncherResult<ResolvedDependencySet> {
        info!("[1/5] Fetching release index...");
        let manifest =
            VersionManifest::fetch(&self.fetcher, &self.endpoints.version_manifest).await?;
        let entry = manifest
            .find_version(release_id)
            .ok_or_else(|| LauncherError::ReleaseNotFound(release_id.to_string()))?;

        info!("[2/5] Fetching release metadata for {}...", release_id);
        let metadata_path = self.layout.release_metadata(release_id);
        self.fetcher
            .ensure_verified(&entry.url, &metadata_path, entry.sha1.as_deref())
            .await?;
        let metadata = VersionJson::load(&metadata_path).await?;

        let mut report = ResolutionReport::default();

        info!("[3/5] Fetching client artifact...");
        self.fetch_client(&metadata, &mut report).await;

        info!("[4/5] Fetching libraries for {}...", self.host);
        let extracted = self.fetch_libraries(&metadata, &mut report).await;

        info!("[5/5] Fetching assets...");
        self.fetch_assets(&metadata, &mut report).await?;

        let set = ResolvedDependencySet {
            classpath: installed_classpath(&self.layout, &self.host, &metadata).await,
            natives: extracted,
            assets_dir: self.layout.assets_dir(),
            report,
        };
        info!(
            "Resolved {}: {} classpath entries, {} native files, {} failures",
            release_id,
            set.classpath.len(),
            set.natives.len(),
            set.report.failures.len()
        );
        Ok(set)
    }

    async fn fetch_client(&self, metadata: &VersionJson, report: &mut ResolutionReport) {
        let Some(client) = metadata.client_download() else {
            report.record(ItemKind::Client, &metadata.id, "no client download declared");
            return;
        };

        let dest = self.layout.release_jar(&metadata.id);
        if let Err(e) = self
            .fetcher
            .ensure_verified(&client.url, &dest, client.sha1.as_deref())
            .await
        {
            report.record(ItemKind::Client, &metadata.id, e);
        }
    }

    async fn fetch_libraries(
        &self,
        metadata: &VersionJson,
        report: &mut ResolutionReport,
    ) -> Vec<PathBuf> {
        let mut extracted = Vec::new();

        for lib in &metadata.libraries {
            if !lib.is_active(&self.host) {
                debug!("Skipping {} (rules)", lib.name);
                continue;
            }
            report.libraries += 1;

            let classifier = lib.native_classifier(&self.host);
            if let Some(classifier) = &classifier {
                match lib.classified_artifact(classifier) {
                    Some(artifact) => {
                        if let Some(path) = self.fetch_library(lib, artifact, report).await {
                            self.unpack(lib, &path, &mut extracted, report).await;
                        }
                    }
                    None => report.record(
                        ItemKind::Native,
                        format!("{}:{}", lib.name, classifier),
                        "classifier not declared in downloads",
                    ),
                }
            }

            if let Some(artifact) = lib.artifact() {
                if let Some(path) = self.fetch_library(lib, artifact, report).await {
                    if classifier.is_some() {
                        self.unpack(lib, &path, &mut extracted, report).await;
                    }
                }
            }
        }

        extracted
    }

    async fn fetch_library(
        &self,
        lib: &LibraryEntry,
        artifact: &LibDownloadArtifact,
        report: &mut ResolutionReport,
    ) -> Option<PathBuf> {
        let dest = self.layout.library(&artifact.path);
        match self
            .fetcher
            .ensure_verified(&artifact.url, &dest, artifact.sha1.as_deref())
            .await
        {
            Ok(_) => {
                debug!("  + {}", artifact.path);
                Some(dest)
            }
            Err(e) => {
                report.record(ItemKind::Library, &lib.name, e);
                None
            }
        }
    }

    async fn unpack(
        &self,
        lib: &LibraryEntry,
        archive: &Path,
        extracted: &mut Vec<PathBuf>,
        report: &mut ResolutionReport,
    ) {
        let excludes = lib.extract_excludes();
        match natives::extract_natives(archive, &self.layout.natives_dir(), &excludes).await {
            Ok(files) => {
                report.natives += 1;
                for file in files {
                    if !extracted.contains(&file) {
                        extracted.push(file);
                    }
                }
            }
            Err(e) => report.record(ItemKind::Native, &lib.name, e),
        }
    }

    async fn fetch_assets(
        &self,
        metadata: &VersionJson,
        report: &mut ResolutionReport,
    ) -> LauncherResult<()> {
        let Some(info) = &metadata.asset_index else {
            warn!("{} declares no asset index", metadata.id);
            return Ok(());
        };

        let index_path = self.layout.asset_index(&info.id);
        let index = AssetManager::load_index(&self.fetcher, info, &index_path).await?;
        let summary = AssetManager::sync_objects(
            &self.fetcher,
            &index,
            &self.layout.objects_dir(),
            &self.endpoints.resources,
        )
        .await;

        report.assets = summary.total;
        for name in summary.failed {
            report.failures.push(FailedItem {
                kind: ItemKind::Asset,
                name,
                reason: "download failed".into(),
            });
        }
        Ok(())
    }
}

/// Rebuild the dependency set from the cache alone. No network access, so
/// launching needs neither a fetcher nor an HTTP client.
pub async fn reconstruct(
    layout: &CacheLayout,
    host: &HostDescriptor,
    metadata: &VersionJson,
) -> ResolvedDependencySet {
    ResolvedDependencySet {
        classpath: installed_classpath(layout, host, metadata).await,
        natives: natives::list_extracted(&layout.natives_dir()).await,
        assets_dir: layout.assets_dir(),
        report: ResolutionReport::default(),
    }
}

/// Active, non-native libraries present on disk in declaration order, then
/// the primary artifact.
async fn installed_classpath(
    layout: &CacheLayout,
    host: &HostDescriptor,
    metadata: &VersionJson,
) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    for lib in &metadata.libraries {
        if !lib.is_active(host) || lib.is_native(host) {
            continue;
        }
        let Some(artifact) = lib.artifact() else {
            continue;
        };
        let path = layout.library(&artifact.path);
        if is_complete(&path).await {
            entries.push(path);
        } else {
            debug!("Library not found on disk (skipping): {}", lib.name);
        }
    }
    entries.push(layout.release_jar(&metadata.id));
    entries
}
