use std::path::{Path, PathBuf};

/// On-disk layout of the installation root, which doubles as the fetch cache.
///
/// ```text
/// <root>/releases/<id>/<id>.json   release metadata
/// <root>/releases/<id>/<id>.jar    primary artifact
/// <root>/libraries/<path>          library artifacts
/// <root>/assets/indexes/<id>.json  asset index documents
/// <root>/assets/objects/<xx>/<hash>
/// <root>/natives/                  flattened native libraries
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn releases_dir(&self) -> PathBuf {
        self.root.join("releases")
    }

    pub fn release_dir(&self, id: &str) -> PathBuf {
        self.releases_dir().join(id)
    }

    pub fn release_metadata(&self, id: &str) -> PathBuf {
        self.release_dir(id).join(format!("{id}.json"))
    }

    pub fn release_jar(&self, id: &str) -> PathBuf {
        self.release_dir(id).join(format!("{id}.jar"))
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn library(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .fold(self.libraries_dir(), |path, segment| path.join(segment))
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_index(&self, index_id: &str) -> PathBuf {
        self.assets_dir()
            .join("indexes")
            .join(format!("{index_id}.json"))
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.assets_dir().join("objects")
    }

    pub fn natives_dir(&self) -> PathBuf {
        self.root.join("natives")
    }

    /// Releases with a non-empty primary artifact on disk, sorted by id.
    pub fn installed_releases(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.releases_dir()) else {
            return Vec::new();
        };

        let mut releases: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|id| {
                std::fs::metadata(self.release_jar(id))
                    .map(|meta| meta.is_file() && meta.len() > 0)
                    .unwrap_or(false)
            })
            .collect();
        releases.sort();
        releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_cache_layout() {
        let layout = CacheLayout::new("/data");
        assert_eq!(
            layout.release_metadata("1.20.4"),
            Path::new("/data/releases/1.20.4/1.20.4.json")
        );
        assert_eq!(
            layout.release_jar("1.20.4"),
            Path::new("/data/releases/1.20.4/1.20.4.jar")
        );
        assert_eq!(
            layout.asset_index("17"),
            Path::new("/data/assets/indexes/17.json")
        );
        assert_eq!(layout.natives_dir(), Path::new("/data/natives"));
    }

    #[test]
    fn library_paths_are_split_on_forward_slashes() {
        let layout = CacheLayout::new("/data");
        assert_eq!(
            layout.library("org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar"),
            Path::new("/data/libraries/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar")
        );
    }

    #[test]
    fn installed_releases_require_a_non_empty_jar() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(dir.path());
        assert!(layout.installed_releases().is_empty());

        for (id, body) in [("1.8.9", &b"jar"[..]), ("1.20.4", &b"jar"[..]), ("broken", &b""[..])] {
            std::fs::create_dir_all(layout.release_dir(id)).unwrap();
            std::fs::write(layout.release_jar(id), body).unwrap();
        }
        std::fs::create_dir_all(layout.release_dir("metadata-only")).unwrap();
        std::fs::write(layout.release_metadata("metadata-only"), b"{}").unwrap();

        assert_eq!(layout.installed_releases(), vec!["1.20.4", "1.8.9"]);
    }
}
