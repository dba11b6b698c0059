// ─── Version File ───
// Parses a release metadata document: libraries with their platform rules,
// native classifiers, asset index reference and launch argument templates.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::downloader::is_complete;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::metadata::{self, MetadataExt};
use crate::core::rules::{self, HostDescriptor, Rule};
use crate::core::state::CacheLayout;

/// Exclusions applied when a library does not declare its own.
const DEFAULT_EXTRACT_EXCLUDES: &[&str] = &["META-INF/"];

/// A fully parsed release metadata document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    #[serde(rename = "type", default)]
    pub version_type: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    /// Legacy asset index name, used when `assetIndex` is absent.
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub total_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<ArgumentElement>,
    #[serde(default)]
    pub jvm: Vec<ArgumentElement>,
}

/// One element of a templated argument list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentElement {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Option<Vec<Rule>>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Many(Vec<String>),
}

impl ArgumentValue {
    pub fn values(&self) -> &[String] {
        match self {
            ArgumentValue::Single(value) => std::slice::from_ref(value),
            ArgumentValue::Many(values) => values,
        }
    }
}

// ─── Library Entry with Rules ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
    /// OS name → classifier template (may contain `${arch}`).
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,
    #[serde(default)]
    pub extract: Option<ExtractRules>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
    #[serde(default)]
    pub classifiers: Option<HashMap<String, LibDownloadArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LibraryEntry {
    /// Evaluate this library's rules against `host`.
    pub fn is_active(&self, host: &HostDescriptor) -> bool {
        rules::applies(self.rules.as_deref(), host)
    }

    /// Native classifier for `host`, with `${arch}` replaced by the
    /// pointer-width tag (e.g. `natives-windows-${arch}` → `natives-windows-64`).
    pub fn native_classifier(&self, host: &HostDescriptor) -> Option<String> {
        let template = self.natives.as_ref()?.get(host.os.metadata_name())?;
        Some(template.replace("${arch}", host.width.tag()))
    }

    /// Native-only entries are extracted, never put on the classpath.
    pub fn is_native(&self, host: &HostDescriptor) -> bool {
        self.native_classifier(host).is_some()
    }

    pub fn artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    pub fn classified_artifact(&self, classifier: &str) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.classifiers.as_ref()?.get(classifier)
    }

    /// Archive entry prefixes skipped when unpacking natives.
    pub fn extract_excludes(&self) -> Vec<&str> {
        match &self.extract {
            Some(extract) if !extract.exclude.is_empty() => {
                extract.exclude.iter().map(String::as_str).collect()
            }
            _ => DEFAULT_EXTRACT_EXCLUDES.to_vec(),
        }
    }
}

impl VersionJson {
    /// Parse a release metadata document, failing on a wrong shape.
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let tree = metadata::parse_document(raw)?;
        tree.require_str("id")?;
        tree.require_str("mainClass")?;
        tree.optional_str("minecraftArguments")?;
        if tree.lookup("libraries").is_some() {
            tree.require_array("libraries")?;
        }
        metadata::decode(tree)
    }

    /// Read a cached metadata document from disk.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Self::parse(&raw)
    }

    /// Read the metadata of a release previously installed under `layout`.
    pub async fn load_installed(layout: &CacheLayout, release_id: &str) -> LauncherResult<Self> {
        let path = layout.release_metadata(release_id);
        if !is_complete(&path).await {
            return Err(LauncherError::ReleaseNotInstalled(release_id.to_string()));
        }
        Self::load(&path).await
    }

    pub fn client_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.as_ref()?.client.as_ref()
    }

    /// Release channel tag (`release`, `snapshot`, ...).
    pub fn version_type(&self) -> &str {
        self.version_type.as_deref().unwrap_or("release")
    }

    pub fn asset_index_name(&self) -> &str {
        self.asset_index
            .as_ref()
            .map(|index| index.id.as_str())
            .or(self.assets.as_deref())
            .unwrap_or("legacy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{OsFamily, PointerWidth};

    fn windows64() -> HostDescriptor {
        HostDescriptor::new(OsFamily::Windows, PointerWidth::Bits64)
    }

    fn library(json: serde_json::Value) -> LibraryEntry {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn native_classifier_substitutes_arch() {
        let lib = library(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
            "natives": {"windows": "natives-windows-${arch}", "linux": "natives-linux"}
        }));

        assert_eq!(
            lib.native_classifier(&windows64()).as_deref(),
            Some("natives-windows-64")
        );
        let win32 = HostDescriptor::new(OsFamily::Windows, PointerWidth::Bits32);
        assert_eq!(
            lib.native_classifier(&win32).as_deref(),
            Some("natives-windows-32")
        );
        let osx = HostDescriptor::new(OsFamily::Osx, PointerWidth::Bits64);
        assert!(lib.native_classifier(&osx).is_none());
        assert!(!lib.is_native(&osx));
    }

    #[test]
    fn classified_artifact_lookup() {
        let lib = library(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
            "downloads": {
                "artifact": {"path": "a.jar", "url": "https://x/a.jar"},
                "classifiers": {
                    "natives-windows": {"path": "a-natives-windows.jar", "url": "https://x/n.jar", "sha1": "ff"}
                }
            }
        }));

        assert_eq!(lib.artifact().unwrap().path, "a.jar");
        assert_eq!(
            lib.classified_artifact("natives-windows").unwrap().path,
            "a-natives-windows.jar"
        );
        assert!(lib.classified_artifact("natives-osx").is_none());
    }

    #[test]
    fn extract_excludes_default_to_meta_inf() {
        let plain = library(serde_json::json!({"name": "a:b:1"}));
        assert_eq!(plain.extract_excludes(), vec!["META-INF/"]);

        let custom = library(serde_json::json!({
            "name": "a:b:1",
            "extract": {"exclude": ["META-INF/", "docs/"]}
        }));
        assert_eq!(custom.extract_excludes(), vec!["META-INF/", "docs/"]);
    }

    #[test]
    fn parses_templated_arguments() {
        let parsed = VersionJson::parse(
            &serde_json::json!({
                "id": "1.20.4",
                "type": "release",
                "mainClass": "net.minecraft.client.main.Main",
                "arguments": {
                    "game": [
                        "--username",
                        "${auth_player_name}",
                        {
                            "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                            "value": "--demo"
                        },
                        {
                            "rules": [{"action": "allow", "os": {"name": "osx"}}],
                            "value": ["-XstartOnFirstThread", "-Dx=y"]
                        }
                    ]
                }
            })
            .to_string(),
        )
        .unwrap();

        let game = &parsed.arguments.as_ref().unwrap().game;
        assert_eq!(game.len(), 4);
        assert!(matches!(&game[0], ArgumentElement::Plain(s) if s == "--username"));
        match &game[3] {
            ArgumentElement::Conditional { value, .. } => {
                assert_eq!(value.values(), ["-XstartOnFirstThread", "-Dx=y"]);
            }
            other => panic!("unexpected element: {other:?}"),
        }
        assert!(parsed.minecraft_arguments.is_none());
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        let err = VersionJson::parse(r#"{"id": "1.0", "mainClass": ["Main"]}"#).unwrap_err();
        assert!(matches!(err, LauncherError::MetadataShape { .. }));

        let err = VersionJson::parse(r#"{"id": "1.0"}"#).unwrap_err();
        assert!(matches!(err, LauncherError::MetadataMissing(_)));

        assert!(VersionJson::parse(r#"{"id": "1.0", "mainClass": "M", "libraries": {}}"#).is_err());
    }

    #[test]
    fn asset_index_name_falls_back() {
        let with_index = VersionJson::parse(
            r#"{"id": "1.0", "mainClass": "M", "assetIndex": {"id": "17", "url": "u"}}"#,
        )
        .unwrap();
        assert_eq!(with_index.asset_index_name(), "17");

        let legacy = VersionJson::parse(r#"{"id": "1.0", "mainClass": "M", "assets": "pre-1.6"}"#)
            .unwrap();
        assert_eq!(legacy.asset_index_name(), "pre-1.6");
        assert_eq!(legacy.version_type(), "release");
    }
}
