//! Install-then-launch against an in-memory release server.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};

use mclauncher_lib::core::downloader::{ByteStream, ContentFetcher, FetchSettings, Transport};
use mclauncher_lib::core::error::{LauncherError, LauncherResult};
use mclauncher_lib::core::launch::LaunchComposer;
use mclauncher_lib::core::resolve::{reconstruct, DependencyResolver};
use mclauncher_lib::core::rules::{HostDescriptor, OsFamily, PointerWidth};
use mclauncher_lib::core::state::{CacheLayout, Endpoints, UserConfig};
use mclauncher_lib::core::version::VersionJson;

const INDEX_URL: &str = "https://meta.test/version_manifest.json";
const RELEASE_URL: &str = "https://meta.test/1.0.json";
const ASSET_INDEX_URL: &str = "https://meta.test/assets/1.0.json";
const RESOURCES: &str = "https://resources.test";

#[derive(Default)]
struct FakeServer {
    files: HashMap<String, Vec<u8>>,
    hits: Mutex<Vec<String>>,
}

impl FakeServer {
    fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.to_string(), body.into());
        self
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn open(&self, url: &str) -> LauncherResult<ByteStream> {
        self.hits.lock().unwrap().push(url.to_string());
        match self.files.get(url) {
            Some(body) => {
                let chunk: LauncherResult<Bytes> = Ok(Bytes::from(body.clone()));
                Ok(stream::iter(vec![chunk]).boxed())
            }
            None => Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn server() -> FakeServer {
    let release = serde_json::json!({
        "id": "1.0",
        "type": "release",
        "mainClass": "Main",
        "downloads": {"client": {"url": "https://lib.test/client.jar"}},
        "assetIndex": {"id": "1.0", "url": ASSET_INDEX_URL},
        "minecraftArguments": "--user ${auth_player_name}",
        "libraries": [
            {
                "name": "com.example:a:1",
                "downloads": {"artifact": {"path": "com/example/a.jar", "url": "https://lib.test/a.jar"}}
            }
        ]
    });

    FakeServer::default()
        .serve(
            INDEX_URL,
            format!(r#"{{"versions": [{{"id": "1.0", "type": "release", "url": "{RELEASE_URL}"}}]}}"#),
        )
        .serve(RELEASE_URL, release.to_string())
        .serve("https://lib.test/client.jar", "client-bytes")
        .serve("https://lib.test/a.jar", "library-bytes")
        .serve(
            ASSET_INDEX_URL,
            r#"{"objects": {"sound": {"hash": "abcd1234", "size": 10}}}"#,
        )
        .serve(format!("{RESOURCES}/ab/abcd1234").as_str(), "0123456789")
}

fn linux() -> HostDescriptor {
    HostDescriptor::new(OsFamily::Linux, PointerWidth::Bits64)
}

fn resolver(root: &Path, transport: Arc<dyn Transport>) -> DependencyResolver {
    DependencyResolver::new(
        ContentFetcher::new(transport, FetchSettings::default()),
        linux(),
        CacheLayout::new(root),
        Endpoints {
            version_manifest: INDEX_URL.into(),
            resources: RESOURCES.into(),
        },
    )
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn install_then_launch_composes_the_expected_command() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server());

    let resolved = resolver(dir.path(), server.clone())
        .resolve("1.0")
        .await
        .unwrap();

    assert!(resolved.report.is_clean(), "{:?}", resolved.report);
    assert_eq!(file_names(&resolved.classpath), vec!["a.jar", "1.0.jar"]);
    assert!(server
        .hits()
        .iter()
        .any(|url| url.ends_with("/ab/abcd1234")));
    assert_eq!(
        std::fs::read(dir.path().join("assets/objects/ab/abcd1234")).unwrap(),
        b"0123456789"
    );

    let config = UserConfig {
        username: "Alice".into(),
        ..UserConfig::default()
    };
    let composer = LaunchComposer::new(linux(), CacheLayout::new(dir.path()));
    let plan = composer.compose("1.0", &resolved, &config).await.unwrap();

    assert_eq!(plan.working_dir, dir.path());
    assert_eq!(
        &plan.args[plan.args.len() - 3..],
        ["Main", "--user", "Alice"]
    );
    assert_eq!(&plan.args[..2], ["-Xmx2G", "-Xms512M"]);
    let cp = plan.args.iter().position(|a| a == "-cp").unwrap();
    assert!(plan.args[cp + 1].ends_with("1.0.jar"));
}

#[tokio::test]
async fn second_install_only_refreshes_the_release_index() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(server());

    resolver(dir.path(), server.clone()).resolve("1.0").await.unwrap();
    let first = server.hits().len();
    resolver(dir.path(), server.clone()).resolve("1.0").await.unwrap();

    assert_eq!(&server.hits()[first..], [INDEX_URL]);
}

#[tokio::test]
async fn offline_launch_rebuilds_the_same_classpath() {
    let dir = tempfile::tempdir().unwrap();
    let online = resolver(dir.path(), Arc::new(server()))
        .resolve("1.0")
        .await
        .unwrap();

    let layout = CacheLayout::new(dir.path());
    let metadata = VersionJson::load_installed(&layout, "1.0").await.unwrap();
    let rebuilt = reconstruct(&layout, &linux(), &metadata).await;

    assert_eq!(rebuilt.classpath, online.classpath);
}

#[tokio::test]
async fn launching_an_uninstalled_release_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = VersionJson::load_installed(&CacheLayout::new(dir.path()), "1.0")
        .await
        .unwrap_err();
    assert!(matches!(err, LauncherError::ReleaseNotInstalled(_)));
}
