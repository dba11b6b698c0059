use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::downloader::FetchSettings;
use crate::core::error::{LauncherError, LauncherResult};

const APP_DIR_NAME: &str = "mclauncher";
const SETTINGS_FILE: &str = "launcher_settings.json";

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

pub const MIN_MEMORY_GB: u32 = 1;
pub const MAX_MEMORY_GB: u32 = 64;

/// Persisted user settings (`launcher_settings.json` under the root).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    pub username: String,
    pub java_path: PathBuf,
    pub memory_gb: u32,
    pub network: NetworkSettings,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkSettings {
    /// Connect timeout and per-chunk idle timeout, in seconds.
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub verify_hashes: bool,
}

/// Remote locations; overridable for mirrors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub version_manifest: String,
    pub resources: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: "Player".into(),
            java_path: PathBuf::from("java"),
            memory_gb: 2,
            network: NetworkSettings::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 10,
            verify_hashes: false,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            version_manifest: VERSION_MANIFEST_URL.into(),
            resources: RESOURCES_URL.into(),
        }
    }
}

impl NetworkSettings {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            idle_timeout: Duration::from_secs(self.timeout_secs),
            verify_sha1: self.verify_hashes,
        }
    }
}

impl UserConfig {
    pub fn settings_path(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE)
    }

    /// Load settings from `root`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(root: &Path) -> Self {
        let path = Self::settings_path(root);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str::<UserConfig>(&raw) {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!("Ignoring {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Ignoring unreadable settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, root: &Path) -> LauncherResult<()> {
        std::fs::create_dir_all(root).map_err(|e| LauncherError::io(root, e))?;
        let path = Self::settings_path(root);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| LauncherError::io(path, e))
    }

    pub fn validate(&self) -> LauncherResult<()> {
        validate_username(&self.username)?;
        validate_memory(self.memory_gb)?;
        if self.network.timeout_secs == 0 {
            return Err(LauncherError::invalid_setting(
                "timeout",
                "must be at least one second",
            ));
        }
        Ok(())
    }

    /// Apply `key = value` from the command line. The config is left
    /// untouched when the value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> LauncherResult<()> {
        let mut updated = self.clone();
        match key {
            "username" => updated.username = value.trim().to_string(),
            "memory" => {
                updated.memory_gb = value.trim().parse().map_err(|_| {
                    LauncherError::invalid_setting("memory", format!("`{value}` is not a number"))
                })?
            }
            "java" => {
                if value.trim().is_empty() {
                    return Err(LauncherError::invalid_setting("java", "path is empty"));
                }
                updated.java_path = PathBuf::from(value.trim());
            }
            "verify-hashes" => {
                updated.network.verify_hashes = value.trim().parse().map_err(|_| {
                    LauncherError::invalid_setting("verify-hashes", "expected true or false")
                })?
            }
            "timeout" => {
                updated.network.timeout_secs = value.trim().parse().map_err(|_| {
                    LauncherError::invalid_setting("timeout", format!("`{value}` is not a number"))
                })?
            }
            other => {
                return Err(LauncherError::invalid_setting(
                    other,
                    "unknown key (expected username, memory, java, verify-hashes or timeout)",
                ))
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn validate_username(username: &str) -> LauncherResult<()> {
    if username.trim().is_empty() {
        return Err(LauncherError::invalid_setting("username", "must not be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(LauncherError::invalid_setting(
            "username",
            "must not contain whitespace",
        ));
    }
    Ok(())
}

fn validate_memory(memory_gb: u32) -> LauncherResult<()> {
    if !(MIN_MEMORY_GB..=MAX_MEMORY_GB).contains(&memory_gb) {
        return Err(LauncherError::invalid_setting(
            "memory",
            format!("must be between {MIN_MEMORY_GB} and {MAX_MEMORY_GB} GB"),
        ));
    }

    let mut system = sysinfo::System::new();
    system.refresh_memory();
    let total_gb = system.total_memory() / (1024 * 1024 * 1024);
    if total_gb > 0 && u64::from(memory_gb) > total_gb {
        warn!(
            "Requested {} GB heap but this machine reports {} GB of RAM",
            memory_gb, total_gb
        );
    }
    Ok(())
}

/// Default installation root: `<data dir>/mclauncher`.
pub fn default_root_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
