// ─── Java Runtime ───
// Runtime tier selection per release and the acquisition boundary: the
// configured binary is probed before launch.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::core::error::{LauncherError, LauncherResult};

/// Java generation a release is launched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuntimeTier {
    Java8,
    Java17,
    Java21,
}

impl RuntimeTier {
    pub fn major(self) -> u32 {
        match self {
            RuntimeTier::Java8 => 8,
            RuntimeTier::Java17 => 17,
            RuntimeTier::Java21 => 21,
        }
    }

    /// Tier for a release id. Semantic ids compare numerically with bounds
    /// inclusive to the higher tier; weekly snapshots (`24w14a`) map by year.
    pub fn for_release(release_id: &str) -> Self {
        if let Some(year) = snapshot_year(release_id) {
            return match year {
                0..=20 => RuntimeTier::Java8,
                21..=23 => RuntimeTier::Java17,
                _ => RuntimeTier::Java21,
            };
        }

        let mut parts = release_id
            .split(|c: char| !c.is_ascii_digit())
            .take_while(|p| !p.is_empty())
            .map(|p| p.parse::<u32>().unwrap_or(0));
        let major = parts.next().unwrap_or(1);
        let minor = parts.next().unwrap_or(0);
        let patch = parts.next().unwrap_or(0);

        if major > 1 || (minor, patch) >= (20, 5) {
            RuntimeTier::Java21
        } else if minor >= 17 {
            RuntimeTier::Java17
        } else {
            RuntimeTier::Java8
        }
    }

    /// Garbage-collector flags tuned for this tier.
    pub fn gc_flags(self) -> &'static [&'static str] {
        match self {
            RuntimeTier::Java8 => &["-XX:+UseConcMarkSweepGC", "-XX:+CMSIncrementalMode"],
            RuntimeTier::Java17 => &[
                "-XX:+UseG1GC",
                "-XX:MaxGCPauseMillis=200",
                "-XX:G1HeapRegionSize=32M",
            ],
            RuntimeTier::Java21 => &["-XX:+UseZGC", "-XX:+ZGenerational"],
        }
    }
}

impl fmt::Display for RuntimeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Java {}", self.major())
    }
}

/// `yy` of a `yywNNx` snapshot id.
fn snapshot_year(release_id: &str) -> Option<u32> {
    let (year, rest) = release_id.split_once('w')?;
    if year.len() != 2 || !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    pub path: PathBuf,
    pub version: String,
    pub major: u32,
}

/// Make sure the runtime at `java_path` can run before a launch. A binary that
/// cannot be executed is `JavaNotFound`; a major version other than the tier's
/// only warns.
pub async fn ensure_runtime(tier: RuntimeTier, java_path: &Path) -> LauncherResult<PathBuf> {
    let Some(installation) = probe_java(java_path).await else {
        return Err(LauncherError::JavaNotFound(tier.major()));
    };

    if installation.major != tier.major() {
        warn!(
            "{:?} reports Java {} but this release expects {}",
            installation.path, installation.version, tier
        );
    }
    Ok(installation.path)
}

#[instrument]
pub async fn probe_java(path: &Path) -> Option<JavaInstallation> {
    let output = Command::new(path).arg("-version").output().await.ok()?;
    let text = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout)
    );
    debug!("Probing {:?}: {}", path, text.lines().next().unwrap_or(""));

    let version = parse_version_string(&text)?;
    Some(JavaInstallation {
        path: path.to_path_buf(),
        major: parse_major_version(&version),
        version,
    })
}

/// First quoted token of `java -version` output (`"17.0.9"`).
fn parse_version_string(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let start = line.find('"')?;
        let end = line[start + 1..].find('"')?;
        Some(line[start + 1..start + 1 + end].to_string())
    })
}

/// `1.8.0_392` → 8, `17.0.9` → 17, `21` → 21.
fn parse_major_version(version: &str) -> u32 {
    let mut parts = version.split(|c: char| !c.is_ascii_digit());
    let first: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    if first == 1 {
        parts.next().and_then(|p| p.parse().ok()).unwrap_or(first)
    } else {
        first
    }
}
