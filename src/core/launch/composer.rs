// ─── Launch Composer ───
// Turns an installed release and its resolved dependencies into a LaunchPlan.

use tracing::{debug, info};

use crate::core::auth::LaunchAccountProfile;
use crate::core::error::LauncherResult;
use crate::core::java::RuntimeTier;
use crate::core::resolve::ResolvedDependencySet;
use crate::core::rules::HostDescriptor;
use crate::core::state::{CacheLayout, UserConfig};
use crate::core::version::VersionJson;

use super::arguments::{self, ArgumentSchema};
use super::classpath::{build_classpath, path_str};
use super::command_line::LaunchPlan;
use super::variables::LaunchVariables;

pub const LAUNCHER_NAME: &str = "mclauncher";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initial heap handed to every runtime.
const INITIAL_HEAP: &str = "-Xms512M";

pub struct LaunchComposer {
    host: HostDescriptor,
    layout: CacheLayout,
}

impl LaunchComposer {
    pub fn new(host: HostDescriptor, layout: CacheLayout) -> Self {
        Self { host, layout }
    }

    /// Compose the launch of an installed release. Fails with
    /// `ReleaseNotInstalled` when its metadata is not in the cache.
    pub async fn compose(
        &self,
        release_id: &str,
        resolved: &ResolvedDependencySet,
        config: &UserConfig,
    ) -> LauncherResult<LaunchPlan> {
        let metadata = VersionJson::load_installed(&self.layout, release_id).await?;
        Ok(self.compose_metadata(&metadata, resolved, config))
    }

    pub fn compose_metadata(
        &self,
        metadata: &VersionJson,
        resolved: &ResolvedDependencySet,
        config: &UserConfig,
    ) -> LaunchPlan {
        let tier = RuntimeTier::for_release(&metadata.id);
        let vars = self.variables(metadata, resolved, config);
        let expanded = arguments::expand(ArgumentSchema::of(metadata), &vars, &self.host);

        let mut args = vec![format!("-Xmx{}G", config.memory_gb), INITIAL_HEAP.to_string()];
        args.extend(tier.gc_flags().iter().map(|flag| flag.to_string()));
        args.extend(expanded.jvm);
        args.push(metadata.main_class.clone());
        args.extend(expanded.game);

        info!(
            "Composed launch of {} as {} ({}, {} arguments)",
            metadata.id,
            config.username,
            tier,
            args.len()
        );

        let plan = LaunchPlan {
            program: config.java_path.clone(),
            args,
            working_dir: self.layout.root().to_path_buf(),
            natives_dir: self.layout.natives_dir(),
        };
        debug!("Command line: {}", plan.command_line());
        plan
    }

    pub fn variables(
        &self,
        metadata: &VersionJson,
        resolved: &ResolvedDependencySet,
        config: &UserConfig,
    ) -> LaunchVariables {
        let profile = LaunchAccountProfile::offline(&config.username);
        let assets_root = path_str(&resolved.assets_dir);
        let separator = self.host.path_list_separator();

        let mut vars = LaunchVariables::new();
        vars.set("auth_player_name", profile.username.as_str());
        vars.set("auth_uuid", profile.uuid.to_string());
        vars.set("auth_access_token", profile.access_token.as_str());
        vars.set("auth_session", profile.session());
        vars.set("user_type", profile.user_type.as_str());
        vars.set("user_properties", "{}");
        vars.set("auth_xuid", profile.xuid.as_str());
        vars.set("clientid", profile.client_id.as_str());
        vars.set("version_name", metadata.id.as_str());
        vars.set("version_type", metadata.version_type());
        vars.set("game_directory", path_str(self.layout.root()));
        vars.set("assets_root", assets_root.as_str());
        vars.set("game_assets", assets_root);
        vars.set("assets_index_name", metadata.asset_index_name());
        vars.set("natives_directory", path_str(&self.layout.natives_dir()));
        vars.set("library_directory", path_str(&self.layout.libraries_dir()));
        vars.set("classpath", build_classpath(&resolved.classpath, &self.host));
        vars.set("classpath_separator", separator);
        vars.set("launcher_name", LAUNCHER_NAME);
        vars.set("launcher_version", LAUNCHER_VERSION);
        vars
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::core::error::LauncherError;
    use crate::core::resolve::ResolutionReport;
    use crate::core::rules::{OsFamily, PointerWidth};

    fn linux() -> HostDescriptor {
        HostDescriptor::new(OsFamily::Linux, PointerWidth::Bits64)
    }

    fn resolved(root: &Path) -> ResolvedDependencySet {
        ResolvedDependencySet {
            classpath: vec![root.join("libraries/a.jar"), root.join("releases/x/x.jar")],
            natives: Vec::new(),
            assets_dir: root.join("assets"),
            report: ResolutionReport::default(),
        }
    }

    fn config() -> UserConfig {
        UserConfig {
            username: "Alice".into(),
            java_path: PathBuf::from("/usr/bin/java"),
            memory_gb: 4,
            ..UserConfig::default()
        }
    }

    #[test]
    fn legacy_release_argument_order() {
        let root = Path::new("/games");
        let composer = LaunchComposer::new(linux(), CacheLayout::new(root));
        let metadata = VersionJson::parse(
            r#"{"id": "1.8.9", "mainClass": "net.minecraft.client.main.Main",
                "minecraftArguments": "--username ${auth_player_name} --gameDir ${game_directory}"}"#,
        )
        .unwrap();

        let plan = composer.compose_metadata(&metadata, &resolved(root), &config());

        assert_eq!(plan.program, PathBuf::from("/usr/bin/java"));
        assert_eq!(plan.working_dir, root);
        assert_eq!(
            plan.args,
            vec![
                "-Xmx4G",
                "-Xms512M",
                "-XX:+UseConcMarkSweepGC",
                "-XX:+CMSIncrementalMode",
                "-Djava.library.path=/games/natives",
                "-cp",
                "/games/libraries/a.jar:/games/releases/x/x.jar",
                "net.minecraft.client.main.Main",
                "--username",
                "Alice",
                "--gameDir",
                "/games",
            ]
        );
    }

    #[test]
    fn templated_release_uses_tier_flags_before_template_args() {
        let root = Path::new("/games");
        let composer = LaunchComposer::new(linux(), CacheLayout::new(root));
        let metadata = VersionJson::parse(
            r#"{"id": "1.20.5", "mainClass": "M",
                "arguments": {"jvm": ["-cp", "${classpath}"], "game": ["--uuid", "${auth_uuid}", "--x", "${nope}"]}}"#,
        )
        .unwrap();

        let plan = composer.compose_metadata(&metadata, &resolved(root), &config());

        assert_eq!(&plan.args[..4], ["-Xmx4G", "-Xms512M", "-XX:+UseZGC", "-XX:+ZGenerational"]);
        let main = plan.args.iter().position(|a| a == "M").unwrap();
        assert_eq!(&plan.args[main + 1..main + 2], ["--uuid"]);
        assert_eq!(
            plan.args[main + 2],
            crate::core::auth::offline_uuid("Alice").to_string()
        );
        assert_eq!(plan.args.last().unwrap(), "${nope}");
    }

    #[test]
    fn variables_cover_session_and_layout() {
        let root = Path::new("/games");
        let composer = LaunchComposer::new(linux(), CacheLayout::new(root));
        let metadata = VersionJson::parse(
            r#"{"id": "1.12.2", "type": "release", "mainClass": "M", "assetIndex": {"id": "1.12", "url": "u"}}"#,
        )
        .unwrap();

        let vars = composer.variables(&metadata, &resolved(root), &config());

        assert_eq!(vars.get("auth_access_token"), Some("0"));
        assert_eq!(vars.get("user_type"), Some("legacy"));
        assert_eq!(vars.get("user_properties"), Some("{}"));
        assert_eq!(vars.get("assets_index_name"), Some("1.12"));
        assert_eq!(vars.get("assets_root"), Some("/games/assets"));
        assert_eq!(vars.get("library_directory"), Some("/games/libraries"));
        assert_eq!(vars.get("classpath_separator"), Some(":"));
        assert_eq!(vars.get("version_type"), Some("release"));
        assert_eq!(vars.get("launcher_name"), Some("mclauncher"));
    }

    #[tokio::test]
    async fn missing_metadata_is_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let composer = LaunchComposer::new(linux(), CacheLayout::new(dir.path()));

        let err = composer
            .compose("1.20.4", &resolved(dir.path()), &config())
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::ReleaseNotInstalled(id) if id == "1.20.4"));
    }
}
