use tracing::{info, warn};

use crate::cli::{Cli, Command, ConfigCommand};
use crate::core::downloader::is_complete;
use crate::core::error::LauncherResult;
use crate::core::java::{self, RuntimeTier};
use crate::core::launch;
use crate::core::resolve::{self, ResolutionReport};
use crate::core::state::{default_root_dir, AppState};
use crate::core::version::{VersionEntry, VersionJson, VersionManifest};

pub async fn dispatch(cli: Cli) -> LauncherResult<()> {
    let root = cli.root.unwrap_or_else(default_root_dir);
    let mut state = AppState::new(root);

    match cli.command {
        Command::Versions(args) => list_versions(&state, args.all).await,
        Command::Installed => {
            list_installed(&state);
            Ok(())
        }
        Command::Install(args) => install(&state, &args.id).await,
        Command::Launch(args) => launch_release(&state, &args.id, args.dry_run).await,
        Command::Config(ConfigCommand::Show) => show_config(&state),
        Command::Config(ConfigCommand::Set { key, value }) => {
            set_config(&mut state, &key, &value)
        }
    }
}

async fn list_versions(state: &AppState, include_all: bool) -> LauncherResult<()> {
    let fetcher = state.fetcher()?;
    let manifest =
        VersionManifest::fetch(&fetcher, &state.config.endpoints.version_manifest).await?;
    let installed = state.layout.installed_releases();

    let mut entries = manifest.listed(include_all);
    entries.sort_by(|a, b| b.release_time.cmp(&a.release_time));
    for entry in entries {
        println!("{}", version_line(entry, installed.contains(&entry.id)));
    }
    Ok(())
}

fn version_line(entry: &VersionEntry, installed: bool) -> String {
    let marker = if installed { "*" } else { " " };
    let date = entry
        .release_time
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!("{marker} {:<24} {:<10} {}", entry.id, entry.version_type, date)
        .trim_end()
        .to_string()
}

fn list_installed(state: &AppState) {
    let installed = state.layout.installed_releases();
    if installed.is_empty() {
        println!("No releases installed under {:?}", state.layout.root());
        return;
    }
    for id in installed {
        println!("{id}");
    }
}

async fn install(state: &AppState, release_id: &str) -> LauncherResult<()> {
    let resolver = state.resolver(state.fetcher()?);
    let resolved = resolver.resolve(release_id).await?;

    println!("{}", install_summary(release_id, &resolved.report));
    Ok(())
}

fn install_summary(release_id: &str, report: &ResolutionReport) -> String {
    let counts = format!(
        "{} libraries, {} native archives, {} assets",
        report.libraries, report.natives, report.assets
    );
    if report.is_clean() {
        return format!("Installed {release_id} ({counts})");
    }

    let mut summary = format!(
        "Installed {release_id} ({counts}) with {} warnings:",
        report.failures.len()
    );
    for failure in &report.failures {
        summary.push_str(&format!("\n  {} {}: {}", failure.kind, failure.name, failure.reason));
    }
    summary
}

async fn launch_release(state: &AppState, release_id: &str, dry_run: bool) -> LauncherResult<()> {
    let metadata = VersionJson::load_installed(&state.layout, release_id).await?;
    let resolved = resolve::reconstruct(&state.layout, &state.host, &metadata).await;

    if !is_complete(&state.layout.release_jar(release_id)).await {
        warn!("Primary artifact of {} is missing; run install again", release_id);
    }

    let mut plan = state
        .composer()
        .compose(release_id, &resolved, &state.config)
        .await?;

    if dry_run {
        println!("{}", plan.command_line());
        return Ok(());
    }

    let tier = RuntimeTier::for_release(release_id);
    plan.program = java::ensure_runtime(tier, &plan.program).await?;
    let pid = launch::launch(&plan)?;
    info!("Started {} as {} (pid {})", release_id, state.config.username, pid);
    println!("Launched {release_id} as {}", state.config.username);
    Ok(())
}

fn show_config(state: &AppState) -> LauncherResult<()> {
    println!("root: {}", state.layout.root().display());
    println!("{}", serde_json::to_string_pretty(&state.config)?);
    Ok(())
}

fn set_config(state: &mut AppState, key: &str, value: &str) -> LauncherResult<()> {
    state.config.set(key, value)?;
    state.save_config()?;
    println!("{key} = {value}");
    Ok(())
}
