// ─── Launch Task ───
// Spawns the runtime process described by a LaunchPlan.

use std::path::Path;
use std::process::Stdio;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::rules::OsFamily;

use super::classpath::path_str;
use super::command_line::LaunchPlan;

/// Start the game process and return its pid.
///
/// Returns as soon as the process is created; the child is not awaited.
pub fn launch(plan: &LaunchPlan) -> LauncherResult<u32> {
    let mut cmd = std::process::Command::new(&plan.program);
    cmd.args(&plan.args)
        .current_dir(&plan.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    configure_native_library_env(&mut cmd, &plan.natives_dir);
    configure_platform_spawn(&mut cmd);

    info!("Launching with Java: {:?}", plan.program);
    debug!("Command (copy/paste): {}", plan.command_line());

    let child = cmd.spawn().map_err(|e| {
        LauncherError::JavaExecution(format!("cannot start {:?}: {}", plan.program, e))
    })?;
    Ok(child.id())
}

/// Environment variable the platform's dynamic loader searches.
fn native_library_var(os: OsFamily) -> &'static str {
    match os {
        OsFamily::Windows => "PATH",
        OsFamily::Linux => "LD_LIBRARY_PATH",
        OsFamily::Osx => "DYLD_LIBRARY_PATH",
    }
}

fn configure_native_library_env(cmd: &mut std::process::Command, natives_dir: &Path) {
    let os = OsFamily::current();
    let var_name = native_library_var(os);
    let merged = prepend_env_path(
        std::env::var(var_name).ok(),
        &path_str(natives_dir),
        if os == OsFamily::Windows { ";" } else { ":" },
    );
    cmd.env(var_name, merged);
}

fn configure_platform_spawn(cmd: &mut std::process::Command) {
    #[cfg(target_os = "windows")]
    {
        const CREATE_NEW_CONSOLE: u32 = 0x00000010;
        cmd.creation_flags(CREATE_NEW_CONSOLE);
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

fn prepend_env_path(existing: Option<String>, value: &str, separator: &str) -> String {
    match existing {
        Some(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, separator, existing)
        }
        _ => value.to_string(),
    }
}
