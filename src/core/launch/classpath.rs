// ─── Classpath Builder ───
// Joins resolved library paths into the runtime's classpath string.

use std::path::{Path, PathBuf};

use crate::core::rules::HostDescriptor;

/// Classpath string for `host`, entries in the given order.
pub fn build_classpath(entries: &[PathBuf], host: &HostDescriptor) -> String {
    entries
        .iter()
        .map(|entry| path_str(entry))
        .collect::<Vec<_>>()
        .join(host.path_list_separator())
}

/// Path as passed on the command line.
pub fn path_str(path: &Path) -> String {
    let text = path.to_string_lossy().into_owned();

    // The runtime mis-resolves extended-length paths (`\\?\C:\...`) on the
    // classpath.
    match text.strip_prefix(r"\\?\") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
