// ─── Native Extraction ───
// Unpacks platform binaries from native archives into the shared natives dir.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::downloader::{is_complete, staging_path};
use crate::core::error::{LauncherError, LauncherResult};

/// Extract every file entry of `archive_path` into `natives_dir`, flattened to
/// its file name. Directory entries and entries whose path starts with one of
/// `excludes` are skipped. Existing files are replaced, each through a
/// `.part` staging file so a partial copy never sits under the final name.
///
/// Returns the paths of the files written for this archive.
pub async fn extract_natives(
    archive_path: &Path,
    natives_dir: &Path,
    excludes: &[&str],
) -> LauncherResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(natives_dir)
        .await
        .map_err(|e| LauncherError::io(natives_dir, e))?;

    let archive_bytes = tokio::fs::read(archive_path)
        .await
        .map_err(|e| LauncherError::io(archive_path, e))?;

    let dest_dir = natives_dir.to_path_buf();
    let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || unpack(archive_bytes, &dest_dir, &excludes))
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?
}

fn unpack(
    archive_bytes: Vec<u8>,
    dest_dir: &Path,
    excludes: &[String],
) -> LauncherResult<Vec<PathBuf>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if excludes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            continue;
        }

        let Some(file_name) = Path::new(&name).file_name() else {
            continue;
        };
        let dest = dest_dir.join(file_name);

        let staging = staging_path(&dest);
        if let Err(err) = write_staged(&mut entry, &staging, &dest) {
            let _ = std::fs::remove_file(&staging);
            return Err(err);
        }
        debug!("Extracted native: {}", name);
        extracted.push(dest);
    }

    Ok(extracted)
}

fn write_staged(entry: &mut impl Read, staging: &Path, dest: &Path) -> LauncherResult<()> {
    let mut out = std::fs::File::create(staging).map_err(|e| LauncherError::io(staging, e))?;
    std::io::copy(entry, &mut out).map_err(|e| LauncherError::io(staging, e))?;
    drop(out);
    std::fs::rename(staging, dest).map_err(|e| LauncherError::io(dest, e))
}

/// Files currently present in `natives_dir`, sorted by name. Used when the
/// dependency set is rebuilt offline.
pub async fn list_extracted(natives_dir: &Path) -> Vec<PathBuf> {
    let mut entries = match tokio::fs::read_dir(natives_dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let staged = path.extension().is_some_and(|ext| ext == "part");
                if !staged && is_complete(&path).await {
                    files.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Cannot list {:?}: {}", natives_dir, e);
                break;
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
pub(crate) fn native_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, body) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
