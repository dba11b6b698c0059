pub mod manifest;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest};
pub use version_file::{
    ArgumentElement, ArgumentValue, Arguments, AssetIndexInfo, DownloadArtifact,
    LibDownloadArtifact, LibraryEntry, VersionJson,
};
