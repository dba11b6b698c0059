// ─── mclauncher Core ───
// Resolves a release into on-disk dependencies and composes its launch.
//
// Architecture:
//   core/
//     metadata/   Decoded JSON documents with shape-checked lookups
//     rules/      Host descriptor + platform rule evaluation
//     downloader/ Idempotent, sequential fetch cache over a Transport
//     version/    Release index + release metadata documents
//     assets/     Asset index + object downloads
//     resolve/    Dependency resolution + native extraction
//     auth/       Offline identity
//     java/       Runtime tier selection + runtime probe
//     launch/     Argument templates, quoting, composer + process spawner
//     state/      User settings, cache layout, per-invocation state

pub mod assets;
pub mod auth;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod metadata;
pub mod resolve;
pub mod rules;
pub mod state;
pub mod version;
