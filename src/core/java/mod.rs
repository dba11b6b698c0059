pub mod runtime;

pub use runtime::{ensure_runtime, probe_java, JavaInstallation, RuntimeTier};
