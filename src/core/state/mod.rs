mod app_state;
mod config;
mod layout;

pub use app_state::AppState;
pub use config::{
    default_root_dir, Endpoints, NetworkSettings, UserConfig, MAX_MEMORY_GB, MIN_MEMORY_GB,
    RESOURCES_URL, VERSION_MANIFEST_URL,
};
pub use layout::CacheLayout;
