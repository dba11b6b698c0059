use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::core::downloader::{ContentFetcher, HttpTransport, Transport};
use crate::core::error::LauncherResult;
use crate::core::launch::LaunchComposer;
use crate::core::resolve::DependencyResolver;
use crate::core::rules::HostDescriptor;

use super::{CacheLayout, UserConfig};

/// Everything a command needs, built once per invocation and passed down.
pub struct AppState {
    pub layout: CacheLayout,
    pub config: UserConfig,
    pub host: HostDescriptor,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let config = UserConfig::load(&root);
        let host = HostDescriptor::current();
        debug!("Root {:?}, host {}", root, host);
        Self {
            layout: CacheLayout::new(root),
            config,
            host,
        }
    }

    /// Fetcher over the real network, configured from the user settings.
    pub fn fetcher(&self) -> LauncherResult<ContentFetcher> {
        let transport = HttpTransport::from_settings(&self.config.network)?;
        Ok(self.fetcher_with(Arc::new(transport)))
    }

    pub fn fetcher_with(&self, transport: Arc<dyn Transport>) -> ContentFetcher {
        ContentFetcher::new(transport, self.config.network.fetch_settings())
    }

    pub fn resolver(&self, fetcher: ContentFetcher) -> DependencyResolver {
        DependencyResolver::new(
            fetcher,
            self.host,
            self.layout.clone(),
            self.config.endpoints.clone(),
        )
    }

    pub fn composer(&self) -> LaunchComposer {
        LaunchComposer::new(self.host, self.layout.clone())
    }

    pub fn save_config(&self) -> LauncherResult<()> {
        self.config.save(self.layout.root())
    }
}
