use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::core::state::NetworkSettings;

const APP_USER_AGENT: &str = concat!("mclauncher/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client: bounded redirects, connect timeout, identity encoding
/// so streamed bodies land on disk byte-for-byte.
pub fn build_http_client(settings: &NetworkSettings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .redirect(Policy::limited(settings.max_redirects))
        .connect_timeout(Duration::from_secs(settings.timeout_secs))
        .build()
}
