use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Client;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;
use crate::core::state::NetworkSettings;

/// Response body as a stream of chunks.
pub type ByteStream = BoxStream<'static, LauncherResult<Bytes>>;

/// Raw GET transport.
///
/// `open` resolves once response headers are in and the status is a
/// success; the body is then pulled chunk by chunk.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, url: &str) -> LauncherResult<ByteStream>;
}

/// `reqwest`-backed transport. Redirect limits and the connect timeout
/// come from the client built in [`build_http_client`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &NetworkSettings) -> LauncherResult<Self> {
        Ok(Self::new(build_http_client(settings)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, url: &str) -> LauncherResult<ByteStream> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(LauncherError::from))
            .boxed())
    }
}
