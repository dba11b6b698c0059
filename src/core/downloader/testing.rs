// In-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};

use crate::core::error::{LauncherError, LauncherResult};

use super::transport::{ByteStream, Transport};

#[derive(Debug, Clone)]
pub(crate) enum MockResponse {
    /// Success with the given body chunks.
    Body(Vec<Vec<u8>>),
    /// Non-success status before any body is sent.
    Status(u16),
    /// Sends the chunks, then the connection drops.
    FailAfter(Vec<Vec<u8>>),
    /// Headers arrive, then the body never progresses.
    Stall,
}

#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(self, url: &str, body: &[u8]) -> Self {
        self.with_route(url, MockResponse::Body(vec![body.to_vec()]))
    }

    pub(crate) fn with_route(self, url: &str, response: MockResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn chunks(parts: Vec<Vec<u8>>) -> Vec<LauncherResult<Bytes>> {
    parts.into_iter().map(|p| Ok(Bytes::from(p))).collect()
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, url: &str) -> LauncherResult<ByteStream> {
        self.requests.lock().unwrap().push(url.to_string());
        let route = self.routes.lock().unwrap().get(url).cloned();

        match route {
            Some(MockResponse::Body(parts)) => Ok(stream::iter(chunks(parts)).boxed()),
            Some(MockResponse::FailAfter(parts)) => {
                let mut items = chunks(parts);
                items.push(Err(LauncherError::Other("connection reset".into())));
                Ok(stream::iter(items).boxed())
            }
            Some(MockResponse::Stall) => Ok(stream::pending().boxed()),
            Some(MockResponse::Status(status)) => Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status,
            }),
            None => Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
