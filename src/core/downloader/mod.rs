mod client;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{is_complete, ContentFetcher, FetchOutcome, FetchSettings};
pub(crate) use client::staging_path;
pub use transport::{ByteStream, HttpTransport, Transport};
