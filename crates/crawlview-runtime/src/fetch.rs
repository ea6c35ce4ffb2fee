//! Remote document access.
//!
//! Everything that leaves the process goes through [`Fetcher`]: JSON
//! documents (archive index, tree API, summary, viewer config) and the
//! dataset byte stream itself. [`HttpClient`] is the reqwest-backed
//! implementation; tests use [`crate::memory::MemoryFetcher`].

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::pin::Pin;
use tokio::io::AsyncReadExt;
use url::Url;

pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

const FILE_CHUNK_SIZE: usize = 64 * 1024;

/// An open byte stream plus its declared length, if any
pub struct OpenedStream {
    pub stream: ByteStream,
    pub total_bytes: Option<u64>,
}

impl std::fmt::Debug for OpenedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedStream")
            .field("total_bytes", &self.total_bytes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a JSON document; non-success statuses are errors
    async fn get_json(&self, url: &Url) -> Result<Value>;

    /// GET a body as a byte stream
    async fn get_stream(&self, url: &Url) -> Result<OpenedStream>;
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("crawlview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        tracing::debug!(%url, "GET json");
        let response = self.send(url).await?;
        Ok(response.json().await?)
    }

    async fn get_stream(&self, url: &Url) -> Result<OpenedStream> {
        tracing::debug!(%url, "GET stream");
        let response = self.send(url).await?;
        let total_bytes = response.content_length();
        let stream = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();
        Ok(OpenedStream {
            stream,
            total_bytes,
        })
    }
}

/// Stream a local file in fixed-size chunks
pub async fn open_file_stream(path: &Path) -> Result<OpenedStream> {
    let file = tokio::fs::File::open(path).await?;
    let total_bytes = file.metadata().await.ok().map(|m| m.len());

    let stream = futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; FILE_CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), file)))
    })
    .boxed();

    Ok(OpenedStream {
        stream,
        total_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_stream_yields_whole_content() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        let content = "x".repeat(FILE_CHUNK_SIZE * 2 + 17);
        file.write_all(content.as_bytes())?;

        let opened = open_file_stream(file.path()).await?;
        assert_eq!(opened.total_bytes, Some(content.len() as u64));

        let chunks: Vec<Bytes> = opened.stream.try_collect().await?;
        let joined: Vec<u8> = chunks.concat();
        assert_eq!(joined, content.as_bytes());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = open_file_stream(Path::new("/nonexistent/crawlview/urls.jsonl"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
