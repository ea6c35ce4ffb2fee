//! In-memory [`Fetcher`] for tests and offline use.
//!
//! Responses are registered per URL. Unknown URLs answer 404, so a fake
//! only needs the documents a scenario actually serves. Every request is
//! recorded in order.

use crate::fetch::{Fetcher, OpenedStream};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use url::Url;

#[derive(Debug, Clone)]
enum Payload {
    Json(Value),
    Body { chunks: Vec<Bytes>, declared: Option<u64> },
}

#[derive(Debug, Clone)]
enum Canned {
    Serve(Payload),
    Status(u16),
}

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: RwLock<HashMap<String, Canned>>,
    requests: RwLock<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_json(&self, url: &Url, value: Value) {
        self.insert(url, Canned::Serve(Payload::Json(value)));
    }

    /// Serve `body` as a stream split into `chunk_size` pieces
    pub fn insert_body(&self, url: &Url, body: &[u8], chunk_size: usize) {
        let chunks = body
            .chunks(chunk_size.max(1))
            .map(Bytes::copy_from_slice)
            .collect();
        self.insert(
            url,
            Canned::Serve(Payload::Body {
                chunks,
                declared: Some(body.len() as u64),
            }),
        );
    }

    pub fn insert_status(&self, url: &Url, status: u16) {
        self.insert(url, Canned::Status(status));
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn insert(&self, url: &Url, canned: Canned) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(url.to_string(), canned);
        }
    }

    fn lookup(&self, url: &Url) -> Result<Payload> {
        if let Ok(mut requests) = self.requests.write() {
            requests.push(url.to_string());
        }

        let responses = self
            .responses
            .read()
            .map_err(|e| Error::InvalidOperation(format!("lock poisoned: {e}")))?;
        match responses.get(url.as_str()).cloned() {
            Some(Canned::Status(status)) => Err(Error::Status {
                url: url.to_string(),
                status,
            }),
            Some(Canned::Serve(payload)) => Ok(payload),
            None => Err(Error::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn get_json(&self, url: &Url) -> Result<Value> {
        match self.lookup(url)? {
            Payload::Json(value) => Ok(value),
            Payload::Body { chunks, .. } => Ok(serde_json::from_slice(&chunks.concat())?),
        }
    }

    async fn get_stream(&self, url: &Url) -> Result<OpenedStream> {
        let (chunks, total_bytes) = match self.lookup(url)? {
            Payload::Body { chunks, declared } => (chunks, declared),
            Payload::Json(value) => {
                let body = serde_json::to_vec(&value)?;
                let len = body.len() as u64;
                (vec![Bytes::from(body)], Some(len))
            }
        };

        let stream = futures::stream::iter(chunks.into_iter().map(Ok::<Bytes, std::io::Error>)).boxed();
        Ok(OpenedStream {
            stream,
            total_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let fetcher = MemoryFetcher::new();
        let err = fetcher.get_json(&url("https://x.hk/a.json")).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert_eq!(fetcher.requests(), vec!["https://x.hk/a.json".to_string()]);
    }

    #[tokio::test]
    async fn test_body_streams_in_chunks() -> Result<()> {
        let fetcher = MemoryFetcher::new();
        let u = url("https://x.hk/urls.jsonl");
        fetcher.insert_body(&u, b"{\"url\":\"a\"}\n", 4);

        let opened = fetcher.get_stream(&u).await?;
        assert_eq!(opened.total_bytes, Some(12));
        let chunks: Vec<Bytes> = opened.stream.try_collect().await?;
        assert_eq!(chunks.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_registered_status() {
        let fetcher = MemoryFetcher::new();
        let u = url("https://x.hk/index.json");
        fetcher.insert_status(&u, 500);
        fetcher.insert_json(&url("https://x.hk/other.json"), json!({}));

        let err = fetcher.get_json(&u).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500 for https://x.hk/index.json");
    }
}
