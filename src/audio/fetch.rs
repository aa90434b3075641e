//! Clip audio download

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use lru::LruCache;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

/// Downloads whole clip files and remembers the last few.
///
/// The player and the duration probe both read the current clip, so the
/// second reader usually gets the buffer without a second request.
#[derive(Clone)]
pub struct AudioFetcher {
    http: Client,
    recent: Arc<Mutex<LruCache<String, Bytes>>>,
}

impl AudioFetcher {
    pub fn new(http: Client, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            http,
            recent: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub async fn fetch(&self, url: &Url) -> Result<Bytes> {
        if let Some(bytes) = self.recent.lock().await.get(url.as_str()) {
            return Ok(bytes.clone());
        }

        tracing::debug!(url = %url, "Downloading clip audio");
        let bytes = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?
            .bytes()
            .await
            .context("failed to read audio body")?;
        tracing::debug!(url = %url, size = bytes.len(), "Downloaded clip audio");

        self.recent.lock().await.put(url.to_string(), bytes.clone());
        Ok(bytes)
    }
}
