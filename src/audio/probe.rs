//! Duration lookup for queued clips

use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use futures::future::BoxFuture;
use reqwest::Url;
use rodio::{Decoder, Source};

use super::fetch::AudioFetcher;
use crate::playback::MediaProbe;

/// Reads the total duration the decoder reports for a clip
pub struct HttpMediaProbe {
    fetcher: AudioFetcher,
}

impl HttpMediaProbe {
    pub fn new(fetcher: AudioFetcher) -> Self {
        Self { fetcher }
    }
}

impl MediaProbe for HttpMediaProbe {
    fn load_duration(&self, url: Url) -> BoxFuture<'static, Result<f64>> {
        let fetcher = self.fetcher.clone();
        Box::pin(async move {
            let bytes = fetcher.fetch(&url).await?;
            let duration = tokio::task::spawn_blocking(move || {
                Decoder::new(Cursor::new(bytes)).map(|decoder| decoder.total_duration())
            })
            .await
            .context("probe task panicked")?
            .context("cannot read audio metadata")?;

            duration
                .map(|d| d.as_secs_f64())
                .ok_or_else(|| anyhow!("container does not declare a duration"))
        })
    }
}
