//! Controller module - Application logic and event handling
//!
//! - `input`: Key event handling
//! - `playback`: Transport and paging actions
//! - `catalog`: Initial catalog load and retry
//! - `artwork`: Cover art prefetch for the pages around the visible one
//! - `player_events`: Keeps the carousel on the coordinator's current clip

mod artwork;
mod catalog;
mod input;
mod playback;
mod player_events;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::model::{AppModel, ArtworkLoader, CatalogClient};
use crate::playback::PlaybackCoordinator;
use artwork::ArtworkPrefetcher;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) coordinator: PlaybackCoordinator,
    catalog: CatalogClient,
    artwork: ArtworkPrefetcher,
    seek_back_secs: f64,
    seek_forward_secs: f64,
}

impl AppController {
    pub fn new(
        model: Arc<AppModel>,
        coordinator: PlaybackCoordinator,
        catalog: CatalogClient,
        artwork: ArtworkLoader,
        config: &AppConfig,
    ) -> Self {
        Self {
            artwork: ArtworkPrefetcher::new(model.clone(), artwork),
            model,
            coordinator,
            catalog,
            seek_back_secs: config.seek_back_secs,
            seek_forward_secs: config.seek_forward_secs,
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        for cause in error.chain() {
            if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
                if e.is_timeout() {
                    return "The catalog took too long to answer.".to_string();
                }
                if e.is_connect() {
                    return "Could not reach the catalog. Check your connection.".to_string();
                }
                if let Some(status) = e.status() {
                    return format!("The catalog answered with HTTP {}.", status.as_u16());
                }
            }
            if cause.downcast_ref::<serde_json::Error>().is_some() {
                return "The catalog sent data we could not read.".to_string();
            }
        }
        format!("Error: {}", error)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use futures::future::BoxFuture;
    use reqwest::Url;

    use super::*;
    use crate::model::Clip;
    use crate::playback::{MediaProbe, PlayerFactory, PlayerItem, QueuePlayer};

    /// Remembers its queue head and the last seek, plays nothing
    #[derive(Default)]
    struct SilentPlayer {
        head: Option<PlayerItem>,
        position: Duration,
    }

    impl QueuePlayer for SilentPlayer {
        fn replace_queue(&mut self, items: Vec<PlayerItem>) {
            self.head = items.into_iter().next();
            self.position = Duration::ZERO;
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek(&mut self, position: Duration) {
            self.position = position;
        }
        fn position(&self) -> Duration {
            self.position
        }
        fn current_item(&self) -> Option<&PlayerItem> {
            self.head.as_ref()
        }
        fn current_duration(&self) -> Option<Duration> {
            None
        }
        fn take_played_to_end(&mut self) -> bool {
            false
        }
    }

    /// Every clip is 100 seconds long
    struct FixedProbe;

    impl MediaProbe for FixedProbe {
        fn load_duration(&self, _url: Url) -> BoxFuture<'static, anyhow::Result<f64>> {
            Box::pin(async { Ok(100.0) })
        }
    }

    /// Controller over `clips` with a silent player and an artwork cache of
    /// `cost_limit` bytes. The catalog endpoint is never contacted.
    pub(crate) async fn controller(clips: Vec<Clip>, cost_limit: usize) -> AppController {
        let http = reqwest::Client::new();
        let factory: PlayerFactory = Box::new(|| Box::new(SilentPlayer::default()));
        let coordinator = PlaybackCoordinator::new(factory, Arc::new(FixedProbe), Duration::from_secs(3600));
        let model = Arc::new(AppModel::new());
        let controller = AppController::new(
            model.clone(),
            coordinator.clone(),
            CatalogClient::new(http.clone(), "http://127.0.0.1:9/api/songs"),
            ArtworkLoader::new(http, cost_limit),
            &AppConfig::default(),
        );

        model.set_clips(clips.clone()).await;
        coordinator.set_clips(clips).await;
        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_format_error_recognises_decode_failures() {
        let err = serde_json::from_str::<u32>("nope")
            .context("catalog response is not a valid songs page")
            .unwrap_err();
        assert_eq!(AppController::format_error(&err), "The catalog sent data we could not read.");
    }

    #[test]
    fn test_format_error_falls_back_to_message() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(AppController::format_error(&err), "Error: something odd");
    }
}
