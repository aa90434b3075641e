//! Cover art prefetch and lookup

use std::sync::Arc;

use super::AppController;
use crate::model::{AppModel, ArtworkLoader, ArtworkState, ArtworkStatus};

/// Loads art for the pages around the visible one.
///
/// The model only records per-URL status; pixels stay in the loader's cache
/// so its cost limit bounds what is kept in memory.
#[derive(Clone)]
pub(crate) struct ArtworkPrefetcher {
    model: Arc<AppModel>,
    loader: ArtworkLoader,
}

impl ArtworkPrefetcher {
    pub(crate) fn new(model: Arc<AppModel>, loader: ArtworkLoader) -> Self {
        Self { model, loader }
    }

    /// Start loading art for the visible page and its neighbours. A URL is
    /// requested again only after it has been forgotten.
    pub(crate) async fn prefetch(&self) {
        for clip in self.model.nearby_clips().await {
            if !self.model.begin_artwork(&clip.image_large_url).await {
                continue;
            }
            let Some(url) = clip.image_url() else {
                tracing::warn!(clip_id = %clip.id, url = %clip.image_large_url, "Invalid cover art URL");
                self.model
                    .set_artwork(&clip.image_large_url, ArtworkStatus::Failed)
                    .await;
                continue;
            };

            let model = self.model.clone();
            let loader = self.loader.clone();
            let key = clip.image_large_url.clone();
            tokio::spawn(async move {
                let status = match loader.fetch_image(&url).await {
                    Ok(_) if loader.cached(&url).await.is_none() => {
                        tracing::warn!(clip_id = %clip.id, "Cover art exceeds the cache budget");
                        ArtworkStatus::Failed
                    }
                    Ok(_) => ArtworkStatus::Ready,
                    Err(e) => {
                        tracing::warn!(clip_id = %clip.id, error = %e, "Cover art unavailable");
                        ArtworkStatus::Failed
                    }
                };
                model.set_artwork(&key, status).await;
            });
        }
    }

    /// Art for the visible page. Art evicted from the cache since it loaded
    /// is requested again and shows as loading meanwhile.
    pub(crate) async fn visible(&self) -> Option<ArtworkState> {
        let clip = self.model.visible_clip().await?;
        match self.model.get_artwork(&clip.image_large_url).await? {
            ArtworkStatus::Loading => Some(ArtworkState::Loading),
            ArtworkStatus::Failed => Some(ArtworkState::Failed),
            ArtworkStatus::Ready => {
                let url = clip.image_url()?;
                if let Some(image) = self.loader.cached(&url).await {
                    return Some(ArtworkState::Ready(image));
                }
                tracing::debug!(clip_id = %clip.id, "Cover art evicted, reloading");
                self.model.forget_artwork(&clip.image_large_url).await;
                self.prefetch().await;
                Some(ArtworkState::Loading)
            }
        }
    }
}

impl AppController {
    pub async fn prefetch_artwork(&self) {
        self.artwork.prefetch().await;
    }

    pub async fn visible_artwork(&self) -> Option<ArtworkState> {
        self.artwork.visible().await
    }
}
