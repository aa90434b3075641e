//! Catalog loading

use super::AppController;
use crate::model::CatalogState;

impl AppController {
    /// Fetch the clip list, hand it to the carousel and the coordinator.
    ///
    /// A failure leaves the model in `CatalogState::Failed`, from which the
    /// user can retry.
    pub async fn load_catalog(&self) {
        self.model.set_catalog_loading().await;
        tracing::info!(url = self.catalog.url(), "Loading catalog");

        match self.catalog.fetch_clips().await {
            Ok(clips) => {
                tracing::info!(clips = clips.len(), "Catalog loaded");
                self.model.set_clips(clips.clone()).await;
                self.coordinator.set_clips(clips).await;
                self.prefetch_artwork().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Catalog load failed");
                self.model.set_catalog_failed(Self::format_error(&e)).await;
            }
        }
    }

    /// Retry a failed load in the background; ignored in any other state
    pub async fn retry_catalog(&self) {
        if !matches!(self.model.catalog_state().await, CatalogState::Failed(_)) {
            return;
        }
        tracing::info!("Retrying catalog load");
        self.model.set_catalog_loading().await;
        let controller = self.clone();
        tokio::spawn(async move {
            controller.load_catalog().await;
        });
    }
}
