//! Main application model with state management

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::clip::Clip;
use super::types::{ArtworkStatus, CatalogState, Carousel, UiState};

/// Main application model containing UI state shared by the controller, the
/// background tasks and the render loop
pub struct AppModel {
    ui_state: Arc<Mutex<UiState>>,
    artwork: Arc<Mutex<HashMap<String, ArtworkStatus>>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            artwork: Arc::new(Mutex::new(HashMap::new())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn catalog_state(&self) -> CatalogState {
        self.ui_state.lock().await.catalog.clone()
    }

    pub async fn set_catalog_loading(&self) {
        self.ui_state.lock().await.catalog = CatalogState::Loading;
    }

    pub async fn set_catalog_failed(&self, message: String) {
        self.ui_state.lock().await.catalog = CatalogState::Failed(message);
    }

    pub async fn set_clips(&self, clips: Vec<Clip>) {
        let mut state = self.ui_state.lock().await;
        state.carousel = Carousel::new(clips);
        state.catalog = CatalogState::Loaded;
    }

    // ========================================================================
    // Carousel
    // ========================================================================

    /// Page right, returning the clip now on screen if the page moved
    pub async fn next_page(&self) -> Option<Clip> {
        self.ui_state.lock().await.carousel.next_page().cloned()
    }

    pub async fn prev_page(&self) -> Option<Clip> {
        self.ui_state.lock().await.carousel.prev_page().cloned()
    }

    pub async fn show_clip(&self, id: &str) -> bool {
        self.ui_state.lock().await.carousel.show_clip(id)
    }

    pub async fn visible_clip(&self) -> Option<Clip> {
        self.ui_state.lock().await.carousel.current().cloned()
    }

    pub async fn nearby_clips(&self) -> Vec<Clip> {
        self.ui_state.lock().await.carousel.nearby().cloned().collect()
    }

    // ========================================================================
    // Artwork
    // ========================================================================

    /// Mark `url` as loading. Returns false if it is already known.
    pub async fn begin_artwork(&self, url: &str) -> bool {
        let mut artwork = self.artwork.lock().await;
        if artwork.contains_key(url) {
            return false;
        }
        artwork.insert(url.to_string(), ArtworkStatus::Loading);
        true
    }

    pub async fn set_artwork(&self, url: &str, status: ArtworkStatus) {
        self.artwork.lock().await.insert(url.to_string(), status);
    }

    pub async fn get_artwork(&self, url: &str) -> Option<ArtworkStatus> {
        self.artwork.lock().await.get(url).copied()
    }

    /// Forget `url` so the next prefetch requests it again
    pub async fn forget_artwork(&self, url: &str) {
        self.artwork.lock().await.remove(url);
    }

    // ========================================================================
    // Help popup
    // ========================================================================

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips() -> Vec<Clip> {
        ["a", "b"]
            .iter()
            .map(|id| Clip::new(*id, "t", "h", format!("https://img/{id}"), false, 0))
            .collect()
    }

    #[tokio::test]
    async fn test_set_clips_marks_catalog_loaded() {
        let model = AppModel::new();
        assert_eq!(model.catalog_state().await, CatalogState::Loading);

        model.set_clips(clips()).await;
        assert_eq!(model.catalog_state().await, CatalogState::Loaded);
        assert_eq!(model.visible_clip().await.map(|c| c.id), Some("a".to_string()));
    }

    #[tokio::test]
    async fn test_artwork_is_only_requested_once() {
        let model = AppModel::new();
        assert!(model.begin_artwork("https://img/a").await);
        assert!(!model.begin_artwork("https://img/a").await);

        model.set_artwork("https://img/a", ArtworkStatus::Failed).await;
        assert_eq!(model.get_artwork("https://img/a").await, Some(ArtworkStatus::Failed));
        assert!(model.get_artwork("https://img/b").await.is_none());

        model.forget_artwork("https://img/a").await;
        assert!(model.begin_artwork("https://img/a").await);
    }
}
