//! Transport and paging actions

use super::AppController;

impl AppController {
    pub async fn toggle_playback(&self) {
        self.coordinator.toggle_play_pause().await;
    }

    pub async fn skip_back(&self) {
        tracing::debug!(seconds = self.seek_back_secs, "Skipping back");
        self.coordinator.seek_by(-self.seek_back_secs).await;
    }

    pub async fn skip_forward(&self) {
        tracing::debug!(seconds = self.seek_forward_secs, "Skipping forward");
        self.coordinator.seek_by(self.seek_forward_secs).await;
    }

    pub async fn restart_clip(&self) {
        self.coordinator.seek_to(0.0).await;
    }

    /// Jump to `tenths` / 10 of the clip; ignored until the duration is known
    pub async fn jump_to_tenth(&self, tenths: u32) {
        let duration = self.coordinator.state().duration;
        if duration <= 0.0 {
            return;
        }
        self.coordinator.seek_to(duration * f64::from(tenths) / 10.0).await;
    }

    /// Page right and make the newly visible clip current
    pub async fn next_page(&self) {
        if let Some(clip) = self.model.next_page().await {
            self.coordinator.select_clip(&clip.id).await;
            self.prefetch_artwork().await;
        }
    }

    /// Page left and make the newly visible clip current
    pub async fn prev_page(&self) {
        if let Some(clip) = self.model.prev_page().await {
            self.coordinator.select_clip(&clip.id).await;
            self.prefetch_artwork().await;
        }
    }
}
