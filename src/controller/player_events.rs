//! Playback state listener

use super::AppController;

impl AppController {
    /// Follow the coordinator's current clip and page the carousel to it.
    ///
    /// Only changes of the current clip move the carousel, so paging onto a
    /// clip without audio does not snap back to the playing one. The task
    /// holds no coordinator handle; it ends once the last one is dropped.
    pub fn start_playback_listener(&self) {
        let mut updates = self.coordinator.subscribe();
        let model = self.model.clone();
        let artwork = self.artwork.clone();
        tracing::info!("Starting playback state listener");

        tokio::spawn(async move {
            let mut last_clip = updates.borrow_and_update().current_clip_id.clone();
            while updates.changed().await.is_ok() {
                if model.should_quit().await {
                    break;
                }

                let current = updates.borrow_and_update().current_clip_id.clone();
                if current == last_clip {
                    continue;
                }
                if let Some(id) = &current {
                    tracing::debug!(clip_id = %id, "Current clip changed");
                    if model.show_clip(id).await {
                        artwork.prefetch().await;
                    }
                }
                last_clip = current;
            }
            tracing::debug!("Playback state listener stopped");
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::controller::test_support;
    use crate::model::Clip;

    fn clips() -> Vec<Clip> {
        ["a", "b", "c"]
            .iter()
            .map(|id| {
                Clip::new(*id, "t", "h", format!("no-art-{id}"), false, 0)
                    .with_audio_url(format!("https://cdn.example.com/{id}.mp3"))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_carousel_follows_current_clip() {
        let controller = test_support::controller(clips(), 1000).await;
        controller.start_playback_listener();

        controller.coordinator.select_clip("c").await;
        tokio::time::timeout(Duration::from_secs(1), async {
            while controller.model.visible_clip().await.map(|c| c.id).as_deref() != Some("c") {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("carousel never moved to the current clip");
    }

    #[tokio::test]
    async fn test_listener_ends_with_the_coordinator() {
        let controller = test_support::controller(clips(), 1000).await;
        let model = controller.model.clone();
        controller.start_playback_listener();
        assert!(Arc::strong_count(&model) > 2);

        drop(controller);
        tokio::time::timeout(Duration::from_secs(1), async {
            while Arc::strong_count(&model) > 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listener kept the model alive after the coordinator was dropped");
    }
}
