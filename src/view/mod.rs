//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (time formatting, truncation, centring)
//! - `artwork`: Half-block cover art widget and its placeholders
//! - `carousel`: One full clip page with details and page indicator
//! - `controls`: Transport panel with the progress gauge
//! - `overlays`: Modal overlays (loading, catalog error, help)

mod utils;
mod artwork;
mod carousel;
mod controls;
mod overlays;

use ratatui::Frame;

use crate::model::{ArtworkState, CatalogState, PlaybackState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        playback: &PlaybackState,
        artwork: Option<&ArtworkState>,
    ) {
        let area = frame.area();

        match &ui_state.catalog {
            CatalogState::Loading => overlays::render_loading(frame),
            CatalogState::Failed(message) => overlays::render_catalog_error(frame, message),
            CatalogState::Loaded => {
                carousel::render_page(frame, area, &ui_state.carousel, playback, artwork);
            }
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::model::{Carousel, Clip};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(ui_state: &UiState, playback: &PlaybackState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        terminal
            .draw(|frame| AppView::render(frame, ui_state, playback, Some(&ArtworkState::Loading)))
            .unwrap();
        screen_text(&terminal)
    }

    fn loaded_state() -> UiState {
        let clips = vec![
            Clip::new("a", "First Light", "dawnsinger", "https://img/a.jpg", true, 42)
                .with_audio_url("https://cdn/a.mp3"),
            Clip::new("b", "Second Wind", "breeze", "https://img/b.jpg", false, 7),
        ];
        UiState {
            catalog: CatalogState::Loaded,
            carousel: Carousel::new(clips),
            show_help_popup: false,
        }
    }

    #[test]
    fn test_loading_overlay() {
        let text = draw(&UiState::default(), &PlaybackState::default());
        assert!(text.contains("Loading clips"));
    }

    #[test]
    fn test_error_overlay_offers_retry() {
        let ui_state = UiState {
            catalog: CatalogState::Failed("Could not reach the server.".to_string()),
            ..Default::default()
        };
        let text = draw(&ui_state, &PlaybackState::default());
        assert!(text.contains("Could not reach the server."));
        assert!(text.contains("retry"));
    }

    #[test]
    fn test_page_shows_clip_and_progress() {
        let playback = PlaybackState {
            current_time: 65.0,
            duration: 125.0,
            is_playing: true,
            current_clip_id: Some("a".to_string()),
        };
        let text = draw(&loaded_state(), &playback);
        assert!(text.contains("First Light"));
        assert!(text.contains("@dawnsinger"));
        assert!(text.contains("42 upvotes"));
        assert!(text.contains("1:05 / -1:00"));
        assert!(text.contains("Playing"));
        assert!(text.contains("1 / 2"));
    }

    #[test]
    fn test_page_without_audio() {
        let mut ui_state = loaded_state();
        ui_state.carousel.next_page();
        let playback = PlaybackState {
            current_clip_id: Some("a".to_string()),
            ..Default::default()
        };
        let text = draw(&ui_state, &playback);
        assert!(text.contains("Second Wind"));
        assert!(text.contains("no audio for this clip"));
    }

    #[test]
    fn test_unknown_duration_shows_placeholder_time() {
        let playback = PlaybackState {
            current_clip_id: Some("a".to_string()),
            ..Default::default()
        };
        let text = draw(&loaded_state(), &playback);
        assert!(text.contains("0:00 / --:--"));
        assert!(text.contains("Paused"));
    }

    #[test]
    fn test_help_popup_on_top() {
        let mut ui_state = loaded_state();
        ui_state.show_help_popup = true;
        let text = draw(&ui_state, &PlaybackState::default());
        assert!(text.contains("Forward 30 seconds"));
    }
}
