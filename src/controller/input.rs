//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Ctrl-C quits from anywhere, the terminal is in raw mode
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.model.set_should_quit(true).await;
            return Ok(());
        }

        // Help popup swallows everything else
        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                self.model.hide_help_popup().await;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.model.set_should_quit(true).await;
            }
            KeyCode::Char('?') => {
                self.model.show_help_popup().await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.retry_catalog().await;
            }
            // Paging
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
                self.next_page().await;
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
                self.prev_page().await;
            }
            // Transport
            KeyCode::Char(' ') => {
                self.toggle_playback().await;
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.skip_back().await;
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.skip_forward().await;
            }
            KeyCode::Char('0') | KeyCode::Home => {
                self.restart_clip().await;
            }
            KeyCode::Char(digit @ '1'..='9') => {
                if let Some(tenths) = digit.to_digit(10) {
                    self.jump_to_tenth(tenths).await;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
