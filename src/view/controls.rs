//! Transport panel: play state, progress gauge and times

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::model::{Clip, PlaybackState};
use super::utils::format_time;

pub fn render_controls(frame: &mut Frame, area: Rect, clip: &Clip, playback: &PlaybackState) {
    let is_current = playback.current_clip_id.as_deref() == Some(clip.id.as_str());

    // The coordinator only queues clips that have audio
    if !is_current {
        let idle = Paragraph::new(" no audio for this clip")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(idle, area);
        return;
    }

    let status = if playback.is_playing { " ▶ Playing " } else { " ⏸  Paused " };
    let remaining = if playback.duration > 0.0 {
        format!("-{}", format_time(playback.remaining()))
    } else {
        format_time(f64::NAN)
    };
    let time_str = format!("{} / {}", format_time(playback.current_time), remaining);
    let hints = " space play/pause | b -15s | f +30s | 0 restart ";

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status)
                .title_bottom(Line::from(hints).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
