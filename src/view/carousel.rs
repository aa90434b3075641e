//! One full page of the carousel: cover art with the clip details drawn over
//! its lower edge, then the transport panel and a page indicator

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::model::{ArtworkState, Carousel, Clip, PlaybackState};
use super::artwork::render_artwork;
use super::controls::render_controls;
use super::utils::truncate_string;

const INFO_HEIGHT: u16 = 3;

pub fn render_page(
    frame: &mut Frame,
    area: Rect,
    carousel: &Carousel,
    playback: &PlaybackState,
    artwork: Option<&ArtworkState>,
) {
    let Some(clip) = carousel.current() else {
        let empty = Paragraph::new("No clips to show")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Cover art
            Constraint::Length(3), // Transport
            Constraint::Length(1), // Page indicator
        ])
        .split(area);

    render_artwork(chunks[0], frame.buffer_mut(), artwork);
    render_info(chunks[0], frame.buffer_mut(), clip);
    render_controls(frame, chunks[1], clip, playback);
    render_page_indicator(frame, chunks[2], carousel);
}

/// Clip details over the bottom rows of the art. Only the text cells change;
/// the art around them stays visible but dimmed.
fn render_info(art_area: Rect, buf: &mut Buffer, clip: &Clip) {
    if art_area.height < INFO_HEIGHT {
        return;
    }
    let area = Rect {
        y: art_area.bottom() - INFO_HEIGHT,
        height: INFO_HEIGHT,
        ..art_area
    };
    buf.set_style(area, Style::default().add_modifier(Modifier::DIM));

    let width = area.width.saturating_sub(2) as usize;
    let heart = if clip.is_liked { "♥" } else { "♡" };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_string(&clip.title, width)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" @{}", truncate_string(&clip.handle, width.saturating_sub(1))),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled(format!(" {} ", heart), Style::default().fg(Color::Magenta)),
            Span::styled(format!("{} upvotes", clip.upvote_count), Style::default().fg(Color::Gray)),
        ]),
    ];

    Paragraph::new(lines).render(area, buf);
}

fn render_page_indicator(frame: &mut Frame, area: Rect, carousel: &Carousel) {
    let page = carousel.page();
    let left = if page > 0 { "‹ " } else { "  " };
    let right = if page + 1 < carousel.len() { " ›" } else { "  " };
    let indicator = Paragraph::new(format!("{}{} / {}{}", left, page + 1, carousel.len(), right))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(indicator, area);
}
