//! Cover art rendering
//!
//! Each terminal cell shows two image pixels: the upper one as the
//! foreground of a `▀` glyph and the lower one as its background.

use image::{imageops::FilterType, DynamicImage};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::model::ArtworkState;

const UPPER_HALF_BLOCK: char = '▀';

pub struct CoverArt<'a> {
    image: &'a DynamicImage,
}

impl<'a> CoverArt<'a> {
    pub fn new(image: &'a DynamicImage) -> Self {
        Self { image }
    }
}

impl Widget for CoverArt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let pixels = self
            .image
            .resize_to_fill(area.width as u32, area.height as u32 * 2, FilterType::Nearest)
            .to_rgb8();

        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (col as u32, row as u32 * 2);
                let (Some(top), Some(bottom)) =
                    (pixels.get_pixel_checked(x, y), pixels.get_pixel_checked(x, y + 1))
                else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(UPPER_HALF_BLOCK)
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

/// Draw the art for a page, or a placeholder while it is missing
pub fn render_artwork(area: Rect, buf: &mut Buffer, artwork: Option<&ArtworkState>) {
    match artwork {
        Some(ArtworkState::Ready(image)) => CoverArt::new(image).render(area, buf),
        Some(ArtworkState::Failed) => placeholder("artwork unavailable", Color::DarkGray).render(area, buf),
        Some(ArtworkState::Loading) | None => placeholder("loading artwork…", Color::Gray).render(area, buf),
    }
}

fn placeholder(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
}
