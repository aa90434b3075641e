//! Overlay rendering (catalog loading, catalog error, help popup)

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::utils::centered_rect;

pub fn render_loading(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 30, 3);
    frame.render_widget(Clear, popup_area);

    let loading = Paragraph::new("Loading clips…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(loading, popup_area);
}

pub fn render_catalog_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(2).max(1) as usize;
    let error_line_count = message.chars().count().div_ceil(inner_width) as u16;
    // borders + message + blank + hint
    let popup_height = 4 + error_line_count.max(1);
    let popup_area = centered_rect(area, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" retry   "),
            Span::styled("q", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
    ];

    let error_widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Could not load clips ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = [
        ("", "── Browse ──"),
        ("← / h", "Previous clip"),
        ("→ / l", "Next clip"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("B", "Back 15 seconds"),
        ("F", "Forward 30 seconds"),
        ("0", "Restart clip"),
        ("1 - 9", "Jump to 10% - 90%"),
        ("", ""),
        ("", "── General ──"),
        ("R", "Retry loading clips"),
        ("?", "Toggle this help"),
        ("Q / Esc", "Quit"),
    ];

    let popup_area = centered_rect(frame.area(), 46, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^42}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>12}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
