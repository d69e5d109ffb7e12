use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

pub struct StatusInfo<'a> {
    pub line: usize,
    pub col: usize,
    pub message: &'a str,
    pub word_count: usize,
    pub page: usize,
    pub page_count: usize,
    pub zoom_percent: u16,
    /// Durability tip derived from the link state ("saved", "unsaved
    /// changes", "not linked", "local only").
    pub save_tip: &'a str,
}

pub fn render(frame: &mut Frame, area: Rect, info: StatusInfo) {
    // Fill the entire status bar background
    let bg = Paragraph::new("").style(theme::status_style());
    frame.render_widget(bg, area);

    let chunks = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ])
    .split(area);

    // Left: Ln/Col
    let left = Paragraph::new(Line::from(Span::styled(
        format!("  Ln {}, Col {}", info.line, info.col),
        theme::status_style(),
    )));
    frame.render_widget(left, chunks[0]);

    // Center: status message
    if !info.message.is_empty() {
        let center = Paragraph::new(Line::from(Span::styled(
            info.message.to_string(),
            theme::status_style(),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(center, chunks[1]);
    }

    // Right: words, page position, zoom, durability tip
    let right = Paragraph::new(Line::from(Span::styled(
        format!(
            "{} words | Page {}/{} | {}% | {}  ",
            info.word_count, info.page, info.page_count, info.zoom_percent, info.save_tip
        ),
        theme::status_style(),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(right, chunks[2]);
}
