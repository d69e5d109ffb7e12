use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

/// Link badge shown at the right edge of the header bar.
pub struct Badge {
    pub label: &'static str,
    pub color: ratatui::style::Color,
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    dirty: bool,
    badge: &Badge,
    renaming: bool,
    rename_buf: &str,
    rename_cursor: usize,
) {
    // Left side: document title (or rename input) + dirty indicator
    let left_spans = if renaming {
        render_rename_input(rename_buf, rename_cursor, dirty)
    } else {
        render_title(title, dirty)
    };

    let badge_span = Span::styled(
        format!(" {} ", badge.label),
        Style::default()
            .fg(theme::WHITE)
            .bg(badge.color)
            .add_modifier(Modifier::BOLD),
    );
    let badge_width = badge_span.width() as u16;

    let chunks =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(badge_width)]).split(area);

    // Fill background
    let bg = Paragraph::new("").style(theme::header_style());
    frame.render_widget(bg, area);

    let left = Paragraph::new(Line::from(left_spans));
    frame.render_widget(left, chunks[0]);

    let right = Paragraph::new(Line::from(badge_span));
    frame.render_widget(right, chunks[1]);
}

fn render_title<'a>(title: &str, dirty: bool) -> Vec<Span<'a>> {
    let mut spans = vec![Span::styled(format!("  {}", title), theme::header_style())];
    if dirty {
        spans.push(Span::styled(
            " \u{2022}",
            Style::default().fg(theme::WARNING).bg(theme::BAR_BG),
        ));
    }
    spans
}

fn render_rename_input<'a>(rename_buf: &str, rename_cursor: usize, dirty: bool) -> Vec<Span<'a>> {
    let mut spans = vec![Span::styled("  ", theme::header_style())];

    // Text before cursor
    let before = &rename_buf[..rename_cursor];
    if !before.is_empty() {
        spans.push(Span::styled(
            before.to_string(),
            Style::default().fg(theme::WHITE).bg(theme::BAR_BG),
        ));
    }

    // Cursor character (or space if at end)
    let cursor_char = if rename_cursor < rename_buf.len() {
        rename_buf[rename_cursor..rename_cursor + 1].to_string()
    } else {
        " ".to_string()
    };
    spans.push(Span::styled(
        cursor_char,
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
    ));

    // Text after cursor
    if rename_cursor < rename_buf.len() {
        let after = &rename_buf[rename_cursor + 1..];
        if !after.is_empty() {
            spans.push(Span::styled(
                after.to_string(),
                Style::default().fg(theme::WHITE).bg(theme::BAR_BG),
            ));
        }
    }

    if dirty {
        spans.push(Span::styled(
            " \u{2022}",
            Style::default().fg(theme::WARNING).bg(theme::BAR_BG),
        ));
    }

    spans
}
