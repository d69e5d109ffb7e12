use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

use crate::theme;

pub fn configure_textarea(textarea: &mut TextArea) {
    // Cursor line highlighting
    textarea.set_cursor_line_style(theme::cursor_line_style());

    // Editor area style — no line number gutter on a page surface
    textarea.set_style(theme::editor_style());

    // Cursor style
    textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

    // Selection style
    textarea.set_selection_style(Style::default().bg(theme::SELECTION));

    // Tab key types a literal tab character, rendered 4 columns wide
    textarea.set_tab_length(4);
    textarea.set_hard_tab_indent(true);
}
