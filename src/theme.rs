use ratatui::style::{Color, Style};

// Base colors — Color::Reset inherits terminal defaults
pub const BG: Color = Color::Reset;
pub const FG: Color = Color::Reset;
pub const BORDER: Color = Color::DarkGray;

// UI elements
pub const BAR_BG: Color = Color::Reset;
pub const SELECTION: Color = Color::Blue;
pub const PAGE_EDGE: Color = Color::DarkGray;

// Link badge
pub const SYNCED: Color = Color::Green;
pub const UNSAVED: Color = Color::Yellow;
pub const OFFLINE: Color = Color::Red;
pub const LOCAL: Color = Color::Gray;

// Status indicators
pub const WARNING: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;

// White for text on colored backgrounds
pub const WHITE: Color = Color::White;

// Pre-built styles
pub fn editor_style() -> Style {
    Style::default()
}

pub fn header_style() -> Style {
    Style::default()
}

pub fn status_style() -> Style {
    Style::default()
}

pub fn cursor_line_style() -> Style {
    Style::default()
}

pub fn page_edge_style() -> Style {
    Style::default().fg(PAGE_EDGE)
}
