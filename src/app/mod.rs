use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use tui_textarea::{CursorMove, Input, TextArea};

use crate::components::{editor, header, status};
use crate::export;
use crate::geometry::{self, PageGeometry};
use crate::link::LinkState;
use crate::protocol::DEFAULT_TITLE;
use crate::store::TextEncoding;
use crate::sync::{RemoteStore, SyncClient, SyncEvent};
use crate::theme;

/// How long status bar messages stay visible before auto-clearing.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Lines to scroll per unmodified mouse wheel tick.
const SCROLL_LINES: u16 = 3;

/// Maximum time between clicks to count as multi-click (double/triple).
const MULTI_CLICK_MS: u64 = 500;

/// Text columns of the page surface at zoom = 1.
pub const PAGE_TEXT_WIDTH: u16 = 72;

/// Narrowest the zoomed page frame may render (borders included).
const MIN_PAGE_FRAME_WIDTH: u16 = 24;

/// Direction for timer-based drag auto-scroll at viewport edges.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragAutoScroll {
    Up,
    Down,
}

pub struct App<'a> {
    // --- Core state ---
    pub title: String,
    pub textarea: TextArea<'a>,
    /// Whether the buffer is bound to a remote document, and whether it
    /// has diverged from the last persisted content.
    pub link: LinkState,
    pub geometry: PageGeometry,
    pub should_quit: bool,

    // --- Persistence ---
    /// None in the standalone variant (manual export only).
    sync: Option<SyncClient>,
    encoding: TextEncoding,

    // --- Status bar ---
    pub status_message: String,
    pub status_time: Option<Instant>,

    // --- Interrupting notice (save failures only) ---
    pub notice: Option<String>,

    // --- Title rename mode (Ctrl+T or click title) ---
    pub renaming: bool,
    pub rename_buf: String,
    pub rename_cursor: usize,

    // --- Help modal (F1) ---
    pub show_help: bool,

    // --- Quit confirmation when content is not durable ---
    quit_armed: bool,

    // --- Internal tracking ---
    /// Cached page text rect from last render (used for mouse hit-testing).
    content_area: Rect,
    /// Tracks tui-textarea's scroll position for mouse click → buffer position math.
    editor_scroll_top: u16,
    /// True while left mouse button is held down for drag selection.
    mouse_dragging: bool,
    /// When set, tick() auto-scrolls the viewport in this direction and extends
    /// the selection — triggered when dragging at or beyond viewport edges.
    drag_auto_scroll: Option<DragAutoScroll>,
    /// Timestamp of last left-click in content area, for double/triple-click detection.
    last_click_time: Option<Instant>,
    /// Terminal position of last click, for multi-click detection.
    last_click_pos: (u16, u16),
    /// Click count (1=single, 2=double, 3=triple), resets on timeout or position change.
    click_count: u8,
}

/// Classifies a character for word-boundary detection (double-click selection).
/// Same class = same "word". Classes: 0=word, 1=whitespace, 2=punctuation.
fn char_class(c: char) -> u8 {
    if c.is_alphanumeric() || c == '_' {
        0
    } else if c.is_whitespace() {
        1
    } else {
        2
    }
}

impl<'a> App<'a> {
    /// Standalone session: edits live in memory only, Ctrl+S exports a
    /// text artifact. The link never leaves `Unlinked`.
    pub fn standalone(title: String, content: String, encoding: TextEncoding) -> Self {
        let mut app = Self::empty(title, encoding);
        app.textarea = Self::build_textarea(&content);
        app.geometry
            .sync_page_height(geometry::natural_height(app.textarea.lines().len()));
        app.status_message =
            "F1: help | Ctrl+S: export | Ctrl+T: rename | Ctrl+Q: quit".to_string();
        app.status_time = Some(Instant::now());
        app
    }

    /// Networked session: bound to a remote store. Dispatches the initial
    /// load immediately; the link stays `Unlinked` until it succeeds.
    pub fn networked(remote: Arc<dyn RemoteStore>) -> Self {
        let mut app = Self::empty(DEFAULT_TITLE.to_string(), TextEncoding::Utf8);
        let mut sync = SyncClient::new(remote);
        sync.request_load();
        app.sync = Some(sync);
        app.status_message = "F1: help | Ctrl+S: save | Ctrl+T: rename | Ctrl+Q: quit".to_string();
        app.status_time = Some(Instant::now());
        app
    }

    fn empty(title: String, encoding: TextEncoding) -> Self {
        Self {
            title,
            textarea: Self::build_textarea(""),
            link: LinkState::Unlinked,
            geometry: PageGeometry::new(),
            should_quit: false,
            sync: None,
            encoding,
            status_message: String::new(),
            status_time: None,
            notice: None,
            renaming: false,
            rename_buf: String::new(),
            rename_cursor: 0,
            show_help: false,
            quit_armed: false,
            content_area: Rect::default(),
            editor_scroll_top: 0,
            mouse_dragging: false,
            drag_auto_scroll: None,
            last_click_time: None,
            last_click_pos: (0, 0),
            click_count: 0,
        }
    }

    fn build_textarea(content: &str) -> TextArea<'static> {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(String::from).collect()
        };
        let mut textarea = TextArea::new(lines);
        editor::configure_textarea(&mut textarea);
        textarea
    }

    /// Returns the full editor content as a single string.
    pub fn textarea_content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_networked(&self) -> bool {
        self.sync.is_some()
    }

    pub fn sync_in_flight(&self) -> bool {
        self.sync.as_ref().is_some_and(SyncClient::in_flight)
    }

    // ─── Tick / timers ───────────────────────────────────────────────────

    /// Called every 100ms from the main loop. Drains completed sync
    /// operations, runs the poll scheduler, and handles timer-based
    /// state cleanup.
    pub fn tick(&mut self) {
        let events = match &mut self.sync {
            Some(sync) => sync.tick(Instant::now(), &mut self.link),
            None => Vec::new(),
        };
        for event in events {
            self.apply_sync_event(event);
        }

        // Timer-based drag auto-scroll: when the mouse is held at or beyond
        // the viewport edge, keep scrolling and extending the selection each tick.
        if self.mouse_dragging {
            if let Some(direction) = self.drag_auto_scroll {
                match direction {
                    DragAutoScroll::Up => {
                        self.textarea.move_cursor(CursorMove::Up);
                    }
                    DragAutoScroll::Down => {
                        self.textarea.move_cursor(CursorMove::Down);
                    }
                }
            }
        }

        // Auto-clear status messages after STATUS_DURATION
        if let Some(time) = self.status_time {
            if time.elapsed() >= STATUS_DURATION {
                self.status_message.clear();
                self.status_time = None;
            }
        }
    }

    /// Blocks until the in-flight sync operation (if any) completes and
    /// applies its outcome. Called on quit so an acknowledged save is
    /// never abandoned mid-flight; tests use it for determinism.
    pub fn settle_sync(&mut self) {
        let events = match &mut self.sync {
            Some(sync) => sync.settle(&mut self.link),
            None => Vec::new(),
        };
        for event in events {
            self.apply_sync_event(event);
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Top-level event handler. Dispatches to key, mouse, or paste handlers.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Bracketed paste: terminal sends entire clipboard as one event
            // (enabled via EnableBracketedPaste in main.rs)
            Event::Paste(text) => self.handle_paste(text),
            Event::Resize(_, _) => {} // ratatui handles resize
            _ => {}
        }
    }

    /// Counts the total number of words in the editor.
    pub fn word_count(&self) -> usize {
        self.textarea
            .lines()
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }

    /// Runs after every content mutation, in order: link reclassification
    /// against the last-saved snapshot, then the geometry re-sync (which
    /// reads the latest buffer state).
    fn update_after_edit(&mut self) {
        let content = self.textarea_content();
        if let Some(sync) = &self.sync {
            sync.reclassify(&content, &mut self.link);
        }
        self.geometry
            .sync_page_height(geometry::natural_height(self.textarea.lines().len()));
    }

    fn apply_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::DocumentLoaded { content, title } => {
                self.replace_document(content, title);
            }
            SyncEvent::DocumentSaved { content, title } => {
                self.replace_document(content, title);
                if self.link.is_linked() {
                    self.set_status("Saved");
                } else {
                    // The write went through but the server would not call
                    // it persisted.
                    self.set_status("Not persisted by server");
                }
            }
            SyncEvent::SaveFailed(reason) => {
                self.notice = Some(format!(
                    "Save failed: {reason}\n\nThe document is no longer linked to the store.\nYour text is still in this window.",
                ));
            }
        }
    }

    /// Applies server-reported content and title to the session. The
    /// cursor is restored (clamped to the new bounds) and the scroll
    /// position is left where it was, so an out-of-band reload never
    /// visibly jumps the viewport.
    fn replace_document(&mut self, content: String, title: String) {
        let (row, col) = self.textarea.cursor();
        self.textarea = Self::build_textarea(&content);
        let max_row = self.textarea.lines().len().saturating_sub(1);
        let target_row = row.min(max_row);
        let max_col = self.textarea.lines().get(target_row).map_or(0, |l| l.len());
        self.textarea.move_cursor(CursorMove::Jump(
            target_row as u16,
            col.min(max_col) as u16,
        ));
        self.title = title;
        self.geometry
            .sync_page_height(geometry::natural_height(self.textarea.lines().len()));
    }

    /// Shows a temporary message in the status bar.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = msg.to_string();
        self.status_time = Some(Instant::now());
    }

    /// Header badge for the current link state.
    pub fn badge(&self) -> header::Badge {
        match (self.sync.is_some(), self.link) {
            (false, _) => header::Badge {
                label: "LOCAL",
                color: theme::LOCAL,
            },
            (true, LinkState::Linked { dirty: false }) => header::Badge {
                label: "SYNCED",
                color: theme::SYNCED,
            },
            (true, LinkState::Linked { dirty: true }) => header::Badge {
                label: "UNSAVED",
                color: theme::UNSAVED,
            },
            (true, LinkState::Unlinked) => header::Badge {
                label: "OFFLINE",
                color: theme::OFFLINE,
            },
        }
    }

    /// Durability tip for the status bar.
    pub fn save_tip(&self) -> &'static str {
        match (self.sync.is_some(), self.link) {
            (false, _) => "local only",
            (true, LinkState::Linked { dirty: false }) => "saved",
            (true, LinkState::Linked { dirty: true }) => "unsaved changes",
            (true, LinkState::Unlinked) => "not linked",
        }
    }
}

mod clipboard;
mod input;
mod render;
mod rename;
mod save;
mod selection;
