//! Input handling: keyboard events, mouse events, paste, the zoom
//! gesture, and the quit confirmation.

use super::*;

impl<'a> App<'a> {
    /// Handles bracketed paste events (Cmd+V in iTerm2, etc).
    /// Inserts text into the rename buffer if renaming, otherwise into the editor.
    pub(super) fn handle_paste(&mut self, text: String) {
        if self.renaming {
            for ch in text.chars() {
                if ch != '\n' && ch != '\r' {
                    self.rename_buf.insert(self.rename_cursor, ch);
                    self.rename_cursor += 1;
                }
            }
            return;
        }
        self.textarea.insert_str(text);
        self.update_after_edit();
    }

    // ─── Key handling ────────────────────────────────────────────────────

    /// Main key handler. Processes modal states first, then global
    /// keybindings, then editor keys.
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        // Save-failure notice: any key dismisses it (swallows the keypress)
        if self.notice.is_some() {
            self.notice = None;
            return;
        }

        // Help modal: any key dismisses it (swallows the keypress)
        if self.show_help {
            self.show_help = false;
            return;
        }

        // Rename mode: all keys go to the inline rename input
        if self.renaming {
            self.handle_rename_key(key);
            return;
        }

        // Any key other than a repeated Ctrl+Q stands down the quit
        // confirmation.
        if !(key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('q')) {
            self.quit_armed = false;
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                self.request_quit();
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                // Consumed here: Ctrl+S never reaches the textarea.
                self.save();
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                self.start_rename();
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('0')) => {
                self.geometry.reset_zoom();
                self.set_status("Zoom 100%");
                return;
            }
            (_, KeyCode::F(1)) => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        self.handle_editor_key(key);
    }

    /// Quits immediately when the content is durable; otherwise arms a
    /// one-shot confirmation so a second Ctrl+Q discards.
    fn request_quit(&mut self) {
        if self.link.should_warn_before_discard() && !self.quit_armed {
            self.quit_armed = true;
            let verb = if self.is_networked() {
                "unsaved"
            } else {
                "unexported"
            };
            self.set_status(&format!("Content is {verb}. Ctrl+Q again to discard"));
            return;
        }
        self.should_quit = true;
    }

    /// Editor key handler. Intercepts standard keybindings (Ctrl+Z, Ctrl+C, etc.)
    /// BEFORE passing to tui-textarea, which has non-standard defaults:
    ///   tui-textarea: Ctrl+U=undo, Ctrl+Y=paste, Ctrl+V=PageDown, Ctrl+A=line-start
    ///   We remap:     Ctrl+Z=undo, Ctrl+Y=redo,  Ctrl+V=paste,    Ctrl+A=select-all
    fn handle_editor_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            // Undo
            (KeyModifiers::CONTROL, KeyCode::Char('z')) => {
                self.textarea.undo();
                self.update_after_edit();
                return;
            }
            // Redo
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
                self.textarea.redo();
                self.update_after_edit();
                return;
            }
            // Redo (alternative: Ctrl+Shift+Z)
            (m, KeyCode::Char('Z'))
                if m.contains(KeyModifiers::CONTROL) && m.contains(KeyModifiers::SHIFT) =>
            {
                self.textarea.redo();
                self.update_after_edit();
                return;
            }
            // Select all (overrides tui-textarea's Ctrl+A = move to line start)
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.textarea.select_all();
                return;
            }
            // Copy selection to system clipboard (overrides tui-textarea's internal-only yank)
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                if let Some(text) = self.get_selected_text() {
                    self.copy_to_clipboard(&text);
                }
                // Also yank internally so Ctrl+V fallback works within the editor
                self.textarea.copy();
                return;
            }
            // Paste from system clipboard (overrides tui-textarea's Ctrl+V = PageDown)
            (KeyModifiers::CONTROL, KeyCode::Char('v')) => {
                if let Some(text) = self.paste_from_clipboard() {
                    self.textarea.insert_str(text);
                    self.update_after_edit();
                }
                return;
            }
            // Delete word before cursor
            // On macOS, Ctrl+Backspace sends Ctrl+H (0x08), so we match both
            (KeyModifiers::CONTROL, KeyCode::Backspace)
            | (KeyModifiers::CONTROL, KeyCode::Char('h')) => {
                self.textarea.delete_word();
                self.update_after_edit();
                return;
            }
            // Delete word after cursor (forward)
            (KeyModifiers::CONTROL, KeyCode::Delete) => {
                self.textarea.delete_next_word();
                self.update_after_edit();
                return;
            }
            // Delete word after cursor (Mac-friendly: no forward-delete key on Magic Keyboard)
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
                self.textarea.delete_next_word();
                self.update_after_edit();
                return;
            }
            _ => {}
        }

        // Everything else: pass through to tui-textarea's built-in handling.
        // This covers Tab as well — the textarea is configured for hard
        // tabs, so Tab types a literal '\t' at the caret instead of moving
        // focus anywhere. Arrow keys, Enter, Backspace, Delete, Home, End,
        // Ctrl+K (delete to EOL), Ctrl+E (move to EOL), word navigation,
        // etc. also land here.
        let input = Input::from(key);
        self.textarea.input(input);
        self.update_after_edit();
    }

    // ─── Mouse handling ──────────────────────────────────────────────────

    /// Handles all mouse events: the Ctrl+scroll zoom gesture, plain
    /// scrolling, click (positioning + title clicks), drag (text
    /// selection), and release.
    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            // Ctrl+wheel is the zoom gesture. Consumed entirely: it must
            // never scroll the buffer underneath.
            MouseEventKind::ScrollUp if mouse.modifiers.contains(KeyModifiers::CONTROL) => {
                self.geometry.change_zoom(geometry::ZOOM_STEP);
                self.show_zoom_status();
            }
            MouseEventKind::ScrollDown if mouse.modifiers.contains(KeyModifiers::CONTROL) => {
                self.geometry.change_zoom(-geometry::ZOOM_STEP);
                self.show_zoom_status();
            }

            // Plain scroll wheel: delegate to tui-textarea
            MouseEventKind::ScrollUp => {
                for _ in 0..SCROLL_LINES {
                    self.textarea.input(Input {
                        key: tui_textarea::Key::MouseScrollUp,
                        ctrl: false,
                        alt: false,
                        shift: false,
                    });
                }
                self.editor_scroll_top = self.editor_scroll_top.saturating_sub(SCROLL_LINES);
            }
            MouseEventKind::ScrollDown => {
                for _ in 0..SCROLL_LINES {
                    self.textarea.input(Input {
                        key: tui_textarea::Key::MouseScrollDown,
                        ctrl: false,
                        alt: false,
                        shift: false,
                    });
                }
                let total_lines = self.textarea.lines().len() as u16;
                let max_scroll = total_lines.saturating_sub(1);
                self.editor_scroll_top = (self.editor_scroll_top + SCROLL_LINES).min(max_scroll);
            }

            // Left click: title rename or editor cursor positioning + drag start
            MouseEventKind::Down(MouseButton::Left) => {
                let area = self.content_area;

                // Click on the header row -> enter title rename
                if mouse.row < area.y.saturating_sub(1) {
                    self.start_rename();
                    return;
                }

                // Click in the page text area: single/double/triple click handling
                if mouse.column >= area.x
                    && mouse.column < area.x + area.width
                    && mouse.row >= area.y
                    && mouse.row < area.y + area.height
                {
                    // Multi-click detection
                    let now = Instant::now();
                    let is_repeat = self
                        .last_click_time
                        .map(|t| now.duration_since(t).as_millis() < MULTI_CLICK_MS as u128)
                        .unwrap_or(false)
                        && self.last_click_pos == (mouse.column, mouse.row);
                    self.click_count = if is_repeat {
                        (self.click_count % 3) + 1
                    } else {
                        1
                    };
                    self.last_click_time = Some(now);
                    self.last_click_pos = (mouse.column, mouse.row);

                    let (buffer_row, buffer_col) =
                        self.mouse_to_buffer_pos(mouse.column, mouse.row);

                    match self.click_count {
                        2 => {
                            // Double-click: select word
                            self.textarea
                                .move_cursor(CursorMove::Jump(buffer_row, buffer_col));
                            self.select_word_at_cursor();
                            self.mouse_dragging = false;
                        }
                        3 => {
                            // Triple-click: select paragraph
                            self.textarea
                                .move_cursor(CursorMove::Jump(buffer_row, buffer_col));
                            self.select_paragraph_at_cursor();
                            self.mouse_dragging = false;
                        }
                        _ => {
                            // Single click: position cursor + start drag selection
                            self.textarea.cancel_selection();
                            self.textarea
                                .move_cursor(CursorMove::Jump(buffer_row, buffer_col));
                            self.textarea.start_selection();
                            self.mouse_dragging = true;
                        }
                    }
                }
            }

            // Left drag: extend selection to current mouse position
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.mouse_dragging {
                    let area = self.content_area;
                    if mouse.column >= area.x
                        && mouse.column < area.x + area.width
                        && mouse.row >= area.y
                        && mouse.row < area.y + area.height
                    {
                        self.drag_auto_scroll = None;
                        let (buffer_row, buffer_col) =
                            self.mouse_to_buffer_pos(mouse.column, mouse.row);
                        self.textarea
                            .move_cursor(CursorMove::Jump(buffer_row, buffer_col));
                    } else if mouse.row < area.y {
                        self.drag_auto_scroll = Some(DragAutoScroll::Up);
                    } else if mouse.row >= area.y + area.height {
                        self.drag_auto_scroll = Some(DragAutoScroll::Down);
                    }
                }
            }

            // Left release: finalize selection (cancel if it was just a click with no drag)
            MouseEventKind::Up(MouseButton::Left) => {
                if self.mouse_dragging {
                    self.mouse_dragging = false;
                    self.drag_auto_scroll = None;
                    if let Some(((sr, sc), (er, ec))) = self.textarea.selection_range() {
                        if sr == er && sc == ec {
                            self.textarea.cancel_selection();
                        }
                    } else {
                        self.textarea.cancel_selection();
                    }
                }
            }
            _ => {}
        }
    }

    fn show_zoom_status(&mut self) {
        let percent = self.geometry.zoom_percent();
        self.set_status(&format!("Zoom {percent}%"));
    }

    /// Converts terminal mouse coordinates to buffer (row, col) positions,
    /// accounting for the page frame offset and scroll position.
    pub(super) fn mouse_to_buffer_pos(&self, column: u16, row: u16) -> (u16, u16) {
        let area = self.content_area;
        let relative_row = row - area.y;
        let buffer_row = relative_row + self.editor_scroll_top;
        let buffer_col = column - area.x;
        (buffer_row, buffer_col)
    }
}
