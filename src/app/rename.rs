//! Inline title rename mode: enter, edit, and confirm/cancel a new
//! document title.
//!
//! Activated via Ctrl+T or clicking the title in the header bar. The
//! title travels with the next save in the networked variant and names
//! the export artifact in the standalone one.

use super::*;

impl<'a> App<'a> {
    // ─── Rename mode ─────────────────────────────────────────────────────

    /// Enter rename mode: populates the rename buffer with the current
    /// title and places the cursor at the end.
    pub(super) fn start_rename(&mut self) {
        self.rename_buf = self.title.clone();
        self.rename_cursor = self.rename_buf.len();
        self.renaming = true;
    }

    /// Handles keypresses while in rename mode.
    /// Enter confirms, Esc cancels, printable chars edit the title.
    pub(super) fn handle_rename_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.renaming = false;
                self.rename_buf.clear();
            }
            KeyCode::Enter => {
                self.confirm_rename();
            }
            KeyCode::Backspace => {
                if self.rename_cursor > 0 {
                    self.rename_cursor -= 1;
                    self.rename_buf.remove(self.rename_cursor);
                }
            }
            KeyCode::Delete => {
                if self.rename_cursor < self.rename_buf.len() {
                    self.rename_buf.remove(self.rename_cursor);
                }
            }
            KeyCode::Left => {
                if self.rename_cursor > 0 {
                    self.rename_cursor -= 1;
                }
            }
            KeyCode::Right => {
                if self.rename_cursor < self.rename_buf.len() {
                    self.rename_cursor += 1;
                }
            }
            KeyCode::Home => {
                self.rename_cursor = 0;
            }
            KeyCode::End => {
                self.rename_cursor = self.rename_buf.len();
            }
            KeyCode::Char(ch) => {
                // Reject path separators to keep the title a bare name
                if ch != '/' && ch != '\\' {
                    self.rename_buf.insert(self.rename_cursor, ch);
                    self.rename_cursor += 1;
                }
            }
            _ => {}
        }
    }

    /// Applies the edited title to the session.
    fn confirm_rename(&mut self) {
        let new_title = self.rename_buf.trim().to_string();
        self.renaming = false;
        if new_title.is_empty() {
            self.set_status("Rename cancelled: empty title");
            return;
        }
        if new_title == self.title {
            return;
        }
        self.title = new_title;
        if self.is_networked() {
            self.set_status("Renamed (Ctrl+S to save)");
        } else {
            self.set_status("Renamed");
        }
    }
}
