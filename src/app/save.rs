//! Saving: dispatch a remote save in the networked variant, or write the
//! export artifact in the standalone one.

use super::*;

impl<'a> App<'a> {
    /// Ctrl+S. Networked: hands content and title to the sync client (a
    /// request while one is in flight is dropped, and the first one's
    /// outcome still arrives). Standalone: exports
    /// `<sanitized-title>.txt` into the working directory.
    pub(super) fn save(&mut self) {
        let content = self.textarea_content();
        let dispatched = match &mut self.sync {
            Some(sync) => Some(sync.request_save(&content, &self.title)),
            None => None,
        };

        match dispatched {
            Some(true) => self.set_status("Saving\u{2026}"),
            Some(false) => {}
            None => {
                let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                match export::export(&dir, &self.title, &content, self.encoding) {
                    Ok(path) => self.set_status(&format!("Exported to {}", path.display())),
                    Err(err) => self.set_status(&format!("Export failed: {err}")),
                }
            }
        }
    }
}
