//! UI rendering: main frame layout, the zoomed page surface with page
//! break ticks, and the help/notice modal overlays.

use super::*;

impl<'a> App<'a> {
    /// Runs one frame of the main loop: draw + tick.
    pub fn render_frame<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> std::io::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        self.tick();
        Ok(())
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let full = frame.area();

        // Fill entire frame background first
        let bg = Paragraph::new("").style(theme::editor_style());
        frame.render_widget(bg, full);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Divider
            Constraint::Min(1),    // Page surface
            Constraint::Length(1), // Divider
            Constraint::Length(1), // Status
        ])
        .split(full);

        // Header bar: title (or rename input) + link badge
        let badge = self.badge();
        header::render(
            frame,
            chunks[0],
            &self.title,
            self.link.is_dirty(),
            &badge,
            self.renaming,
            &self.rename_buf,
            self.rename_cursor,
        );

        // Thin dividers between bars and content
        let divider_style = Style::default().fg(theme::BORDER);
        let top_divider =
            Paragraph::new("\u{2500}".repeat(chunks[1].width as usize)).style(divider_style);
        frame.render_widget(top_divider, chunks[1]);
        let bottom_divider =
            Paragraph::new("\u{2500}".repeat(chunks[3].width as usize)).style(divider_style);
        frame.render_widget(bottom_divider, chunks[3]);

        self.render_page(frame, chunks[2]);

        // Status bar: cursor position, message, words/page/zoom/tip
        let (line, col) = self.textarea.cursor();
        status::render(
            frame,
            chunks[4],
            status::StatusInfo {
                line: line + 1,
                col,
                message: &self.status_message,
                word_count: self.word_count(),
                page: self.geometry.page_of_line(line),
                page_count: self.geometry.page_count(),
                zoom_percent: self.geometry.zoom_percent(),
                save_tip: self.save_tip(),
            },
        );

        // Modal overlays -- rendered last so they sit on top of everything.
        // A save-failure notice outranks the help screen.
        if self.notice.is_some() {
            self.render_notice(frame);
        } else if self.show_help {
            self.render_help(frame);
        }
    }

    /// Renders the page surface: a frame scaled horizontally by the zoom
    /// factor, centered in the content area, with the textarea inside and
    /// tick marks on the frame where page breaks fall.
    ///
    /// Zoom scales only this bounding box. The text itself keeps its
    /// logical width, so page breaks never move when zooming.
    fn render_page(&mut self, frame: &mut Frame, area: Rect) {
        let zoom = self.geometry.zoom();
        let mut frame_width = (f32::from(PAGE_TEXT_WIDTH) * zoom).round() as u16 + 2;
        frame_width = frame_width.min(area.width);
        frame_width = frame_width.max(MIN_PAGE_FRAME_WIDTH.min(area.width));

        let x = area.x + (area.width.saturating_sub(frame_width)) / 2;
        let page_area = Rect::new(x, area.y, frame_width, area.height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::page_edge_style());
        let inner = block.inner(page_area);
        frame.render_widget(block, page_area);

        self.content_area = inner;

        frame.render_widget(&self.textarea, inner);

        // Track scroll position (mirrors tui-textarea's internal viewport logic)
        // so we can translate mouse coordinates -> buffer positions correctly.
        let cursor_row = self.textarea.cursor().0 as u16;
        if cursor_row < self.editor_scroll_top {
            self.editor_scroll_top = cursor_row;
        } else if inner.height > 0 && self.editor_scroll_top + inner.height <= cursor_row {
            self.editor_scroll_top = cursor_row + 1 - inner.height;
        }

        // Page break ticks: mark the frame columns at the last line of
        // each virtual page.
        let scroll_top = self.editor_scroll_top as usize;
        for screen_row in 0..inner.height {
            let buf_line = scroll_top + screen_row as usize;
            if (buf_line + 1) % geometry::LINES_PER_PAGE == 0 {
                let y = inner.y + screen_row;
                let buf = frame.buffer_mut();
                if let Some(cell) = buf.cell_mut((page_area.x, y)) {
                    cell.set_char('\u{251C}'); // ├
                    cell.set_fg(theme::PAGE_EDGE);
                }
                if let Some(cell) = buf.cell_mut((page_area.x + page_area.width - 1, y)) {
                    cell.set_char('\u{2524}'); // ┤
                    cell.set_fg(theme::PAGE_EDGE);
                }
            }
        }
    }

    /// Renders the interrupting save-failure notice. Dismissed by any key.
    fn render_notice(&self, frame: &mut Frame) {
        let Some(ref notice) = self.notice else {
            return;
        };
        let area = frame.area();
        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 9u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let notice_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, notice_area);

        let mut lines: Vec<Line> = notice.lines().map(|l| Line::from(l.to_string())).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key",
            Style::default().fg(theme::BORDER),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ERROR))
            .style(Style::default().fg(theme::FG).bg(theme::BAR_BG));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, notice_area);
    }

    /// Renders a centered modal overlay listing all keybindings.
    /// Dismissed by pressing any key.
    fn render_help(&self, frame: &mut Frame) {
        let area = frame.area();
        // Size the modal to fit content, clamped to terminal size
        let width = 45u16.min(area.width.saturating_sub(4));
        let height = 19u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(x, y, width, height);

        // Clear the area behind the modal
        frame.render_widget(Clear, help_area);

        let save_label = if self.is_networked() {
            "Save to store"
        } else {
            "Export .txt"
        };

        // Help content -- must match the actual keybinding handlers!
        let key_style = Style::default().fg(theme::SYNCED);
        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Ctrl+S           ", key_style),
                Span::raw(save_label),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+T           ", key_style),
                Span::raw("Rename document"),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+Q           ", key_style),
                Span::raw("Quit (asks when not durable)"),
            ]),
            Line::from(vec![
                Span::styled("  Tab              ", key_style),
                Span::raw("Insert tab character"),
            ]),
            Line::from(vec![
                Span::styled("  F1               ", key_style),
                Span::raw("This help"),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Ctrl+Z / Ctrl+Y  ", key_style),
                Span::raw("Undo / Redo"),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+A           ", key_style),
                Span::raw("Select all"),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+C / Ctrl+V  ", key_style),
                Span::raw("Copy / Paste (system)"),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Ctrl+Scroll      ", key_style),
                Span::raw("Zoom page"),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+0           ", key_style),
                Span::raw("Reset zoom"),
            ]),
            Line::from(vec![
                Span::styled("  Click + drag     ", key_style),
                Span::raw("Select text"),
            ]),
            Line::from(vec![
                Span::styled("  Click title      ", key_style),
                Span::raw("Rename document"),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .style(Style::default().fg(theme::FG).bg(theme::BAR_BG));

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, help_area);
    }
}
