//! Notice list widget.

use crate::state::NoticeBoard;
use crate::view::StationStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Visible notices, newest at the bottom.
pub struct NoticeList<'a> {
    board: &'a NoticeBoard,
    styles: &'a StationStyles,
}

impl<'a> NoticeList<'a> {
    /// List over the notices in `board`.
    pub fn new(board: &'a NoticeBoard, styles: &'a StationStyles) -> Self {
        Self { board, styles }
    }
}

impl Widget for NoticeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .board
            .iter()
            .map(|active| {
                let notice = &active.notice;
                let style = self.styles.severity(notice.severity);
                Line::from(vec![
                    Span::styled(notice.title.clone(), style),
                    Span::raw(": "),
                    Span::raw(notice.description.clone()),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::TOP).title(" Notices "))
            .render(area, buf);
    }
}
