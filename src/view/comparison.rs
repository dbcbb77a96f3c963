//! Comparison panel: the match/no-match banner and the last compared code.

use crate::state::{ComparisonResult, Mode, ScanModeController};
use crate::view::StationStyles;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Banner text for a result, `None` when nothing is being shown.
pub fn banner_text(result: ComparisonResult) -> Option<&'static str> {
    match result {
        ComparisonResult::Match => Some("MATCH"),
        ComparisonResult::NoMatch => Some("NO MATCH"),
        ComparisonResult::None => None,
    }
}

/// Right-hand panel: result banner and last scanned code.
pub struct ComparisonPanel<'a> {
    controller: &'a ScanModeController,
    styles: &'a StationStyles,
}

impl<'a> ComparisonPanel<'a> {
    /// Panel over `controller`'s current state.
    pub fn new(controller: &'a ScanModeController, styles: &'a StationStyles) -> Self {
        Self { controller, styles }
    }
}

impl Widget for ComparisonPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let result = self.controller.result();
        let block = Block::default()
            .title(" Comparison ")
            .borders(Borders::ALL);

        let mut lines = Vec::new();
        match (self.controller.mode(), banner_text(result)) {
            (Mode::CaptureReference, _) => {
                lines.push(Line::from(Span::styled(
                    "Confirm a reference to start comparing",
                    self.styles.dim(),
                )));
            }
            (Mode::Compare, None) => {
                lines.push(Line::from(Span::styled(
                    "Scan an item",
                    self.styles.dim(),
                )));
            }
            (Mode::Compare, Some(text)) => {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    format!("  {text}  "),
                    self.styles.result(result),
                )));
                if let Some(code) = self.controller.last_comparison() {
                    lines.push(Line::default());
                    lines.push(Line::from(vec![
                        Span::styled("Scanned ", self.styles.label()),
                        Span::styled(code.as_str().to_string(), self.styles.code()),
                    ]));
                }
            }
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
