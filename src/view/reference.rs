//! Reference panel: the pending or confirmed reference and its record.

use crate::model::RecordData;
use crate::state::{Mode, ScanModeController};
use crate::view::StationStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Pad record labels to a common display width.
///
/// Catalog-specific labels may contain wide characters, so padding goes by
/// terminal columns rather than `len()`.
pub fn aligned_fields<'a>(record: &'a RecordData) -> Vec<(String, &'a str)> {
    let fields = record.fields();
    let width = fields
        .iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0);

    fields
        .into_iter()
        .map(|(label, value)| {
            let pad = width - label.width();
            (format!("{label}{}", " ".repeat(pad)), value)
        })
        .collect()
}

/// Left-hand panel: pending reference with its record, or the confirmed
/// reference.
pub struct ReferencePanel<'a> {
    controller: &'a ScanModeController,
    styles: &'a StationStyles,
}

impl<'a> ReferencePanel<'a> {
    /// Panel over `controller`'s current state.
    pub fn new(controller: &'a ScanModeController, styles: &'a StationStyles) -> Self {
        Self { controller, styles }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let styles = self.styles;

        if let Some(reference) = self.controller.reference() {
            return vec![
                Line::from(vec![
                    Span::styled("Reference ", styles.label()),
                    Span::styled(reference.as_str().to_string(), styles.code()),
                ]),
                Line::from(Span::styled("Confirmed", styles.dim())),
            ];
        }

        let Some(pending) = self.controller.pending() else {
            return vec![Line::from(Span::styled(
                "Scan a reference code",
                styles.dim(),
            ))];
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("Code ", styles.label()),
            Span::styled(pending.code().as_str().to_string(), styles.code()),
        ])];

        match pending.record() {
            None => lines.push(Line::from(Span::styled("Looking up...", styles.dim()))),
            Some(record) if record.is_empty() => {
                lines.push(Line::from(Span::styled(
                    "Record has no details",
                    styles.dim(),
                )));
            }
            Some(record) => {
                lines.push(Line::default());
                for (label, value) in aligned_fields(record) {
                    lines.push(Line::from(vec![
                        Span::styled(label, styles.label()),
                        Span::raw("  "),
                        Span::raw(value.to_string()),
                    ]));
                }
            }
        }

        if !pending.is_awaiting_lookup() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Confirm to start comparing, or cancel",
                styles.dim(),
            )));
        }

        lines
    }
}

impl Widget for ReferencePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.controller.mode() {
            Mode::CaptureReference if self.controller.pending().is_some() => " Pending reference ",
            Mode::CaptureReference => " Reference ",
            Mode::Compare => " Active reference ",
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
