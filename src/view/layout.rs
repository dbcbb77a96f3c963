//! Station screen layout.
//!
//! Pure rendering: everything shown is read from a [`Screen`], nothing is
//! mutated.

use crate::config::KeyBindings;
use crate::integration::Workflow;
use crate::model::UserAction;
use crate::state::{Counters, Mode};
use crate::view::{ComparisonPanel, NoticeList, ReferencePanel, StationStyles};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything one frame needs.
pub struct Screen<'a> {
    /// State to render.
    pub workflow: &'a Workflow,
    /// Active key bindings, listed in the footer.
    pub bindings: &'a KeyBindings,
    /// Color palette.
    pub styles: &'a StationStyles,
    /// Wall-clock time of the last accepted scan.
    pub last_scan_at: Option<DateTime<Local>>,
}

/// Render header, reference and comparison panels, counters, notices and
/// the key-help footer.
pub fn render_layout(frame: &mut Frame, screen: &Screen) {
    let notices_height = screen.workflow.notices().capacity() as u16 + 1;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Header
            Constraint::Min(5),                 // Panels
            Constraint::Length(1),              // Counters
            Constraint::Length(notices_height), // Notices
            Constraint::Length(1),              // Key help
        ])
        .split(frame.area());

    render_header(frame, rows[0], screen);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let controller = screen.workflow.controller();
    frame.render_widget(ReferencePanel::new(controller, screen.styles), panels[0]);
    frame.render_widget(ComparisonPanel::new(controller, screen.styles), panels[1]);

    render_counters(frame, rows[2], screen);
    frame.render_widget(
        NoticeList::new(screen.workflow.notices(), screen.styles),
        rows[3],
    );
    render_key_help(frame, rows[4], screen);
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::CaptureReference => "CAPTURE REFERENCE",
        Mode::Compare => "COMPARE",
    }
}

/// Header: mode and the scan currently being typed.
fn render_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let mode = screen.workflow.controller().mode();
    let buffer = screen.workflow.accumulator().buffer();

    let mut text = format!(" scanmatch | {}", mode_label(mode));
    if !buffer.is_empty() {
        text.push_str(&format!(" | scanning: {buffer}"));
    }

    frame.render_widget(
        Paragraph::new(Line::from(text)).style(screen.styles.header(mode)),
        area,
    );
}

fn counters_text(counters: Counters, last_scan_at: Option<DateTime<Local>>) -> String {
    let mut text = format!(
        " References: {}  Comparisons: {}  Matches: {}",
        counters.reference_scans, counters.comparison_scans, counters.matches
    );
    if let Some(at) = last_scan_at {
        text.push_str(&format!("  Last scan: {}", at.format("%H:%M:%S")));
    }
    text
}

fn render_counters(frame: &mut Frame, area: Rect, screen: &Screen) {
    let text = counters_text(screen.workflow.controller().counters(), screen.last_scan_at);
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

/// Footer listing the bound keys per action.
fn key_help_text(bindings: &KeyBindings) -> String {
    let actions = [
        UserAction::ConfirmReference,
        UserAction::CancelReference,
        UserAction::ResetWorkflow,
        UserAction::Quit,
    ];

    actions
        .iter()
        .filter_map(|&action| {
            let keys = bindings.keys_for(action);
            (!keys.is_empty()).then(|| format!("{}: {}", keys.join("/"), action.label()))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_key_help(frame: &mut Frame, area: Rect, screen: &Screen) {
    let text = format!(" {}", key_help_text(screen.bindings));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, screen.styles.dim()))),
        area,
    );
}

// ===== Tests =====

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
