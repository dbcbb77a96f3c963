//! Acceptance test harness for TUI testing
//!
//! Drives a `TuiApp<TestBackend>` with a synthetic clock, so scan timeouts and
//! result display times can be stepped through without sleeping.

use crate::config::KeyBindings;
use crate::integration::{Workflow, WorkflowSettings};
use crate::lookup::{CatalogLookup, InlineLookup};
use crate::model::RecordData;
use crate::view::{TuiApp, TuiError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::{Duration, Instant};

/// Convert buffer to string for text search
///
/// Extracts all cell contents from buffer, row by row, dropping blank rows.
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Catalog used by acceptance tests.
pub(crate) fn fixture_catalog() -> CatalogLookup {
    CatalogLookup::from_records([
        (
            "REF100",
            RecordData {
                area: Some("Line 2".to_string()),
                kind: Some("Sneaker".to_string()),
                style: Some("Runner".to_string()),
                color: Some("White".to_string()),
                size: Some("42".to_string()),
                ..RecordData::default()
            },
        ),
        (
            "REF200",
            RecordData {
                kind: Some("Boot".to_string()),
                material: Some("Suede".to_string()),
                ..RecordData::default()
            },
        ),
    ])
    .expect("fixture catalog is valid")
}

/// Test harness for acceptance testing
///
/// Wraps TuiApp<TestBackend> to provide a clean API for simulating operator
/// and scanner input in acceptance tests.
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    now: Instant,
    running: bool,
}

impl AcceptanceTestHarness {
    /// Harness with default settings and an 100x24 terminal.
    pub fn new() -> Self {
        Self::with_settings(WorkflowSettings::default(), 100, 24)
            .expect("TestBackend terminal never fails")
    }

    /// Harness with custom workflow settings and terminal size.
    pub fn with_settings(
        settings: WorkflowSettings,
        width: u16,
        height: u16,
    ) -> Result<Self, TuiError> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        let app = TuiApp::new_for_test(
            terminal,
            Workflow::new(settings),
            Box::new(InlineLookup::new(fixture_catalog())),
            KeyBindings::default(),
        );

        Ok(Self {
            app,
            now: Instant::now(),
            running: true,
        })
    }

    /// Send a single key event at the current synthetic instant.
    ///
    /// # Returns
    /// * `true` - If app quit as a result of this key
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    /// Send key with modifiers (e.g., Ctrl+C)
    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }

        let quit = self.app.handle_key_test(KeyEvent::new(key, mods), self.now);
        if quit {
            self.running = false;
        }
        quit
    }

    /// Type characters as a scanner would, without a terminator.
    pub fn type_chars(&mut self, text: &str) {
        for ch in text.chars() {
            self.send_key(KeyCode::Char(ch));
        }
    }

    /// A full Enter-terminated scan, followed by one loop tick so inline
    /// lookup responses are delivered.
    pub fn scan(&mut self, code: &str) {
        self.type_chars(code);
        self.send_key(KeyCode::Enter);
        self.tick();
    }

    /// Move the synthetic clock forward and run one loop tick.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        self.tick();
    }

    /// [`advance`](Self::advance) by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// One loop iteration at the current instant. Returns true if a redraw
    /// would happen.
    pub fn tick(&mut self) -> bool {
        self.app.tick_test(self.now)
    }

    /// Workflow state behind the app.
    pub fn workflow(&self) -> &Workflow {
        self.app.workflow()
    }

    /// Check if app is still running (didn't quit)
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render the current state and return it as text.
    pub fn render_to_string(&mut self) -> String {
        self.app.render_test().expect("TestBackend render");
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}
