//! TUI rendering and terminal management (impure shell)

mod comparison;
mod layout;
mod notices;
mod reference;
mod styles;

pub use comparison::{banner_text, ComparisonPanel};
pub use layout::{render_layout, Screen};
pub use notices::NoticeList;
pub use reference::{aligned_fields, ReferencePanel};
pub use styles::{ColorConfig, StationStyles};

use crate::config::KeyBindings;
use crate::integration::{Workflow, WorkflowSettings};
use crate::lookup::{LookupDispatch, LookupRequest};
use crate::model::{AppError, RawKeyEvent, UserAction};
use crate::state::Counters;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyEvent},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Longest the loop sleeps while nothing is scheduled. Bounds how long a
/// worker's lookup response waits before it is shown.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    workflow: Workflow,
    dispatch: Box<dyn LookupDispatch>,
    key_bindings: KeyBindings,
    styles: StationStyles,
    /// Wall-clock time of the last accepted scan, for display only.
    last_scan_at: Option<DateTime<Local>>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        settings: WorkflowSettings,
        dispatch: Box<dyn LookupDispatch>,
        key_bindings: KeyBindings,
        colors: ColorConfig,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            workflow: Workflow::new(settings),
            dispatch,
            key_bindings,
            styles: StationStyles::with_color_config(colors),
            last_scan_at: None,
        })
    }

    /// Run the main event loop
    ///
    /// Returns when the operator quits. Sleeps until the next key press or
    /// the next workflow deadline, capped at [`IDLE_POLL`] so lookup
    /// responses from the worker are picked up promptly. Redraws only when
    /// something changed.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self
                .workflow
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));

            let mut dirty = false;
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, Instant::now()) {
                            info!("Operator quit");
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }

            if self.tick(Instant::now()) {
                dirty = true;
            }

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Route one key press. Returns true if the app should quit.
    ///
    /// Bound keys become actions and never reach the scan buffer; everything
    /// else is offered to the accumulator as scanner input.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if let Some(action) = self.key_bindings.get(key) {
            debug!(?action, "Key action");
            if action == UserAction::Quit {
                return true;
            }
            self.workflow.handle_action(action, now);
            return false;
        }

        let Some(raw) = RawKeyEvent::from_key_event(&key) else {
            debug!(code = ?key.code, modifiers = ?key.modifiers, "Ignored key");
            return false;
        };

        let before = self.workflow.controller().counters();
        let requests = self.workflow.handle_key(raw, now);
        self.after_scan(before, requests);
        false
    }

    /// Fire due timers and deliver lookup responses. Returns true if the
    /// screen needs a redraw.
    fn tick(&mut self, now: Instant) -> bool {
        let due = self.workflow.next_deadline().is_some_and(|d| d <= now);

        let before = self.workflow.controller().counters();
        let requests = self.workflow.tick(now);
        self.after_scan(before, requests);

        let responses = self.dispatch.drain();
        let arrived = !responses.is_empty();
        for response in responses {
            self.workflow.handle_lookup_response(response, now);
        }

        due || arrived
    }

    /// Submit lookups and stamp the scan time if a scan was counted.
    fn after_scan(&mut self, before: Counters, requests: Vec<LookupRequest>) {
        let after = self.workflow.controller().counters();
        if after.reference_scans + after.comparison_scans
            > before.reference_scans + before.comparison_scans
        {
            self.last_scan_at = Some(Local::now());
        }
        for request in requests {
            self.dispatch.submit(request);
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let screen = Screen {
            workflow: &self.workflow,
            bindings: &self.key_bindings,
            styles: &self.styles,
            last_scan_at: self.last_scan_at,
        };
        self.terminal.draw(|frame| render_layout(frame, &screen))?;
        Ok(())
    }
}

// ===== Test Helpers =====
//
// The following methods are ONLY for testing within the crate.

#[cfg(test)]
#[allow(dead_code)] // Not all helpers used by every test module
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing without touching the real terminal.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        workflow: Workflow,
        dispatch: Box<dyn LookupDispatch>,
        key_bindings: KeyBindings,
    ) -> Self {
        Self {
            terminal,
            workflow,
            dispatch,
            key_bindings,
            styles: StationStyles::with_color_config(ColorConfig::with_colors(false)),
            last_scan_at: None,
        }
    }

    pub(crate) fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub(crate) fn last_scan_at(&self) -> Option<DateTime<Local>> {
        self.last_scan_at
    }

    /// Handle a single keyboard event at `now`. Returns true if app should quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent, now: Instant) -> bool {
        self.handle_key(key, now)
    }

    /// Run one loop iteration's timer and response handling at `now`.
    pub(crate) fn tick_test(&mut self, now: Instant) -> bool {
        self.tick(now)
    }

    /// Render a single frame to the backend.
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// on exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(
    settings: WorkflowSettings,
    dispatch: Box<dyn LookupDispatch>,
    key_bindings: KeyBindings,
    colors: ColorConfig,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(settings, dispatch, key_bindings, colors)?;

    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
