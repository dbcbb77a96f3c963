//! Pure core integration.
//!
//! [`Workflow`] wires the scan accumulator, the mode controller, and the
//! notice board together for the main event loop. It performs no I/O: the
//! caller passes in the current instant and a [`LookupDispatch`], and reads
//! back the earliest deadline it needs to wake up for.

use crate::lookup::{LookupDispatch, LookupRequest, LookupResponse};
use crate::model::{RawKeyEvent, UserAction};
use crate::scan::{earliest, KeyOutcome, ScanAccumulator, DEFAULT_SCAN_TIMEOUT};
use crate::state::{
    Effect, NoticeBoard, ScanModeController, DEFAULT_MAX_NOTICES, DEFAULT_RESULT_DISPLAY,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// Tunables for a [`Workflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Inactivity gap that completes a scan without Enter.
    pub scan_timeout: Duration,
    /// How long a comparison result stays shown.
    pub result_display: Duration,
    /// Notices visible at once.
    pub max_notices: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
            result_display: DEFAULT_RESULT_DISPLAY,
            max_notices: DEFAULT_MAX_NOTICES,
        }
    }
}

/// Accumulator + controller + notice board.
#[derive(Debug, Clone)]
pub struct Workflow {
    accumulator: ScanAccumulator,
    controller: ScanModeController,
    notices: NoticeBoard,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(WorkflowSettings::default())
    }
}

impl Workflow {
    /// Fresh workflow in CaptureReference mode with no notices.
    pub fn new(settings: WorkflowSettings) -> Self {
        Self {
            accumulator: ScanAccumulator::new(settings.scan_timeout),
            controller: ScanModeController::new(settings.result_display),
            notices: NoticeBoard::new(settings.max_notices),
        }
    }

    /// Feed a raw scan key. Returns lookups to submit.
    pub fn handle_key(&mut self, event: RawKeyEvent, now: Instant) -> Vec<LookupRequest> {
        match self.accumulator.on_key(event, now) {
            KeyOutcome::Completed(scan) => {
                let effects = self.controller.on_scan(scan, now);
                self.apply(effects, now)
            }
            KeyOutcome::Buffered | KeyOutcome::EmptyTerminator | KeyOutcome::Ignored => Vec::new(),
        }
    }

    /// Apply an operator action. `Quit` is the shell's business and ignored here.
    pub fn handle_action(&mut self, action: UserAction, now: Instant) {
        let effects = match action {
            UserAction::ConfirmReference => self.controller.confirm_reference(),
            UserAction::CancelReference => self.controller.cancel_reference(),
            UserAction::ResetWorkflow => {
                self.accumulator.reset();
                self.controller.reset_workflow()
            }
            UserAction::Quit => Vec::new(),
        };
        let requests = self.apply(effects, now);
        debug_assert!(requests.is_empty(), "Actions never request lookups");
    }

    /// Apply a lookup response (stale ones are dropped by the controller).
    pub fn handle_lookup_response(&mut self, response: LookupResponse, now: Instant) {
        let effects = self.controller.on_lookup_response(response);
        self.apply(effects, now);
    }

    /// Fire due timers. Returns lookups to submit (a timed-out scan in
    /// capture mode requests one).
    pub fn tick(&mut self, now: Instant) -> Vec<LookupRequest> {
        let mut requests = Vec::new();
        if let Some(scan) = self.accumulator.poll_timeout(now) {
            let effects = self.controller.on_scan(scan, now);
            requests = self.apply(effects, now);
        }
        self.controller.tick(now);
        self.notices.expire(now);
        requests
    }

    /// One event-loop turn against a dispatcher: fire timers, deliver
    /// arrived responses, submit new requests.
    pub fn drive<D: LookupDispatch + ?Sized>(&mut self, dispatch: &mut D, now: Instant) {
        for request in self.tick(now) {
            dispatch.submit(request);
        }
        for response in dispatch.drain() {
            self.handle_lookup_response(response, now);
        }
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(
            earliest(self.accumulator.deadline(), self.controller.deadline()),
            self.notices.deadline(),
        )
    }

    /// The reference/compare state machine.
    pub fn controller(&self) -> &ScanModeController {
        &self.controller
    }

    /// The scan buffer, for the in-progress preview.
    pub fn accumulator(&self) -> &ScanAccumulator {
        &self.accumulator
    }

    /// Notices currently on screen.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    fn apply(&mut self, effects: Vec<Effect>, now: Instant) -> Vec<LookupRequest> {
        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::Lookup(request) => requests.push(request),
                Effect::Notify(notice) => {
                    debug!(kind = ?notice.kind, title = %notice.title, "Notice");
                    self.notices.post(notice, now);
                }
            }
        }
        requests
    }
}
