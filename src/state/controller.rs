//! Reference/compare workflow state machine.
//!
//! The controller decides what a completed scan means:
//!
//! | From | Event | To |
//! |---|---|---|
//! | CaptureReference | scan | CaptureReference + pending (lookup requested) |
//! | pending | lookup ok | pending with record, awaiting decision |
//! | pending | lookup failed | CaptureReference |
//! | pending (record loaded) | confirm | Compare |
//! | pending | cancel | CaptureReference |
//! | Compare | scan | Compare + result shown |
//! | result shown | display time elapsed | Compare |
//! | any | reset | CaptureReference, counters zeroed |
//!
//! Pending and confirmed references live in different [`Phase`] variants, so
//! they can never coexist, and Compare mode cannot exist without a reference.
//!
//! Operations return [`Effect`]s instead of performing I/O. The caller submits
//! lookup requests and forwards notices to the presentation layer.

use crate::lookup::{LookupRequest, LookupResponse, LookupTicket};
use crate::model::{Notice, NoticeKind, RecordData, ScanCode};
use crate::scan::TimerSlot;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default time a comparison result stays on screen.
pub const DEFAULT_RESULT_DISPLAY: Duration = Duration::from_millis(3000);

/// Top-level workflow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Waiting for (or confirming) a reference code.
    CaptureReference,
    /// Comparing scans against the confirmed reference.
    Compare,
}

/// Outcome of the most recent comparison, while it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonResult {
    /// Nothing to show: no comparison yet, or the last one expired.
    #[default]
    None,
    /// Scanned code equals the reference.
    Match,
    /// Scanned code differs from the reference.
    NoMatch,
}

/// Running counters. Only [`ScanModeController::reset_workflow`] zeroes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    /// Scans accepted in CaptureReference mode, confirmed or not.
    pub reference_scans: u64,
    /// Scans evaluated in Compare mode.
    pub comparison_scans: u64,
    /// Comparison scans equal to the reference.
    pub matches: u64,
}

/// A scanned reference awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReference {
    code: ScanCode,
    ticket: LookupTicket,
    record: Option<RecordData>,
}

impl PendingReference {
    /// The scanned candidate code.
    pub fn code(&self) -> &ScanCode {
        &self.code
    }

    /// The looked-up record, once the lookup succeeded.
    pub fn record(&self) -> Option<&RecordData> {
        self.record.as_ref()
    }

    /// True while the lookup for this code is in flight.
    pub fn is_awaiting_lookup(&self) -> bool {
        self.record.is_none()
    }

    fn answers(&self, response: &LookupResponse) -> bool {
        self.ticket == response.ticket && self.code == response.code && self.is_awaiting_lookup()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Capture {
        pending: Option<PendingReference>,
    },
    Compare {
        reference: ScanCode,
        result: ComparisonResult,
        last_scan: Option<ScanCode>,
    },
}

/// Something the caller must carry out on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit a lookup to the record source.
    Lookup(LookupRequest),
    /// Show a notice to the operator.
    Notify(Notice),
}

/// Plain view of the controller state, for assertions and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// See [`ScanModeController::mode`].
    pub mode: Mode,
    /// Confirmed reference code.
    pub reference: Option<ScanCode>,
    /// Code of the pending reference.
    pub pending: Option<ScanCode>,
    /// Displayed comparison result.
    pub result: ComparisonResult,
    /// Running counters.
    pub counters: Counters,
}

/// The reference/compare state machine.
#[derive(Debug, Clone)]
pub struct ScanModeController {
    phase: Phase,
    counters: Counters,
    result_timer: TimerSlot,
    result_display: Duration,
    next_ticket: LookupTicket,
}

impl Default for ScanModeController {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_DISPLAY)
    }
}

impl ScanModeController {
    /// Create a controller in CaptureReference mode.
    ///
    /// `result_display` is how long a comparison result stays set.
    pub fn new(result_display: Duration) -> Self {
        Self {
            phase: Phase::Capture { pending: None },
            counters: Counters::default(),
            result_timer: TimerSlot::new(),
            result_display,
            next_ticket: LookupTicket::new(1),
        }
    }

    /// Handle a completed scan received at `now`.
    pub fn on_scan(&mut self, code: ScanCode, now: Instant) -> Vec<Effect> {
        match &mut self.phase {
            Phase::Capture { pending } => {
                self.counters.reference_scans += 1;

                let ticket = self.next_ticket;
                self.next_ticket = ticket.next();

                if let Some(previous) = pending.as_ref() {
                    debug!(previous = %previous.code, code = %code, "Pending reference superseded");
                }
                *pending = Some(PendingReference {
                    code: code.clone(),
                    ticket,
                    record: None,
                });

                info!(code = %code, ticket = ticket.value(), "Reference scan accepted");
                vec![
                    Effect::Notify(Notice::new(
                        NoticeKind::ScanAccepted,
                        "Reference scanned",
                        format!("Looking up {code}..."),
                    )),
                    Effect::Lookup(LookupRequest { ticket, code }),
                ]
            }
            Phase::Compare {
                reference,
                result,
                last_scan,
            } => {
                let matched = code == *reference;
                self.counters.comparison_scans += 1;
                if matched {
                    self.counters.matches += 1;
                }
                *result = if matched {
                    ComparisonResult::Match
                } else {
                    ComparisonResult::NoMatch
                };
                self.result_timer.arm(now, self.result_display);

                info!(code = %code, reference = %reference, matched, "Comparison scan");
                let notice = if matched {
                    Notice::new(
                        NoticeKind::ComparisonMatch,
                        "Match",
                        format!("{code} matches the reference."),
                    )
                } else {
                    Notice::new(
                        NoticeKind::ComparisonNoMatch,
                        "No match",
                        format!("{code} does not match {reference}."),
                    )
                };
                *last_scan = Some(code);
                vec![Effect::Notify(notice)]
            }
        }
    }

    /// Apply a lookup response. Responses for anything other than the current
    /// pending lookup are stale and dropped without effect.
    pub fn on_lookup_response(&mut self, response: LookupResponse) -> Vec<Effect> {
        let Phase::Capture { pending } = &mut self.phase else {
            debug!(code = %response.code, "Discarding lookup response outside capture mode");
            return Vec::new();
        };

        let is_current = pending.as_ref().is_some_and(|p| p.answers(&response));
        if !is_current {
            debug!(
                code = %response.code,
                ticket = response.ticket.value(),
                "Discarding stale lookup response"
            );
            return Vec::new();
        }

        match response.outcome {
            Ok(record) => {
                if let Some(p) = pending.as_mut() {
                    p.record = Some(record);
                }
                info!(code = %response.code, "Reference record loaded; awaiting confirmation");
                Vec::new()
            }
            Err(err) => {
                if err.is_not_found() {
                    info!(code = %response.code, "Reference not found");
                } else {
                    warn!(code = %response.code, error = %err, "Reference lookup failed");
                }
                *pending = None;
                vec![Effect::Notify(Notice::new(
                    NoticeKind::LookupFailed,
                    "Record not found",
                    format!("No record for {}. Scan again.", response.code),
                ))]
            }
        }
    }

    /// Accept the pending reference. Only honoured once its record has loaded.
    pub fn confirm_reference(&mut self) -> Vec<Effect> {
        let Phase::Capture { pending } = &mut self.phase else {
            debug!("Confirm ignored: not capturing a reference");
            return Vec::new();
        };

        match pending.take() {
            Some(p) if !p.is_awaiting_lookup() => {
                info!(code = %p.code, "Reference confirmed");
                let notice = Notice::new(
                    NoticeKind::ReferenceConfirmed,
                    "Reference saved",
                    format!("{} is now the reference.", p.code),
                );
                self.phase = Phase::Compare {
                    reference: p.code,
                    result: ComparisonResult::None,
                    last_scan: None,
                };
                vec![Effect::Notify(notice)]
            }
            Some(p) => {
                debug!(code = %p.code, "Confirm ignored: lookup still in flight");
                *pending = Some(p);
                Vec::new()
            }
            None => {
                debug!("Confirm ignored: nothing pending");
                Vec::new()
            }
        }
    }

    /// Discard the pending reference.
    pub fn cancel_reference(&mut self) -> Vec<Effect> {
        let Phase::Capture { pending } = &mut self.phase else {
            debug!("Cancel ignored: not capturing a reference");
            return Vec::new();
        };

        match pending.take() {
            Some(p) => {
                info!(code = %p.code, "Pending reference cancelled");
                vec![Effect::Notify(Notice::new(
                    NoticeKind::ReferenceCancelled,
                    "Reference discarded",
                    format!("{} was not saved.", p.code),
                ))]
            }
            None => {
                debug!("Cancel ignored: nothing pending");
                Vec::new()
            }
        }
    }

    /// Return to CaptureReference with everything cleared.
    pub fn reset_workflow(&mut self) -> Vec<Effect> {
        self.phase = Phase::Capture { pending: None };
        self.counters = Counters::default();
        self.result_timer.cancel();

        info!("Workflow reset");
        vec![Effect::Notify(Notice::new(
            NoticeKind::WorkflowReset,
            "Workflow reset",
            "Scan a new reference code.",
        ))]
    }

    /// Clear the comparison result if its display time has elapsed.
    ///
    /// Returns `true` when the result was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.result_timer.fire_if_due(now) {
            return false;
        }
        if let Phase::Compare { result, .. } = &mut self.phase {
            *result = ComparisonResult::None;
        }
        true
    }

    /// When the displayed result will clear, if one is shown.
    pub fn deadline(&self) -> Option<Instant> {
        self.result_timer.deadline()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        match self.phase {
            Phase::Capture { .. } => Mode::CaptureReference,
            Phase::Compare { .. } => Mode::Compare,
        }
    }

    /// Reference awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&PendingReference> {
        match &self.phase {
            Phase::Capture { pending } => pending.as_ref(),
            Phase::Compare { .. } => None,
        }
    }

    /// The confirmed reference. Set exactly in Compare mode.
    pub fn reference(&self) -> Option<&ScanCode> {
        match &self.phase {
            Phase::Compare { reference, .. } => Some(reference),
            Phase::Capture { .. } => None,
        }
    }

    /// Result currently displayed.
    pub fn result(&self) -> ComparisonResult {
        match &self.phase {
            Phase::Compare { result, .. } => *result,
            Phase::Capture { .. } => ComparisonResult::None,
        }
    }

    /// The most recent comparison scan since the reference was confirmed.
    pub fn last_comparison(&self) -> Option<&ScanCode> {
        match &self.phase {
            Phase::Compare { last_scan, .. } => last_scan.as_ref(),
            Phase::Capture { .. } => None,
        }
    }

    /// Running counters.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Copy of the observable state.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            mode: self.mode(),
            reference: self.reference().cloned(),
            pending: self.pending().map(|p| p.code.clone()),
            result: self.result(),
            counters: self.counters,
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
