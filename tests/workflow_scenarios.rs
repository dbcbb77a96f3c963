//! Integration tests: the scan workflow through the public API.
//!
//! Drives `Workflow` directly with explicit instants, using both the inline
//! dispatcher and the threaded worker.

use scanmatch::integration::{Workflow, WorkflowSettings};
use scanmatch::lookup::{
    CatalogLookup, InlineLookup, LookupDispatch, LookupResponse, LookupWorker, RecordLookup,
};
use scanmatch::model::{LookupError, RawKeyEvent, RecordData, ScanCode, UserAction};
use scanmatch::state::{ComparisonResult, Mode};
use std::time::{Duration, Instant};

// ===== Test Helpers =====

fn catalog() -> CatalogLookup {
    CatalogLookup::from_records([
        (
            "REF1",
            RecordData {
                style: Some("Loafer".to_string()),
                ..RecordData::default()
            },
        ),
        ("REF2", RecordData::default()),
    ])
    .unwrap()
}

fn keys(workflow: &mut Workflow, dispatch: &mut dyn LookupDispatch, text: &str, now: Instant) {
    for c in text.chars() {
        workflow.handle_key(RawKeyEvent::Char(c), now);
    }
    for request in workflow.handle_key(RawKeyEvent::Enter, now) {
        dispatch.submit(request);
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Drive until a response arrives from a threaded dispatcher.
fn pump_until_answered(workflow: &mut Workflow, dispatch: &mut dyn LookupDispatch, now: Instant) {
    for _ in 0..200 {
        workflow.drive(dispatch, now);
        let waiting = matches!(
            workflow.controller().pending(),
            Some(p) if p.is_awaiting_lookup()
        );
        if !waiting {
            return;
        }
        std::thread::sleep(ms(5));
    }
    panic!("lookup worker never answered");
}

// ===== Scenarios =====

#[test]
fn enter_terminated_keys_produce_one_scan() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();

    for c in ['A', '1', '2', '3'] {
        assert!(workflow.handle_key(RawKeyEvent::Char(c), t0).is_empty());
    }
    let requests = workflow.handle_key(RawKeyEvent::Enter, t0);

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code.as_str(), "A123");
    assert!(workflow.tick(t0 + ms(500)).is_empty(), "No second emission");
}

#[test]
fn idle_keys_complete_after_timeout() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();

    for c in ['X', 'Y', 'Z'] {
        workflow.handle_key(RawKeyEvent::Char(c), t0);
    }

    assert!(workflow.tick(t0 + ms(99)).is_empty());
    let requests = workflow.tick(t0 + ms(100));
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code.as_str(), "XYZ");
}

#[test]
fn reference_confirm_then_compare() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let mut dispatch = InlineLookup::new(catalog());

    keys(&mut workflow, &mut dispatch, "REF1", t0);
    workflow.drive(&mut dispatch, t0);
    workflow.handle_action(UserAction::ConfirmReference, t0);

    let controller = workflow.controller();
    assert_eq!(controller.mode(), Mode::Compare);
    assert_eq!(controller.reference().map(ScanCode::as_str), Some("REF1"));
    assert_eq!(controller.counters().reference_scans, 1);

    keys(&mut workflow, &mut dispatch, "REF1", t0 + ms(10));
    assert_eq!(workflow.controller().result(), ComparisonResult::Match);
    assert_eq!(workflow.controller().counters().matches, 1);

    keys(&mut workflow, &mut dispatch, "REF2", t0 + ms(20));
    assert_eq!(workflow.controller().result(), ComparisonResult::NoMatch);
    assert_eq!(workflow.controller().counters().matches, 1);
}

#[test]
fn not_found_reference_is_dropped() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let mut dispatch = InlineLookup::new(catalog());

    keys(&mut workflow, &mut dispatch, "BAD", t0);
    workflow.drive(&mut dispatch, t0);

    let controller = workflow.controller();
    assert_eq!(controller.mode(), Mode::CaptureReference);
    assert!(controller.pending().is_none());
    assert_eq!(controller.counters().reference_scans, 1);
}

#[test]
fn threaded_worker_answers_lookups() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let mut worker = LookupWorker::spawn(catalog()).expect("spawn worker");

    keys(&mut workflow, &mut worker, "REF1", t0);
    pump_until_answered(&mut workflow, &mut worker, t0);

    let pending = workflow.controller().pending().expect("pending");
    assert_eq!(
        pending.record().and_then(|r| r.style.as_deref()),
        Some("Loafer")
    );
}

#[test]
fn response_for_cancelled_code_is_discarded() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let mut dispatch = InlineLookup::new(catalog());

    keys(&mut workflow, &mut dispatch, "REF1", t0);
    workflow.handle_action(UserAction::CancelReference, t0);
    workflow.drive(&mut dispatch, t0);

    let controller = workflow.controller();
    assert!(controller.pending().is_none());
    assert_eq!(controller.mode(), Mode::CaptureReference);
}

#[test]
fn late_response_after_reset_is_discarded() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let lookup = catalog();

    let mut requests = Vec::new();
    for c in "REF1".chars() {
        workflow.handle_key(RawKeyEvent::Char(c), t0);
    }
    requests.extend(workflow.handle_key(RawKeyEvent::Enter, t0));
    workflow.handle_action(UserAction::ResetWorkflow, t0);

    for request in requests {
        workflow.handle_lookup_response(LookupResponse::resolve(request, &lookup), t0);
    }

    let snapshot = workflow.controller().snapshot();
    assert_eq!(snapshot.pending, None);
    assert_eq!(snapshot.counters.reference_scans, 0);
}

struct Unreachable;

impl RecordLookup for Unreachable {
    fn lookup(&self, _code: &ScanCode) -> Result<RecordData, LookupError> {
        Err(LookupError::Transport {
            reason: "connection refused".to_string(),
        })
    }
}

#[test]
fn transport_failure_behaves_like_not_found() {
    let t0 = Instant::now();
    let mut workflow = Workflow::default();
    let mut dispatch = InlineLookup::new(Unreachable);

    keys(&mut workflow, &mut dispatch, "REF1", t0);
    workflow.drive(&mut dispatch, t0);

    assert!(workflow.controller().pending().is_none());
    assert_eq!(workflow.controller().mode(), Mode::CaptureReference);
}

#[test]
fn result_display_time_is_configurable() {
    let t0 = Instant::now();
    let mut workflow = Workflow::new(WorkflowSettings {
        result_display: ms(500),
        ..WorkflowSettings::default()
    });
    let mut dispatch = InlineLookup::new(catalog());

    keys(&mut workflow, &mut dispatch, "REF1", t0);
    workflow.drive(&mut dispatch, t0);
    workflow.handle_action(UserAction::ConfirmReference, t0);
    keys(&mut workflow, &mut dispatch, "REF1", t0);

    workflow.tick(t0 + ms(499));
    assert_eq!(workflow.controller().result(), ComparisonResult::Match);
    workflow.tick(t0 + ms(500));
    assert_eq!(workflow.controller().result(), ComparisonResult::None);
}
