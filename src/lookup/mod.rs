//! Record lookup collaborators.
//!
//! The workflow never calls a data source directly. It emits
//! [`LookupRequest`]s and later receives [`LookupResponse`]s through a
//! [`LookupDispatch`]. Every response echoes the ticket and code it was
//! requested for so the controller can discard answers that arrive after the
//! pending code was cancelled or superseded.

pub mod catalog;
pub mod worker;

pub use catalog::CatalogLookup;
pub use worker::LookupWorker;

use crate::model::{LookupError, RecordData, ScanCode};
use std::collections::VecDeque;

/// A source of descriptive record data.
///
/// Implementations must be idempotent: looking up the same code twice yields
/// the same answer unless the underlying data changed.
pub trait RecordLookup: Send {
    /// Look up the record for `code`.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotFound`] when the source has no such record,
    /// [`LookupError::Transport`] when the source cannot be consulted.
    fn lookup(&self, code: &ScanCode) -> Result<RecordData, LookupError>;
}

impl<L: RecordLookup + Sync> RecordLookup for std::sync::Arc<L> {
    fn lookup(&self, code: &ScanCode) -> Result<RecordData, LookupError> {
        (**self).lookup(code)
    }
}

/// Monotonic identifier of one lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupTicket(u64);

impl LookupTicket {
    /// Wrap a raw ticket number.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The ticket issued after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw ticket number, for logging.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A lookup the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Identifies this request among those issued by the controller.
    pub ticket: LookupTicket,
    /// Code to look up.
    pub code: ScanCode,
}

/// The answer to a [`LookupRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    /// Ticket of the request being answered.
    pub ticket: LookupTicket,
    /// Code of the request being answered.
    pub code: ScanCode,
    /// The record, or why there is none.
    pub outcome: Result<RecordData, LookupError>,
}

impl LookupResponse {
    /// Answer `request` using `lookup`.
    pub fn resolve(request: LookupRequest, lookup: &dyn RecordLookup) -> Self {
        let outcome = lookup.lookup(&request.code);
        Self {
            ticket: request.ticket,
            code: request.code,
            outcome,
        }
    }
}

/// Carries lookup requests to a data source and responses back.
///
/// `drain` must never block: the event loop calls it on every iteration.
pub trait LookupDispatch {
    /// Queue a request.
    fn submit(&mut self, request: LookupRequest);

    /// Take every response that has arrived since the last call.
    fn drain(&mut self) -> Vec<LookupResponse>;
}

/// Dispatcher that answers on the calling thread.
///
/// Responses are computed at `submit` and held until the next `drain`, so the
/// workflow still observes them asynchronously. Used by tests and by small
/// in-memory catalogs where a worker thread buys nothing.
pub struct InlineLookup<L: RecordLookup> {
    lookup: L,
    ready: VecDeque<LookupResponse>,
}

impl<L: RecordLookup> InlineLookup<L> {
    /// Dispatcher that answers from `lookup` on the calling thread.
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            ready: VecDeque::new(),
        }
    }

    /// Number of responses waiting to be drained.
    pub fn pending(&self) -> usize {
        self.ready.len()
    }
}

impl<L: RecordLookup> LookupDispatch for InlineLookup<L> {
    fn submit(&mut self, request: LookupRequest) {
        self.ready
            .push_back(LookupResponse::resolve(request, &self.lookup));
    }

    fn drain(&mut self) -> Vec<LookupResponse> {
        self.ready.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl RecordLookup for Fixed {
        fn lookup(&self, code: &ScanCode) -> Result<RecordData, LookupError> {
            if code.as_str() == "REF1" {
                Ok(RecordData {
                    color: Some("Blue".to_string()),
                    ..RecordData::default()
                })
            } else {
                Err(LookupError::NotFound {
                    code: code.to_string(),
                })
            }
        }
    }

    fn request(ticket: u64, code: &str) -> LookupRequest {
        LookupRequest {
            ticket: LookupTicket::new(ticket),
            code: ScanCode::new(code).unwrap(),
        }
    }

    #[test]
    fn ticket_next_increments() {
        assert_eq!(LookupTicket::new(4).next(), LookupTicket::new(5));
    }

    #[test]
    fn inline_lookup_holds_responses_until_drained() {
        let mut dispatch = InlineLookup::new(Fixed);
        dispatch.submit(request(1, "REF1"));
        dispatch.submit(request(2, "NOPE"));
        assert_eq!(dispatch.pending(), 2);

        let responses = dispatch.drain();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].ticket, LookupTicket::new(1));
        assert!(responses[0].outcome.is_ok());
        assert_eq!(responses[1].code.as_str(), "NOPE");
        assert!(matches!(
            responses[1].outcome,
            Err(LookupError::NotFound { .. })
        ));

        assert!(dispatch.drain().is_empty());
    }
}
