//! Background lookup dispatcher.
//!
//! Runs a [`RecordLookup`] on its own thread so a slow data source never stalls
//! key handling. Requests go over one channel, responses come back over
//! another, and the event loop drains responses without blocking.
//!
//! If the thread dies, later requests are answered locally with a transport
//! failure so a pending reference never waits forever.

use super::{LookupDispatch, LookupRequest, LookupResponse, RecordLookup};
use crate::model::LookupError;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Threaded [`LookupDispatch`].
///
/// Dropping the worker closes the request channel; the thread finishes the
/// lookup in progress (if any) and exits, and the drop joins it.
pub struct LookupWorker {
    requests: Option<Sender<LookupRequest>>,
    responses: Receiver<LookupResponse>,
    /// Failures for requests the thread could not accept.
    undeliverable: Vec<LookupResponse>,
    handle: Option<JoinHandle<()>>,
}

impl LookupWorker {
    /// Spawn the worker thread around `lookup`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the OS refuses to create the thread.
    pub fn spawn<L>(lookup: L) -> std::io::Result<Self>
    where
        L: RecordLookup + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<LookupRequest>();
        let (response_tx, response_rx) = mpsc::channel::<LookupResponse>();

        let handle = std::thread::Builder::new()
            .name("scanmatch-lookup".to_string())
            .spawn(move || {
                for request in request_rx {
                    debug!(ticket = request.ticket.value(), code = %request.code, "Looking up");
                    let response = LookupResponse::resolve(request, &lookup);
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                debug!("Lookup worker exiting");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            undeliverable: Vec::new(),
            handle: Some(handle),
        })
    }
}

impl LookupDispatch for LookupWorker {
    fn submit(&mut self, request: LookupRequest) {
        let sent = match &self.requests {
            Some(tx) => tx.send(request).map_err(|err| err.0),
            None => Err(request),
        };
        if let Err(request) = sent {
            warn!(code = %request.code, "Lookup worker has stopped; failing request");
            self.undeliverable.push(LookupResponse {
                ticket: request.ticket,
                code: request.code,
                outcome: Err(LookupError::Transport {
                    reason: "lookup worker stopped".to_string(),
                }),
            });
        }
    }

    fn drain(&mut self) -> Vec<LookupResponse> {
        let mut responses = std::mem::take(&mut self.undeliverable);
        loop {
            match self.responses.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Later submits fail locally instead of hitting the channel
                    if self.requests.take().is_some() {
                        warn!("Lookup worker disconnected");
                    }
                    break;
                }
            }
        }
        responses
    }
}

impl Drop for LookupWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Lookup worker panicked");
            }
        }
    }
}
