//! Reconstruction of discrete scans from a keystroke stream.
//!
//! Scanners come in two flavours: those that finish each scan with Enter, and
//! those that just stop sending characters. The accumulator handles both. Enter
//! completes the buffer immediately; otherwise the buffer completes once no
//! character has arrived for the inactivity timeout.
//!
//! Both completion paths clear the buffer and disarm the inactivity timer, so a
//! scan is emitted at most once regardless of which path wins.
//!
//! A person typing with pauses longer than the timeout will produce several
//! short scans. That is inherent to inferring boundaries from timing.

use super::timer::TimerSlot;
use crate::model::{CompletedScan, RawKeyEvent, ScanCode};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default gap after which a terminator-less scan is considered complete.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_millis(100);

/// What happened to a key handed to [`ScanAccumulator::on_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Character appended; inactivity timer re-armed.
    Buffered,
    /// Enter completed a non-empty buffer.
    Completed(CompletedScan),
    /// Enter with nothing buffered.
    EmptyTerminator,
    /// Character not accepted as scan input; suppressed.
    Ignored,
}

/// Buffers scan characters and decides when a scan is complete.
#[derive(Debug, Clone)]
pub struct ScanAccumulator {
    buffer: String,
    inactivity: TimerSlot,
    timeout: Duration,
}

impl Default for ScanAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_TIMEOUT)
    }
}

impl ScanAccumulator {
    /// Create an accumulator with the given inactivity timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            buffer: String::new(),
            inactivity: TimerSlot::new(),
            timeout,
        }
    }

    /// Feed one key event received at `now`.
    pub fn on_key(&mut self, event: RawKeyEvent, now: Instant) -> KeyOutcome {
        match event {
            RawKeyEvent::Enter => match self.take_scan() {
                Some(scan) => {
                    debug!(code = %scan, "Scan completed by terminator");
                    KeyOutcome::Completed(scan)
                }
                None => KeyOutcome::EmptyTerminator,
            },
            RawKeyEvent::Char(c) if c.is_ascii_alphanumeric() => {
                self.buffer.push(c);
                self.inactivity.arm(now, self.timeout);
                KeyOutcome::Buffered
            }
            RawKeyEvent::Char(c) => {
                trace!(?c, "Ignoring non-alphanumeric key");
                KeyOutcome::Ignored
            }
        }
    }

    /// Complete the buffer if the inactivity timer has fired by `now`.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<CompletedScan> {
        if !self.inactivity.fire_if_due(now) {
            return None;
        }

        let scan = self.take_scan();
        if let Some(scan) = &scan {
            debug!(code = %scan, "Scan completed by inactivity timeout");
        }
        scan
    }

    /// Characters received since the last completed scan.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// When the inactivity timer will fire, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.inactivity.deadline()
    }

    /// Configured inactivity timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drop any partial scan and disarm the timer.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.inactivity.cancel();
    }

    /// Take the trimmed buffer contents, leaving the accumulator idle.
    fn take_scan(&mut self) -> Option<CompletedScan> {
        self.inactivity.cancel();
        let raw = std::mem::take(&mut self.buffer);
        ScanCode::new(raw).ok()
    }
}
