//! Scan reconstruction (pure).
//!
//! Turns raw key events into completed scans. No I/O; time is passed in.

pub mod accumulator;
pub mod timer;

pub use accumulator::{KeyOutcome, ScanAccumulator, DEFAULT_SCAN_TIMEOUT};
pub use timer::{earliest, TimerSlot};
