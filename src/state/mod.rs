//! Workflow state machine (pure).
//!
//! All state transitions are pure functions of their inputs and the current
//! instant, testable without a terminal.

pub mod controller;
pub mod notice_board;

// Re-export for convenience
pub use controller::{
    ComparisonResult, ControllerSnapshot, Counters, Effect, Mode, PendingReference,
    ScanModeController, DEFAULT_RESULT_DISPLAY,
};
pub use notice_board::{ActiveNotice, NoticeBoard, DEFAULT_MAX_NOTICES};
