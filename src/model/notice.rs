//! User-facing notifications emitted by the workflow.
//!
//! The controller never renders anything. It describes what happened as a
//! [`Notice`] and leaves presentation (placement, stacking, styling) to the
//! view layer.

use std::time::Duration;

/// How prominent a notice should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// A positive outcome (confirmation, match).
    Success,
    /// Something the operator must act on.
    Error,
}

/// What a notice is about. Each workflow event has its own kind so the
/// presentation layer can tell them apart without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// A scan was accepted as a candidate reference.
    ScanAccepted,
    /// The candidate reference could not be looked up.
    LookupFailed,
    /// The candidate reference was confirmed and saved.
    ReferenceConfirmed,
    /// The candidate reference was discarded.
    ReferenceCancelled,
    /// A comparison scan equalled the reference.
    ComparisonMatch,
    /// A comparison scan differed from the reference.
    ComparisonNoMatch,
    /// Counters and codes were cleared.
    WorkflowReset,
}

impl NoticeKind {
    /// Severity shown for this kind.
    pub fn severity(self) -> Severity {
        match self {
            NoticeKind::ScanAccepted
            | NoticeKind::ReferenceCancelled
            | NoticeKind::WorkflowReset => Severity::Info,
            NoticeKind::ReferenceConfirmed | NoticeKind::ComparisonMatch => Severity::Success,
            NoticeKind::LookupFailed | NoticeKind::ComparisonNoMatch => Severity::Error,
        }
    }

    /// How long a notice of this kind stays visible.
    pub fn display_duration(self) -> Duration {
        match self.severity() {
            Severity::Error => Duration::from_millis(3000),
            Severity::Info | Severity::Success => Duration::from_millis(2000),
        }
    }
}

/// A discrete, displayable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// What happened.
    pub kind: NoticeKind,
    /// Short headline.
    pub title: String,
    /// One-line detail shown after the title.
    pub description: String,
    /// Derived from `kind`.
    pub severity: Severity,
    /// How long the notice stays visible.
    pub duration: Duration,
}

impl Notice {
    /// Build a notice whose severity and duration follow from its kind.
    pub fn new(kind: NoticeKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            severity: kind.severity(),
            duration: kind.display_duration(),
        }
    }
}
