//! Toast-style notice queue for the presentation layer.

use crate::model::Notice;
use crate::scan::earliest;
use std::collections::VecDeque;
use std::time::Instant;

/// Default number of notices visible at once.
pub const DEFAULT_MAX_NOTICES: usize = 3;

/// A notice together with the instant it stops being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotice {
    /// The notice itself.
    pub notice: Notice,
    /// First instant at which it is no longer shown.
    pub expires_at: Instant,
}

/// Holds recent notices until their display duration runs out.
///
/// Newest last. When full, posting drops the oldest.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: VecDeque<ActiveNotice>,
    capacity: usize,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NOTICES)
    }
}

impl NoticeBoard {
    /// Create a board showing at most `capacity` notices (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            notices: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Show `notice` from `now` for its duration.
    pub fn post(&mut self, notice: Notice, now: Instant) {
        let expires_at = now + notice.duration;
        self.notices.push_back(ActiveNotice { notice, expires_at });
        while self.notices.len() > self.capacity {
            self.notices.pop_front();
        }
    }

    /// Drop notices whose time is up. Returns `true` if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.expires_at > now);
        self.notices.len() != before
    }

    /// Visible notices, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveNotice> {
        self.notices.iter()
    }

    /// Most recently posted notice still visible.
    pub fn latest(&self) -> Option<&ActiveNotice> {
        self.notices.back()
    }

    /// Earliest expiry among visible notices.
    pub fn deadline(&self) -> Option<Instant> {
        self.notices
            .iter()
            .map(|n| n.expires_at)
            .fold(None, |acc, t| earliest(acc, Some(t)))
    }

    /// Number of visible notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Maximum notices shown at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
