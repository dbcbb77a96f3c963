//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod error;
pub mod key_action;
pub mod notice;
pub mod record;
pub mod scan;

// Re-export for convenience
pub use error::{AppError, CatalogError, LookupError};
pub use key_action::UserAction;
pub use notice::{Notice, NoticeKind, Severity};
pub use record::RecordData;
pub use scan::{CompletedScan, EmptyScanCode, RawKeyEvent, ScanCode};
