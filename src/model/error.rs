//! Error types for scanmatch.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions up to [`AppError`], which `main` reports before exiting.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level startup/runtime failure
//!   - [`ConfigError`] - Config file unreadable or invalid
//!   - [`CatalogError`] - Record catalog missing or malformed
//!   - [`LoggingError`] - Log file/subscriber setup failed
//!   - `std::io::Error` - Terminal failures
//! - [`LookupError`] - Per-lookup failure, **never fatal**
//!
//! # Error Recovery Strategy
//!
//! Lookup failures are part of the normal workflow: the controller returns to reference
//! capture and shows a notice. Everything wrapped by [`AppError`] happens before the event
//! loop starts (or is a broken terminal) and ends the process.
//!
//! Two internal conditions are deliberately *not* errors: an Enter with an empty scan
//! buffer, and a lookup response for a code that is no longer pending. Both are dropped
//! silently (debug-logged).

use crate::config::loader::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// # Examples
///
/// ```
/// use scanmatch::model::error::{AppError, CatalogError};
/// use std::path::PathBuf;
///
/// let err: AppError = CatalogError::NotFound { path: PathBuf::from("/tmp/none.toml") }.into();
/// assert!(err.to_string().contains("/tmp/none.toml"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record catalog could not be loaded.
    ///
    /// **Recovery**: none at runtime. The operator must fix the catalog path or contents
    /// and restart; running without a catalog would reject every reference scan.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Without a working terminal the station cannot show results. Fatal: restore the
    /// terminal and exit.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Failure of a single record lookup.
///
/// At the workflow boundary both variants are handled identically: the pending reference
/// is dropped, a "not found" notice is shown, and no counter changes. They are kept apart
/// so logs can tell a missing record from a broken data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The data source answered, and has no record for the code.
    #[error("No record for code '{code}'")]
    NotFound {
        /// The code that was looked up.
        code: String,
    },

    /// The data source could not be consulted.
    ///
    /// Not retried automatically: the operator rescans if the source recovers.
    #[error("Lookup transport failure: {reason}")]
    Transport {
        /// Human-readable cause.
        reason: String,
    },
}

impl LookupError {
    /// True for a definitive "no such record" answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Errors loading a record catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use scanmatch::model::error::CatalogError;
    /// use std::path::PathBuf;
    ///
    /// let err = CatalogError::NotFound { path: PathBuf::from("/srv/catalog.toml") };
    /// assert!(err.to_string().contains("Catalog not found"));
    /// ```
    #[error("Catalog not found: {path}")]
    NotFound {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The catalog file exists but could not be read.
    #[error("Failed to read catalog at {path}: {reason}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// I/O error description.
        reason: String,
    },

    /// The catalog contents are not valid TOML/JSON for the catalog schema.
    #[error("Invalid catalog in {path}: {reason}")]
    Parse {
        /// Path with invalid contents.
        path: PathBuf,
        /// Parser error description.
        reason: String,
    },

    /// Two records share the same code.
    #[error("Duplicate code '{code}' in catalog")]
    DuplicateCode {
        /// The repeated code.
        code: String,
    },

    /// A record has a blank code.
    #[error("Record #{index} in catalog has an empty code")]
    EmptyCode {
        /// Zero-based position of the record in the file.
        index: usize,
    },
}
