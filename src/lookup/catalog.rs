//! File-backed record catalog.
//!
//! A catalog is a list of records keyed by code, stored as TOML:
//!
//! ```toml
//! [[records]]
//! code = "REF1"
//! area = "Warehouse A"
//! type = "Shoe"
//! color = "Black"
//! ```
//!
//! or as JSON (`{"records": [...]}`) when the file extension is `.json`.
//! Values must be strings. Keys other than the well-known record fields are
//! kept as extra fields.

use super::RecordLookup;
use crate::model::{CatalogError, LookupError, RecordData, ScanCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    records: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    code: String,
    #[serde(flatten)]
    record: RecordData,
}

/// In-memory record catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogLookup {
    records: HashMap<String, RecordData>,
}

impl CatalogLookup {
    /// Build a catalog from `(code, record)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCode`] for a blank code and
    /// [`CatalogError::DuplicateCode`] when a code repeats.
    pub fn from_records<I, S>(records: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, RecordData)>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (index, (code, record)) in records.into_iter().enumerate() {
            let code = ScanCode::new(code.as_ref())
                .map_err(|_| CatalogError::EmptyCode { index })?
                .into_inner();
            if map.contains_key(&code) {
                return Err(CatalogError::DuplicateCode { code });
            }
            map.insert(code, record);
        }
        Ok(Self { records: map })
    }

    /// Load a catalog file. The format is chosen by extension: `.json` is
    /// JSON, anything else is TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the file is missing, `Read` or
    /// `Parse` for unreadable or malformed contents, and the
    /// [`from_records`](Self::from_records) errors for bad codes.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CatalogError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let catalog = Self::parse(&contents, is_json(path)).map_err(|e| match e {
            ParseFailure::Syntax(reason) => CatalogError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            ParseFailure::Catalog(err) => err,
        })?;

        info!(path = %path.display(), records = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Load the catalog at `path`, tolerating a missing file only when
    /// `path` is the `default` location nobody asked for explicitly.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), except that a missing file at `default`
    /// yields an empty catalog.
    pub fn load_configured(
        path: impl AsRef<Path>,
        default: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(CatalogError::NotFound { .. }) if path == default.as_ref() => {
                warn!(
                    path = %path.display(),
                    "No catalog at default path; every reference will be reported not found"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    fn parse(contents: &str, json: bool) -> Result<Self, ParseFailure> {
        let file: CatalogFile = if json {
            serde_json::from_str(contents).map_err(|e| ParseFailure::Syntax(e.to_string()))?
        } else {
            toml::from_str(contents).map_err(|e| ParseFailure::Syntax(e.to_string()))?
        };

        Self::from_records(file.records.into_iter().map(|e| (e.code, e.record)))
            .map_err(ParseFailure::Catalog)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse failure before a file path is attached.
#[derive(Debug)]
enum ParseFailure {
    Syntax(String),
    Catalog(CatalogError),
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl RecordLookup for CatalogLookup {
    fn lookup(&self, code: &ScanCode) -> Result<RecordData, LookupError> {
        self.records
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                code: code.to_string(),
            })
    }
}

/// Resolve default catalog path.
///
/// Returns `~/.config/scanmatch/catalog.toml` on Unix-like systems, or
/// `catalog.toml` in the current directory if no config directory exists.
pub fn default_catalog_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("scanmatch").join("catalog.toml"))
        .unwrap_or_else(|| PathBuf::from("catalog.toml"))
}
