//! Descriptive record data returned by lookups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive fields for a scanned item.
///
/// The well-known fields are optional because catalogs differ in what they
/// track. Any additional string keys land in `extra` and are displayed after
/// the well-known fields in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    /// Storage or production area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// Item type (`type` in catalog files).
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    /// Model or style name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Main material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Size label, kept as text (`42`, `M`, `10.5`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Catalog-specific fields not covered above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl RecordData {
    /// Labelled, non-empty fields in display order.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        let known = [
            ("Area", &self.area),
            ("Type", &self.kind),
            ("Style", &self.style),
            ("Material", &self.material),
            ("Color", &self.color),
            ("Size", &self.size),
        ];

        known
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }

    /// True when the record carries no displayable fields.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
