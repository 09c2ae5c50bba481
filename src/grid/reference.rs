//! Section reference metadata: column labels, arrow columns, column groups,
//! the symbol palette and the symbol → suggested-correction table.
//!
//! Loaded once at startup and treated as immutable for the process lifetime.
//! A load or validation failure is a startup error, never a per-call
//! fallback branch.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::Section;

const BUNDLED_REFERENCE: &str = include_str!("../../resources/reference_data.json");

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("cannot read reference data from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("cannot parse reference data: {0}")]
    Parse(String),

    #[error("invalid reference data: {0}")]
    Invalid(String),
}

/// A named subset of a section's columns, rendered as its own sub-table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnGroup {
    pub name: String,
    pub columns: Vec<u32>,
}

/// Metadata for one section. Column 0 is the non-data date/label column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionMeta {
    pub title: String,
    pub columns: Vec<String>,
    #[serde(default, rename = "arrowColumns")]
    pub arrow_columns: Vec<u32>,
    #[serde(default)]
    pub groups: Vec<ColumnGroup>,
}

impl SectionMeta {
    /// Label for a column index, with the historical fallback for indices
    /// outside the declared range.
    pub fn column_label(&self, col: u32) -> String {
        self.columns
            .get(col as usize)
            .cloned()
            .unwrap_or_else(|| format!("Col {col}"))
    }

    /// Data column indices (everything except the label column 0).
    pub fn data_columns(&self) -> Vec<u32> {
        (1..self.columns.len() as u32).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceData {
    pub poyet: SectionMeta,
    pub organes: SectionMeta,
    pub somato: SectionMeta,
    pub sutures: SectionMeta,
    #[serde(rename = "intraOsseuse")]
    pub intra_osseuse: SectionMeta,
    pub specifique: SectionMeta,
    /// Palette offered by the symbol picker.
    pub symbols: Vec<String>,
    /// Symbol → suggested correction, shown alongside the grids.
    #[serde(default)]
    pub corrections: BTreeMap<String, String>,
}

impl ReferenceData {
    /// The reference data bundled with the application.
    pub fn bundled() -> Result<Self, ReferenceError> {
        Self::from_json(BUNDLED_REFERENCE)
    }

    /// Load reference data from an external JSON file.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| ReferenceError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let data: ReferenceData =
            serde_json::from_str(json).map_err(|e| ReferenceError::Parse(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn section(&self, section: Section) -> &SectionMeta {
        match section {
            Section::Poyet => &self.poyet,
            Section::Organes => &self.organes,
            Section::Somato => &self.somato,
            Section::Sutures => &self.sutures,
            Section::IntraOsseuse => &self.intra_osseuse,
            Section::Specifique => &self.specifique,
        }
    }

    /// Whether a column uses the empty → ↑ → ↓ cycle.
    pub fn is_arrow_column(&self, section: Section, col: u32) -> bool {
        self.section(section).arrow_columns.contains(&col)
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        for section in Section::ALL {
            let meta = self.section(section);
            if meta.columns.len() < 2 {
                return Err(ReferenceError::Invalid(format!(
                    "section {section} needs the label column plus at least one data column"
                )));
            }
            let max = meta.columns.len() as u32;
            for &col in &meta.arrow_columns {
                if col == 0 || col >= max {
                    return Err(ReferenceError::Invalid(format!(
                        "section {section}: arrow column {col} out of range"
                    )));
                }
            }
            for group in &meta.groups {
                for &col in &group.columns {
                    if col == 0 || col >= max {
                        return Err(ReferenceError::Invalid(format!(
                            "section {section}, group {}: column {col} out of range",
                            group.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_reference_loads_and_validates() {
        let data = ReferenceData::bundled().unwrap();
        assert_eq!(data.poyet.title, "Poyet");
        assert_eq!(data.organes.columns[2], "FOIE");
        assert!(!data.symbols.is_empty());
    }

    #[test]
    fn only_poyet_has_arrow_columns() {
        let data = ReferenceData::bundled().unwrap();
        assert!(!data.poyet.arrow_columns.is_empty());
        for section in Section::ALL.into_iter().filter(|s| *s != Section::Poyet) {
            assert!(data.section(section).arrow_columns.is_empty());
        }
    }

    #[test]
    fn sutures_groups_cover_valid_columns() {
        let data = ReferenceData::bundled().unwrap();
        assert!(!data.sutures.groups.is_empty());
        let max = data.sutures.columns.len() as u32;
        for group in &data.sutures.groups {
            assert!(group.columns.iter().all(|&c| c >= 1 && c < max));
        }
    }

    #[test]
    fn is_arrow_column_consults_the_section_list() {
        let data = ReferenceData::bundled().unwrap();
        assert!(data.is_arrow_column(Section::Poyet, 7));
        assert!(!data.is_arrow_column(Section::Poyet, 1));
        assert!(!data.is_arrow_column(Section::Somato, 7));
    }

    #[test]
    fn column_label_falls_back_for_out_of_range_indices() {
        let data = ReferenceData::bundled().unwrap();
        assert_eq!(data.somato.column_label(1), "Crâne");
        assert_eq!(data.somato.column_label(99), "Col 99");
    }

    #[test]
    fn out_of_range_arrow_column_is_a_startup_error() {
        let json = r#"{
            "poyet": {"title": "Poyet", "columns": ["Dates", "A"], "arrowColumns": [5]},
            "organes": {"title": "Organes", "columns": ["Dates", "A"]},
            "somato": {"title": "Somato", "columns": ["Dates", "A"]},
            "sutures": {"title": "Sutures", "columns": ["Dates", "A"]},
            "intraOsseuse": {"title": "IO", "columns": ["Dates", "A"]},
            "specifique": {"title": "Spec", "columns": ["Dates", "A"]},
            "symbols": ["X"]
        }"#;
        let err = ReferenceData::from_json(json).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(_)));
    }

    #[test]
    fn section_without_data_columns_is_rejected() {
        let json = r#"{
            "poyet": {"title": "Poyet", "columns": ["Dates"]},
            "organes": {"title": "Organes", "columns": ["Dates", "A"]},
            "somato": {"title": "Somato", "columns": ["Dates", "A"]},
            "sutures": {"title": "Sutures", "columns": ["Dates", "A"]},
            "intraOsseuse": {"title": "IO", "columns": ["Dates", "A"]},
            "specifique": {"title": "Spec", "columns": ["Dates", "A"]},
            "symbols": ["X"]
        }"#;
        let err = ReferenceData::from_json(json).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(_)));
    }

    #[test]
    fn corrections_table_has_picker_symbols() {
        let data = ReferenceData::bundled().unwrap();
        assert!(data.corrections.contains_key("/"));
        assert!(data.corrections.contains_key("↑"));
    }
}
