//! Suggested corrections: resolve every symbol present in the main grids
//! against the reference correction table, for display alongside the session.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::grid::{CellValue, GridBundle, ReferenceData};
use crate::models::Section;

/// Sections whose symbols feed the suggestion panel.
const SCANNED_SECTIONS: [Section; 3] = [Section::Poyet, Section::Organes, Section::Somato];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionHint {
    pub symbol: String,
    pub suggestion: String,
}

/// Collect the distinct symbols present in the poyet/organes/somato grids and
/// return the ones the reference table has a suggestion for.
pub fn suggested_corrections(
    grids: &GridBundle,
    reference: &ReferenceData,
) -> Vec<CorrectionHint> {
    let mut symbols: BTreeSet<String> = BTreeSet::new();

    for section in SCANNED_SECTIONS {
        for row in grids.section(section).values() {
            for value in row.values() {
                match value {
                    CellValue::Mark(s) if !s.is_empty() => {
                        symbols.insert(s.clone());
                    }
                    CellValue::Directional(d) => {
                        symbols.insert(d.as_arrow().to_string());
                    }
                    CellValue::DualFlag { .. } if value.is_set() => {
                        symbols.insert("X".to_string());
                    }
                    _ => {}
                }
            }
        }
    }

    symbols
        .into_iter()
        .filter_map(|symbol| {
            reference.corrections.get(&symbol).map(|suggestion| CorrectionHint {
                symbol,
                suggestion: suggestion.clone(),
            })
        })
        .collect()
}
