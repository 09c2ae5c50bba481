//! The six-section grid bundle and its copy-on-write mutations.
//!
//! Every mutation returns a fresh bundle; the input is never modified, so a
//! caller can keep earlier bundles as history snapshots. Map keys serialize
//! as strings, matching the historical JSON grid files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cell::{CellValue, SubFlag};
use super::cycle;
use super::reference::ReferenceData;
use super::GridError;
use crate::models::Section;

/// Column index → cell value. Column 0 is reserved for the date/label column
/// and never carries grid data.
pub type Row = BTreeMap<u32, CellValue>;

/// Row index → row. In practice sessions populate row 0 only, but nothing
/// here assumes that.
pub type Grid = BTreeMap<u32, Row>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridBundle {
    #[serde(default)]
    pub poyet: Grid,
    #[serde(default)]
    pub organes: Grid,
    #[serde(default)]
    pub somato: Grid,
    #[serde(default)]
    pub sutures: Grid,
    #[serde(default, rename = "intraOsseuse")]
    pub intra_osseuse: Grid,
    #[serde(default)]
    pub specifique: Grid,
}

impl GridBundle {
    /// All six sections empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn section(&self, section: Section) -> &Grid {
        match section {
            Section::Poyet => &self.poyet,
            Section::Organes => &self.organes,
            Section::Somato => &self.somato,
            Section::Sutures => &self.sutures,
            Section::IntraOsseuse => &self.intra_osseuse,
            Section::Specifique => &self.specifique,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Grid {
        match section {
            Section::Poyet => &mut self.poyet,
            Section::Organes => &mut self.organes,
            Section::Somato => &mut self.somato,
            Section::Sutures => &mut self.sutures,
            Section::IntraOsseuse => &mut self.intra_osseuse,
            Section::Specifique => &mut self.specifique,
        }
    }

    pub fn read_cell(&self, section: Section, row: u32, col: u32) -> Option<&CellValue> {
        self.section(section).get(&row).and_then(|r| r.get(&col))
    }

    /// Primary toggle. Arrow columns (per the reference metadata) cycle
    /// empty → ↑ → ↓; everything else toggles the plain `X` mark.
    ///
    /// Column indices are not validated against the metadata: the store does
    /// not own the column list, and the projections simply label unknown
    /// indices generically.
    pub fn toggle_cell(
        &self,
        reference: &ReferenceData,
        section: Section,
        row: u32,
        col: u32,
    ) -> GridBundle {
        let current = self.read_cell(section, row, col).cloned().unwrap_or_default();
        let next = if reference.is_arrow_column(section, col) {
            cycle::next_arrow(&current)
        } else {
            cycle::next_plain(&current)
        };
        self.with_cell(section, row, col, next)
    }

    /// Toggle one half of a dual-flag cell. Only the organ section carries
    /// dual-flag cells; any other section is rejected.
    pub fn toggle_sub_flag(
        &self,
        section: Section,
        row: u32,
        col: u32,
        flag: SubFlag,
    ) -> Result<GridBundle, GridError> {
        if section != Section::Organes {
            return Err(GridError::WrongCellShape(section));
        }
        let current = self.read_cell(section, row, col).cloned().unwrap_or_default();
        let next = cycle::next_sub_flag(&current, flag);
        Ok(self.with_cell(section, row, col, next))
    }

    /// Direct assignment from the symbol picker (`""` clears).
    pub fn assign_cell(&self, section: Section, row: u32, col: u32, symbol: &str) -> GridBundle {
        self.with_cell(section, row, col, cycle::assign(symbol))
    }

    fn with_cell(&self, section: Section, row: u32, col: u32, value: CellValue) -> GridBundle {
        let mut next = self.clone();
        next.section_mut(section)
            .entry(row)
            .or_default()
            .insert(col, value);
        next
    }

    /// Number of corrections noted in row 0 of a section: any set mark or
    /// arrow, or a dual-flag cell with either marker set.
    pub fn correction_count(&self, section: Section) -> usize {
        self.section(section)
            .get(&0)
            .map(|row| row.values().filter(|v| v.is_set()).count())
            .unwrap_or(0)
    }
}
