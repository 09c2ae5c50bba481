//! Table projection: turns a grid snapshot into (title, header, rows) blocks
//! for a document renderer, plus the symbolic-interpretation appendix.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::grid::{CellValue, Direction, Grid, GridBundle, ReferenceData, SectionMeta};
use crate::interpretations::InterpretationCatalog;
use crate::models::Section;

/// One renderable table: optional sub-title (group name), header row, body rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub title: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// All tables of one section. Grouped sections (sutures) carry one block per
/// group; flat sections carry a single untitled block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionBlock {
    pub section: Section,
    pub title: String,
    pub grouped: bool,
    pub tables: Vec<TableBlock>,
}

/// One appendix line: element label and its resolved interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendixRow {
    pub element: String,
    pub psych: String,
    pub lien: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionTables {
    pub sections: Vec<SectionBlock>,
    pub appendix: Vec<AppendixRow>,
}

/// Project a grid snapshot into renderable tables.
///
/// Sections and groups with no populated rows are omitted, as are columns
/// that render empty across every emitted row. Every column label that held
/// a value anywhere feeds the interpretation appendix.
pub fn project_session_tables(
    grids: &GridBundle,
    reference: &ReferenceData,
    catalog: &InterpretationCatalog,
) -> SessionTables {
    let mut captured: BTreeSet<String> = BTreeSet::new();
    let mut sections = Vec::new();

    for section in Section::ALL {
        let meta = reference.section(section);
        let grid = grids.section(section);
        let grouped = !meta.groups.is_empty();

        let mut tables = Vec::new();
        if grouped {
            for group in &meta.groups {
                if let Some(table) =
                    build_table(grid, meta, &group.columns, Some(group.name.clone()), &mut captured)
                {
                    tables.push(table);
                }
            }
        } else if let Some(table) =
            build_table(grid, meta, &meta.data_columns(), None, &mut captured)
        {
            tables.push(table);
        }

        if !tables.is_empty() {
            sections.push(SectionBlock {
                section,
                title: meta.title.clone(),
                grouped,
                tables,
            });
        }
    }

    let appendix = captured
        .into_iter()
        .filter_map(|element| {
            let interp = catalog.lookup(&element)?;
            if !interp.has_content() {
                return None;
            }
            Some(AppendixRow {
                element,
                psych: field_or_dash(interp.psych),
                lien: field_or_dash(interp.lien),
            })
        })
        .collect();

    SessionTables { sections, appendix }
}

fn field_or_dash(field: Option<String>) -> String {
    match field {
        Some(s) if !s.trim().is_empty() => s,
        _ => "-".to_string(),
    }
}

/// Build one table over the target columns, or `None` when no row has a
/// value there or every data column elides.
fn build_table(
    grid: &Grid,
    meta: &SectionMeta,
    target: &[u32],
    title: Option<String>,
    captured: &mut BTreeSet<String>,
) -> Option<TableBlock> {
    let mut body: Vec<Vec<String>> = Vec::new();

    for (&row_idx, row) in grid {
        let has_value = target
            .iter()
            .any(|c| row.get(c).is_some_and(CellValue::is_set));
        if !has_value {
            continue;
        }

        let mut cells = Vec::with_capacity(target.len() + 1);
        cells.push(format!("S{}", row_idx + 1));
        for &col in target {
            let value = row.get(&col);
            if value.is_some_and(|v| v.is_set()) {
                captured.insert(meta.column_label(col));
            }
            cells.push(value.map(format_cell).unwrap_or_default());
        }
        body.push(cells);
    }

    if body.is_empty() {
        return None;
    }

    // Sparse-column elision: drop data columns that rendered empty in every
    // row. (The legacy "!" sentinel renders empty and can elide a column
    // even though its label was captured above.)
    let kept: Vec<usize> = (0..target.len())
        .filter(|&j| body.iter().any(|row| !row[j + 1].is_empty()))
        .collect();
    if kept.is_empty() {
        return None;
    }

    let header = std::iter::once(meta.column_label(0))
        .chain(kept.iter().map(|&j| meta.column_label(target[j])))
        .collect();
    let rows = body
        .into_iter()
        .map(|row| {
            std::iter::once(row[0].clone())
                .chain(kept.iter().map(|&j| row[j + 1].clone()))
                .collect()
        })
        .collect();

    Some(TableBlock { title, header, rows })
}

/// Printable form of a cell. Arrows localize to words, the legacy `"!"`
/// sentinel renders empty, dual flags list their set markers.
fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Mark(s) if s == "!" => String::new(),
        CellValue::Mark(s) => s.clone(),
        CellValue::Directional(Direction::Up) => "Haut".to_string(),
        CellValue::Directional(Direction::Down) => "Bas".to_string(),
        CellValue::DualFlag {
            intrinsic,
            physiologic,
        } => {
            let mut parts = Vec::new();
            if *intrinsic {
                parts.push("Intrinsèque");
            }
            if *physiologic {
                parts.push("Physiologique");
            }
            parts.join(", ")
        }
    }
}
