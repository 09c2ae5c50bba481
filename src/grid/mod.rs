//! Session grid core: cell values, toggle rules, copy-on-write storage and
//! the reference metadata describing each section's columns.

pub mod cell;
pub mod cycle;
pub mod reference;
pub mod store;

pub use cell::{CellValue, Direction, SubFlag};
pub use reference::{ColumnGroup, ReferenceData, ReferenceError, SectionMeta};
pub use store::{Grid, GridBundle, Row};

use thiserror::Error;

use crate::models::Section;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("section {0} does not carry dual-flag cells")]
    WrongCellShape(Section),

    #[error("unknown sub-flag key: {0}")]
    UnknownSubFlag(String),
}
