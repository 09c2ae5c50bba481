//! Cell values and their legacy wire encoding.
//!
//! Historically a cell was either a bare string (`""`, `"X"`, `"/"`, `"↑"`, …)
//! or a `{sub1, sub2}` object for the organ grid. The in-memory model is a
//! tagged variant; the serde impls keep the historical JSON shape so stored
//! session files deserialize unchanged.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::GridError;

/// Arrow direction for columns that cycle empty → up → down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

/// Which half of a dual-flag cell a toggle targets.
///
/// Wire keys are `sub1` (intrinsic) and `sub2` (the physiological axis,
/// "Ysio" on screen). Anything else is rejected at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubFlag {
    Intrinsic,
    Physiologic,
}

impl SubFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubFlag::Intrinsic => "sub1",
            SubFlag::Physiologic => "sub2",
        }
    }
}

impl std::str::FromStr for SubFlag {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sub1" => Ok(SubFlag::Intrinsic),
            "sub2" => Ok(SubFlag::Physiologic),
            other => Err(GridError::UnknownSubFlag(other.to_string())),
        }
    }
}

/// Value held at one (section, row, column) coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    /// Unset.
    #[default]
    Empty,
    /// A picked or toggled symbol: `"X"`, `"/"`, `"O"`, `"∆"`, …
    Mark(String),
    /// Arrow-column value.
    Directional(Direction),
    /// Organ-grid cell with two independent markers.
    DualFlag { intrinsic: bool, physiologic: bool },
}

impl CellValue {
    /// A mark, normalizing the empty symbol to [`CellValue::Empty`].
    pub fn mark(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        if symbol.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Mark(symbol)
        }
    }

    /// Value for a directly assigned picker symbol. Arrows map to their
    /// directional variant, `""` clears.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "↑" => CellValue::Directional(Direction::Up),
            "↓" => CellValue::Directional(Direction::Down),
            other => CellValue::mark(other),
        }
    }

    /// Whether the cell counts as a correction: any mark, any arrow, or a
    /// dual-flag cell with at least one marker set.
    pub fn is_set(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Mark(s) => !s.is_empty(),
            CellValue::Directional(_) => true,
            CellValue::DualFlag {
                intrinsic,
                physiologic,
            } => *intrinsic || *physiologic,
        }
    }
}

const FLAG_SET: &str = "X";

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Mark(s) => serializer.serialize_str(s),
            CellValue::Directional(d) => serializer.serialize_str(d.as_arrow()),
            CellValue::DualFlag {
                intrinsic,
                physiologic,
            } => {
                let mut st = serializer.serialize_struct("CellValue", 2)?;
                st.serialize_field("sub1", if *intrinsic { FLAG_SET } else { "" })?;
                st.serialize_field("sub2", if *physiologic { FLAG_SET } else { "" })?;
                st.end()
            }
        }
    }
}

/// Wire shape: bare string or `{sub1, sub2}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellValueWire {
    Text(String),
    Dual {
        #[serde(default)]
        sub1: String,
        #[serde(default)]
        sub2: String,
    },
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = CellValueWire::deserialize(deserializer)
            .map_err(|_| de::Error::custom("cell value must be a string or a {sub1, sub2} object"))?;
        Ok(match wire {
            CellValueWire::Text(s) => CellValue::from_symbol(&s),
            CellValueWire::Dual { sub1, sub2 } => CellValue::DualFlag {
                intrinsic: !sub1.is_empty(),
                physiologic: !sub2.is_empty(),
            },
        })
    }
}
