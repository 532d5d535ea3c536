//! Display font shared by all cells of a watch table.

use serde::{Deserialize, Serialize};

/// Font family and size applied to every cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFont {
    pub family: String,
    pub point_size: f32,
}

impl Default for TableFont {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            point_size: 10.0,
        }
    }
}

impl TableFont {
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
        }
    }
}

/// Font resolved for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFont {
    pub font: TableFont,
    /// Value cells whose text changed in the last evaluation render bold.
    pub bold: bool,
}
