use serde::{Deserialize, Serialize};

use crate::key::{CellKey, RowKey};

/// A single grid cell: identity, header flag and span.
///
/// The cell's payload lives in the table's data map under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub key: CellKey,
    pub header: bool,
    /// Number of grid rows covered (>= 1)
    pub row_span: usize,
    /// Number of grid columns covered (>= 1)
    pub column_span: usize,
}

impl Cell {
    /// A new 1x1 data cell with a fresh key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: CellKey::generate(),
            header: false,
            row_span: 1,
            column_span: 1,
        }
    }

    /// A new 1x1 header cell with a fresh key.
    #[must_use]
    pub fn header() -> Self {
        Self {
            header: true,
            ..Self::new()
        }
    }

    /// A new 1x1 cell with a fresh key and the prototype's structural flags.
    #[must_use]
    pub fn like(proto: &Cell) -> Self {
        Self {
            header: proto.header,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_span(mut self, row_span: usize, column_span: usize) -> Self {
        self.row_span = row_span;
        self.column_span = column_span;
        self
    }

    /// True if the cell covers more than one grid slot.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.column_span > 1
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// A table row: the keys of the cells whose home row this is, left to right.
///
/// Cells spanning down from earlier rows are not repeated here, so a row may
/// hold fewer cells than the table has columns, or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    pub cells: Vec<CellKey>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<CellKey>) -> Self {
        Self {
            key: RowKey::generate(),
            cells,
        }
    }
}
