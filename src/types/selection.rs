use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::key::CellKey;

/// The stored part of a selection: the fixed corner and the moving corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSelection {
    pub anchor: CellKey,
    pub focus: CellKey,
}

impl TableSelection {
    /// A selection of exactly one cell.
    #[must_use]
    pub fn single(key: CellKey) -> Self {
        Self {
            anchor: key,
            focus: key,
        }
    }
}

/// Inclusive rectangle of grid slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_column: usize,
    pub max_column: usize,
}

impl Bounds {
    /// Bounds covering `row_span x column_span` slots starting at `(row, column)`.
    #[must_use]
    pub fn from_span(row: usize, column: usize, row_span: usize, column_span: usize) -> Self {
        Self {
            min_row: row,
            max_row: row + row_span.max(1) - 1,
            min_column: column,
            max_column: column + column_span.max(1) - 1,
        }
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn union(self, other: Bounds) -> Self {
        Self {
            min_row: self.min_row.min(other.min_row),
            max_row: self.max_row.max(other.max_row),
            min_column: self.min_column.min(other.min_column),
            max_column: self.max_column.max(other.max_column),
        }
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn width(&self) -> usize {
        self.max_column - self.min_column + 1
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.min_row..=self.max_row).contains(&row)
            && (self.min_column..=self.max_column).contains(&column)
    }
}

/// The derived selection: corners, bounding rectangle and covered cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionShape {
    pub anchor: CellKey,
    pub focus: CellKey,
    pub bounds: Bounds,
    /// Selected keys in row-major order of first appearance
    cells: Vec<CellKey>,
    members: HashSet<CellKey>,
}

impl SelectionShape {
    pub(crate) fn new(anchor: CellKey, focus: CellKey, bounds: Bounds, cells: Vec<CellKey>) -> Self {
        let members = cells.iter().copied().collect();
        Self {
            anchor,
            focus,
            bounds,
            cells,
            members,
        }
    }

    /// Selected keys, row-major.
    pub fn cells(&self) -> &[CellKey] {
        &self.cells
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.members.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if exactly one cell is selected (possibly a merged one).
    pub fn is_single_cell(&self) -> bool {
        self.cells.len() == 1
    }
}
