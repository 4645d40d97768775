//! Dense grid layout derived from a table's rows and cells.
//!
//! Computed once per table snapshot so every position lookup afterwards is
//! O(1): `(row, column) -> key` through the grid, `key -> position` through the
//! position map.

use std::collections::HashMap;

use crate::error::{GridError, Result};
use crate::key::CellKey;
use crate::types::{Bounds, Cell, Row};

/// Upper bound on `row_count * column_count` for a single layout.
pub const MAX_GRID_SLOTS: usize = 1 << 24;

/// Where a cell sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Home (top) row
    pub row: usize,
    /// Home (left) column
    pub column: usize,
    /// Index of the cell in its home row's cell list
    pub index_in_row: usize,
    pub row_span: usize,
    pub column_span: usize,
}

impl CellPosition {
    /// Last row covered by the cell.
    pub fn end_row(&self) -> usize {
        self.row + self.row_span - 1
    }

    /// Last column covered by the cell.
    pub fn end_column(&self) -> usize {
        self.column + self.column_span - 1
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_span(self.row, self.column, self.row_span, self.column_span)
    }
}

/// Pre-computed grid for a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    row_count: usize,
    column_count: usize,
    /// Row-major, `row_count * column_count` slots
    grid: Vec<CellKey>,
    positions: HashMap<CellKey, CellPosition>,
}

impl Layout {
    /// Build the layout for `rows`, looking cells up in `cells`.
    ///
    /// Fails with [`GridError::CellNotFound`] for a row entry without a cell,
    /// and with [`GridError::InvalidTable`] if the cells do not tile a
    /// rectangle (overlaps, holes, spans running off the table) or would need
    /// more than [`MAX_GRID_SLOTS`] slots.
    pub fn build(rows: &[Row], cells: &HashMap<CellKey, Cell>) -> Result<Self> {
        let row_count = rows.len();

        // Column footprint: a tall cell is charged to every row it occupies.
        let mut footprint = vec![0usize; row_count];
        for (row_index, row) in rows.iter().enumerate() {
            for &key in &row.cells {
                let cell = cells.get(&key).ok_or(GridError::CellNotFound(key))?;
                if cell.row_span == 0 || cell.column_span == 0 {
                    return Err(GridError::InvalidTable(format!("{key} has an empty span")));
                }
                let charged = row_index
                    .checked_add(cell.row_span)
                    .and_then(|end_row| footprint.get_mut(row_index..end_row))
                    .ok_or_else(|| {
                        GridError::InvalidTable(format!(
                            "{key} spans {} rows from row {row_index} but the table has {row_count}",
                            cell.row_span
                        ))
                    })?;
                for width in charged {
                    *width = width
                        .checked_add(cell.column_span)
                        .filter(|&w| w <= MAX_GRID_SLOTS)
                        .ok_or_else(|| {
                            GridError::InvalidTable(format!(
                                "{key} spans {} columns, too wide",
                                cell.column_span
                            ))
                        })?;
                }
            }
        }
        let column_count = footprint.iter().copied().max().unwrap_or(0);

        let slot_count = row_count
            .checked_mul(column_count)
            .filter(|&n| n <= MAX_GRID_SLOTS)
            .ok_or_else(|| {
                GridError::InvalidTable(format!(
                    "{row_count}x{column_count} grid exceeds {MAX_GRID_SLOTS} slots"
                ))
            })?;
        let mut slots: Vec<Option<CellKey>> = vec![None; slot_count];
        let mut positions = HashMap::with_capacity(cells.len());

        for (row_index, row) in rows.iter().enumerate() {
            let mut column = 0;
            for (index_in_row, &key) in row.cells.iter().enumerate() {
                let cell = cells.get(&key).ok_or(GridError::CellNotFound(key))?;

                // Skip slots already claimed by taller cells from earlier rows.
                while column < column_count
                    && slots
                        .get(row_index * column_count + column)
                        .is_some_and(Option::is_some)
                {
                    column += 1;
                }
                if column + cell.column_span > column_count {
                    return Err(GridError::InvalidTable(format!(
                        "{key} in row {row_index} overflows {column_count} columns"
                    )));
                }

                for r in row_index..row_index + cell.row_span {
                    for c in column..column + cell.column_span {
                        let slot = slots
                            .get_mut(r * column_count + c)
                            .ok_or_else(|| GridError::InvalidTable(format!("{key} runs off the grid")))?;
                        if let Some(existing) = slot {
                            return Err(GridError::InvalidTable(format!(
                                "{key} overlaps {existing} at ({r}, {c})"
                            )));
                        }
                        *slot = Some(key);
                    }
                }

                let position = CellPosition {
                    row: row_index,
                    column,
                    index_in_row,
                    row_span: cell.row_span,
                    column_span: cell.column_span,
                };
                if positions.insert(key, position).is_some() {
                    return Err(GridError::InvalidTable(format!("{key} is listed twice")));
                }
                column += cell.column_span;
            }
        }

        let grid = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    GridError::InvalidTable(format!(
                        "slot ({}, {}) is not covered by any cell",
                        i / column_count,
                        i % column_count
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::trace!("built {row_count}x{column_count} layout for {} cells", positions.len());

        Ok(Self {
            row_count,
            column_count,
            grid,
            positions,
        })
    }

    /// Layout of a table holding one 1x1 cell.
    pub(crate) fn single_cell(key: CellKey) -> Self {
        let position = CellPosition {
            row: 0,
            column: 0,
            index_in_row: 0,
            row_span: 1,
            column_span: 1,
        };
        Self {
            row_count: 1,
            column_count: 1,
            grid: vec![key],
            positions: HashMap::from([(key, position)]),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Key of the cell covering `(row, column)`, if in range.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<CellKey> {
        if row >= self.row_count || column >= self.column_count {
            return None;
        }
        self.grid.get(row * self.column_count + column).copied()
    }

    /// Like [`Layout::cell_at`] but treats an out-of-range slot as a broken table.
    pub fn try_cell_at(&self, row: usize, column: usize) -> Result<CellKey> {
        self.cell_at(row, column).ok_or_else(|| {
            GridError::InvalidTable(format!(
                "({row}, {column}) is outside the {}x{} grid",
                self.row_count, self.column_count
            ))
        })
    }

    /// Position of `key`, or [`GridError::CellNotFound`].
    pub fn position(&self, key: CellKey) -> Result<&CellPosition> {
        self.positions.get(&key).ok_or(GridError::CellNotFound(key))
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.positions.contains_key(&key)
    }

    /// All placed cells with their positions, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = (CellKey, &CellPosition)> + '_ {
        self.positions.iter().map(|(&key, position)| (key, position))
    }

    /// Distinct keys covering `bounds`, row-major by first covered slot.
    pub fn cells_in(&self, bounds: Bounds) -> Vec<CellKey> {
        let mut seen = std::collections::HashSet::new();
        let mut keys = Vec::new();
        for row in bounds.min_row..=bounds.max_row {
            for column in bounds.min_column..=bounds.max_column {
                if let Some(key) = self.cell_at(row, column) {
                    if seen.insert(key) {
                        keys.push(key);
                    }
                }
            }
        }
        keys
    }

    /// Bounds of the whole grid (empty grids have no bounds).
    pub fn full_bounds(&self) -> Option<Bounds> {
        if self.row_count == 0 || self.column_count == 0 {
            return None;
        }
        Some(Bounds {
            min_row: 0,
            max_row: self.row_count - 1,
            min_column: 0,
            max_column: self.column_count - 1,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn store(spec: &[&[(usize, usize)]]) -> (Vec<Row>, HashMap<CellKey, Cell>, Vec<Vec<CellKey>>) {
        let mut cells = HashMap::new();
        let mut rows = Vec::new();
        let mut keys = Vec::new();
        for row_spec in spec {
            let row_keys: Vec<CellKey> = row_spec
                .iter()
                .map(|&(rs, cs)| {
                    let cell = Cell::new().with_span(rs, cs);
                    cells.insert(cell.key, cell);
                    cell.key
                })
                .collect();
            rows.push(Row::new(row_keys.clone()));
            keys.push(row_keys);
        }
        (rows, cells, keys)
    }

    #[test]
    fn test_plain_grid() {
        let (rows, cells, keys) = store(&[&[(1, 1), (1, 1)], &[(1, 1), (1, 1)]]);
        let layout = Layout::build(&rows, &cells).unwrap();
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.cell_at(1, 0), Some(keys[1][0]));
        assert_eq!(layout.position(keys[1][1]).unwrap().index_in_row, 1);
        assert_eq!(layout.cell_at(2, 0), None);
    }

    #[test]
    fn test_tall_cell_pushes_next_row() {
        // A spans rows 0-1 in column 0; row 1 only lists C.
        let (rows, cells, keys) = store(&[&[(2, 1), (1, 1)], &[(1, 1)]]);
        let layout = Layout::build(&rows, &cells).unwrap();
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.cell_at(1, 0), Some(keys[0][0]));
        let c = layout.position(keys[1][0]).unwrap();
        assert_eq!((c.row, c.column, c.index_in_row), (1, 1, 0));
    }

    #[test]
    fn test_empty_row_covered_by_merge() {
        let (rows, cells, keys) = store(&[&[(2, 2)], &[]]);
        let layout = Layout::build(&rows, &cells).unwrap();
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.cell_at(1, 1), Some(keys[0][0]));
    }

    #[test]
    fn test_span_past_last_row_is_invalid() {
        let (rows, cells, _) = store(&[&[(3, 1)], &[]]);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_oversized_spans_are_invalid() {
        // Widths that would overflow the footprint sum.
        let (rows, cells, _) = store(&[&[(1, usize::MAX), (1, 1)]]);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::InvalidTable(_))
        ));

        // Each row fits, the whole grid does not.
        let (rows, cells, _) = store(&[&[(1, 1 << 23)], &[(1, 1 << 23)], &[(1, 1 << 23)]]);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::InvalidTable(_))
        ));

        let (rows, cells, _) = store(&[&[(usize::MAX, 1)]]);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_hole_is_invalid() {
        let (rows, cells, _) = store(&[&[(1, 1), (1, 1)], &[(1, 1)]]);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_missing_cell() {
        let (mut rows, cells, _) = store(&[&[(1, 1)]]);
        let stray = CellKey::generate();
        rows[0].cells.push(stray);
        assert!(matches!(
            Layout::build(&rows, &cells),
            Err(GridError::CellNotFound(k)) if k == stray
        ));
    }

    #[test]
    fn test_cells_in_deduplicates() {
        let (rows, cells, keys) = store(&[&[(1, 2), (1, 1)], &[(1, 1), (1, 1), (1, 1)]]);
        let layout = Layout::build(&rows, &cells).unwrap();
        let all = layout.cells_in(layout.full_bounds().unwrap());
        assert_eq!(all.len(), 5);
        assert_eq!(all[0], keys[0][0]);
        assert_eq!(all[1], keys[0][1]);
    }
}
