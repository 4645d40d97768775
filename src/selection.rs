//! Anchor/focus selection math.
//!
//! A selection rectangle must never cut through a merged cell. Starting from
//! the anchor and focus spans, the rectangle grows until every cell touching
//! it lies wholly inside. Only cells on the rectangle's border can stick out,
//! so each pass scans the border alone.

use crate::error::Result;
use crate::key::CellKey;
use crate::layout::Layout;
use crate::types::{Bounds, SelectionShape};

/// Compute the selection between `anchor` and `focus`.
///
/// Fails with [`crate::GridError::CellNotFound`] if either key is not in
/// `layout`.
pub fn compute_selection(layout: &Layout, anchor: CellKey, focus: CellKey) -> Result<SelectionShape> {
    let anchor_bounds = layout.position(anchor)?.bounds();
    if anchor == focus {
        return Ok(SelectionShape::new(anchor, focus, anchor_bounds, vec![anchor]));
    }

    let seed = anchor_bounds.union(layout.position(focus)?.bounds());
    let bounds = expand_to_whole_cells(layout, seed)?;
    let cells = layout.cells_in(bounds);
    Ok(SelectionShape::new(anchor, focus, bounds, cells))
}

/// Grow `bounds` until no cell on its border extends past it.
fn expand_to_whole_cells(layout: &Layout, mut bounds: Bounds) -> Result<Bounds> {
    let mut passes = 0usize;
    loop {
        passes += 1;
        let mut grown = bounds;

        let top_and_bottom = (bounds.min_column..=bounds.max_column)
            .flat_map(|column| [(bounds.min_row, column), (bounds.max_row, column)]);
        let left_and_right = (bounds.min_row..=bounds.max_row)
            .flat_map(|row| [(row, bounds.min_column), (row, bounds.max_column)]);

        for (row, column) in top_and_bottom.chain(left_and_right) {
            let key = layout.try_cell_at(row, column)?;
            grown = grown.union(layout.position(key)?.bounds());
        }

        if grown == bounds {
            log::trace!("selection stable after {passes} pass(es): {bounds:?}");
            return Ok(bounds);
        }
        bounds = grown;
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
    use crate::types::{Cell, Row};
    use std::collections::HashMap;

    fn layout_of(spec: &[&[(usize, usize)]]) -> (Layout, Vec<Vec<CellKey>>) {
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
        (Layout::build(&rows, &cells).unwrap(), keys)
    }

    #[test]
    fn test_single_cell_is_its_span() {
        let (layout, keys) = layout_of(&[&[(2, 2), (1, 1)], &[(1, 1)]]);
        let shape = compute_selection(&layout, keys[0][0], keys[0][0]).unwrap();
        assert_eq!(shape.bounds, Bounds::from_span(0, 0, 2, 2));
        assert_eq!(shape.cells(), &[keys[0][0]]);
    }

    #[test]
    fn test_plain_rectangle() {
        let (layout, keys) = layout_of(&[&[(1, 1); 3], &[(1, 1); 3], &[(1, 1); 3]]);
        let shape = compute_selection(&layout, keys[0][0], keys[1][1]).unwrap();
        assert_eq!(shape.bounds, Bounds::from_span(0, 0, 2, 2));
        assert_eq!(shape.len(), 4);
        assert!(!shape.contains(keys[2][2]));
    }

    #[test]
    fn test_expands_around_merge() {
        // Row 0: A B C; row 1: D E(1x2 spanning cols 1-2)
        let (layout, keys) = layout_of(&[&[(1, 1), (1, 1), (1, 1)], &[(1, 1), (1, 2)]]);
        let shape = compute_selection(&layout, keys[0][0], keys[1][0]).unwrap();
        assert_eq!(shape.bounds, Bounds::from_span(0, 0, 2, 1));

        // D..B crosses E, which pulls in column 2.
        let shape = compute_selection(&layout, keys[1][0], keys[0][1]).unwrap();
        assert_eq!(shape.bounds, Bounds::from_span(0, 0, 2, 3));
        assert!(shape.contains(keys[0][2]));
    }

    #[test]
    fn test_cascading_expansion() {
        let (layout, keys) = layout_of(&[
            &[(2, 1), (1, 1), (1, 1)],
            &[(2, 1), (1, 1)],
            &[(1, 1), (1, 1)],
        ]);
        // row0: A(0,0 2x1) B(0,1) D(0,2); row1: C(1,1 2x1) E(1,2); row2: G(2,0) F(2,2)
        let shape = compute_selection(&layout, keys[0][1], keys[0][0]).unwrap();
        // A drags in row 1, where C drags in row 2.
        assert_eq!(shape.bounds, Bounds::from_span(0, 0, 3, 2));
    }

    #[test]
    fn test_fixed_point_idempotent() {
        let (layout, keys) = layout_of(&[&[(1, 1), (1, 1), (1, 1)], &[(1, 1), (1, 2)]]);
        let first = compute_selection(&layout, keys[1][0], keys[0][1]).unwrap();
        let top_left = layout.cell_at(first.bounds.min_row, first.bounds.min_column).unwrap();
        let bottom_right = layout.cell_at(first.bounds.max_row, first.bounds.max_column).unwrap();
        let second = compute_selection(&layout, top_left, bottom_right).unwrap();
        assert_eq!(first.bounds, second.bounds);
    }

    #[test]
    fn test_unknown_key() {
        let (layout, keys) = layout_of(&[&[(1, 1)]]);
        let stray = CellKey::generate();
        assert!(compute_selection(&layout, keys[0][0], stray).is_err());
        assert!(compute_selection(&layout, stray, stray).is_err());
    }
}
