//! Deleting the selected rows or columns.

use std::borrow::Cow;
use std::collections::HashSet;

use super::{insert_by_column, Edit, TableKind};
use crate::types::Table;

/// Delete every row the selection touches.
///
/// Cells reaching into the range from above shrink. Cells starting inside it
/// but reaching below shrink and move down to the first row after the range.
/// Cells wholly inside are removed with their data. Deleting every row leaves
/// the default single-cell table.
pub fn delete_selected_rows<'a, D>(table: &'a Table<D>, kind: &TableKind<D>) -> Edit<'a, D> {
    let layout = table.layout();
    let bounds = table.selection_shape().bounds;
    let (top, bottom) = (bounds.min_row, bounds.max_row);
    let row_count = layout.row_count();

    if top == 0 && bottom + 1 >= row_count {
        log::debug!("deleting all {row_count} rows, resetting table");
        return Ok(Cow::Owned(kind.new_table()));
    }

    let mut builder = table.to_builder();
    let mut moved_down = Vec::new();
    let mut removed = 0usize;

    for (key, position) in layout.positions() {
        let first = position.row.max(top);
        let last = position.end_row().min(bottom);
        if first > last {
            continue;
        }
        let overlap = last - first + 1;

        if position.row < top {
            builder.cell_mut(key)?.row_span -= overlap;
        } else if position.end_row() > bottom {
            builder.cell_mut(key)?.row_span -= overlap;
            moved_down.push((position.column, key));
        } else {
            builder.forget_cell(key)?;
            removed += 1;
        }
    }

    if !moved_down.is_empty() {
        insert_by_column(builder.row_mut(bottom + 1)?, layout, moved_down)?;
    }
    builder.rows_mut().drain(top..=bottom);

    let remaining = row_count - (bottom - top + 1);
    log::debug!("deleted rows {top}..={bottom}: {removed} cells removed, {remaining} rows left");

    let focus_row = if top < remaining { top } else { top - 1 };
    let focus_column = layout.position(table.focus())?.column;
    builder.build_focused_at(focus_row, focus_column).map(Cow::Owned)
}

/// Delete every column the selection touches.
///
/// Mirror image of [`delete_selected_rows`]. A cell starting inside the range
/// and reaching past it keeps its place in its row list, since no other cell
/// of that row can start between it and the range's end.
pub fn delete_selected_columns<'a, D>(table: &'a Table<D>, kind: &TableKind<D>) -> Edit<'a, D> {
    let layout = table.layout();
    let bounds = table.selection_shape().bounds;
    let (left, right) = (bounds.min_column, bounds.max_column);
    let column_count = layout.column_count();

    if left == 0 && right + 1 >= column_count {
        log::debug!("deleting all {column_count} columns, resetting table");
        return Ok(Cow::Owned(kind.new_table()));
    }

    let mut builder = table.to_builder();
    let mut removed = HashSet::new();

    for (key, position) in layout.positions() {
        let first = position.column.max(left);
        let last = position.end_column().min(right);
        if first > last {
            continue;
        }
        let overlap = last - first + 1;

        if position.column < left || position.end_column() > right {
            builder.cell_mut(key)?.column_span -= overlap;
        } else {
            builder.forget_cell(key)?;
            removed.insert(key);
        }
    }

    for row in builder.rows_mut() {
        row.cells.retain(|key| !removed.contains(key));
    }

    let remaining = column_count - (right - left + 1);
    log::debug!(
        "deleted columns {left}..={right}: {} cells removed, {remaining} columns left",
        removed.len()
    );

    let focus_row = layout.position(table.focus())?.row;
    let focus_column = if left < remaining { left } else { left - 1 };
    builder.build_focused_at(focus_row, focus_column).map(Cow::Owned)
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
    use crate::editor::select;
    use crate::types::{Cell, TableBuilder};

    fn kind() -> TableKind<&'static str> {
        TableKind::new(|d: &&str| d.is_empty(), || "")
    }

    fn grid(rows: usize, columns: usize) -> Table<&'static str> {
        let mut builder = TableBuilder::new();
        for _ in 0..rows {
            builder.push_row((0..columns).map(|_| (Cell::new(), "x")).collect());
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_delete_middle_row() {
        let table = grid(3, 2);
        let middle = table.rows()[1].cells[0];
        let table = select(&table, middle, middle).unwrap().into_owned();
        let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.layout().row_count(), 2);
        assert_eq!(next.cell_count(), 4);
        assert!(next.cell(middle).is_err());
        // Focus lands on the row that slid up into the gap.
        assert_eq!(next.focus(), table.rows()[2].cells[0]);
    }

    #[test]
    fn test_delete_last_row_moves_focus_up() {
        let table = grid(3, 1);
        let last = table.rows()[2].cells[0];
        let table = select(&table, last, last).unwrap().into_owned();
        let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.focus(), table.rows()[1].cells[0]);
    }

    #[test]
    fn test_delete_all_rows_collapses() {
        let table = grid(2, 2);
        let first = table.rows()[0].cells[0];
        let last = table.rows()[1].cells[1];
        let table = select(&table, first, last).unwrap().into_owned();
        let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.layout().row_count(), 1);
        assert_eq!(next.layout().column_count(), 1);
        assert_eq!(*next.data(next.focus()).unwrap(), "");
    }

    #[test]
    fn test_delete_row_under_tall_cell_shrinks_it() {
        let mut builder = TableBuilder::new();
        let a = Cell::new().with_span(3, 1);
        builder.push_row(vec![(a, "a"), (Cell::new(), "b")]);
        builder.push_row(vec![(Cell::new(), "c")]);
        builder.push_row(vec![(Cell::new(), "d")]);
        let table = builder.build().unwrap();
        let c = table.rows()[1].cells[0];
        let table = select(&table, c, c).unwrap().into_owned();

        let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.cell(a.key).unwrap().row_span, 2);
        assert_eq!(next.layout().row_count(), 2);
    }

    #[test]
    fn test_delete_top_row_relocates_tall_cell() {
        // A spans rows 0-1; deleting row 0 moves A into row 1's list.
        let mut builder = TableBuilder::new();
        let a = Cell::new().with_span(2, 1);
        let b = Cell::new();
        let c = Cell::new();
        builder.push_row(vec![(a, "a"), (b, "b")]);
        builder.push_row(vec![(c, "c")]);
        builder.push_row(vec![(Cell::new(), "d"), (Cell::new(), "e")]);
        let table = builder.build().unwrap();
        let table = select(&table, b.key, b.key).unwrap().into_owned();

        let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.rows()[0].cells, vec![a.key, c.key]);
        assert_eq!(next.cell(a.key).unwrap().row_span, 1);
        assert!(next.cell(b.key).is_err());
        assert_eq!(next.focus(), c.key);
    }

    #[test]
    fn test_delete_first_column() {
        let table = grid(2, 3);
        let first = table.rows()[0].cells[0];
        let table = select(&table, first, first).unwrap().into_owned();
        let next = delete_selected_columns(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.layout().column_count(), 2);
        assert_eq!(next.rows()[0].cells.len(), 2);
        assert_eq!(next.focus(), table.rows()[0].cells[1]);
    }

    #[test]
    fn test_delete_column_under_wide_cell() {
        let mut builder = TableBuilder::new();
        let wide = Cell::new().with_span(1, 3);
        builder.push_row(vec![(wide, "w")]);
        builder.push_row(vec![(Cell::new(), "x"), (Cell::new(), "y"), (Cell::new(), "z")]);
        let table = builder.build().unwrap();
        let x = table.rows()[1].cells[0];
        let table = select(&table, x, x).unwrap().into_owned();

        let next = delete_selected_columns(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.cell(wide.key).unwrap().column_span, 2);
        assert_eq!(next.layout().position(wide.key).unwrap().column, 0);
        assert_eq!(next.rows()[1].cells.len(), 2);
    }
}
