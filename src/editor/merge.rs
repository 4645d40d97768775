//! Merging the selection into one cell, and splitting merged cells back up.

use std::borrow::Cow;
use std::collections::HashMap;
use std::rc::Rc;

use super::{count_before, insert_by_column, Edit, TableKind};
use crate::types::{Table, TableSelection};

/// Merge the selected cells into one cell covering the selection.
///
/// The surviving cell is the first non-empty selected cell in row-major order
/// (the focus if all are empty); it keeps its key, header flag and data. All
/// other selected cells are deleted. A single-cell selection is a no-op.
pub fn merge_selected<'a, D>(table: &'a Table<D>, kind: &TableKind<D>) -> Edit<'a, D> {
    let shape = table.selection_shape();
    if shape.is_single_cell() {
        return Ok(Cow::Borrowed(table));
    }

    let mut prototype = shape.focus;
    for &key in shape.cells() {
        if !kind.is_empty(table.data(key)?) {
            prototype = key;
            break;
        }
    }

    let layout = table.layout();
    let bounds = shape.bounds;
    let mut builder = table.to_builder();

    for &key in shape.cells() {
        let home_row = layout.position(key)?.row;
        builder.row_mut(home_row)?.cells.retain(|&k| k != key);
        if key != prototype {
            builder.forget_cell(key)?;
        }
    }

    let merged = builder.cell_mut(prototype)?;
    merged.row_span = bounds.height();
    merged.column_span = bounds.width();

    let top_row = builder.row_mut(bounds.min_row)?;
    let index = count_before(layout, &top_row.cells, bounds.min_column)?;
    top_row.cells.insert(index, prototype);

    log::debug!(
        "merged {} cells into {prototype} ({}x{})",
        shape.len(),
        bounds.height(),
        bounds.width()
    );

    builder.set_selection(TableSelection::single(prototype));
    builder.build().map(Cow::Owned)
}

/// Split every selected merged cell into 1x1 cells.
///
/// The original cell keeps its key and data at its home slot; each other slot
/// it covered gets a new empty cell modelled on it. Anchor and focus end up on
/// the old selection's top-left and bottom-right slots. A no-op if nothing
/// selected is merged.
pub fn separate_selected<'a, D>(table: &'a Table<D>, kind: &TableKind<D>) -> Edit<'a, D> {
    let shape = table.selection_shape();
    let layout = table.layout();

    let mut merged = Vec::new();
    for &key in shape.cells() {
        let cell = table.cell(key)?;
        if cell.is_merged() {
            merged.push(*cell);
        }
    }
    if merged.is_empty() {
        return Ok(Cow::Borrowed(table));
    }

    let mut builder = table.to_builder();
    let mut additions: HashMap<usize, Vec<_>> = HashMap::new();
    let mut created = 0usize;

    for original in &merged {
        let position = *layout.position(original.key)?;
        *builder.cell_mut(original.key)? = original.with_span(1, 1);

        for row in position.row..=position.end_row() {
            for column in position.column..=position.end_column() {
                if (row, column) == (position.row, position.column) {
                    continue;
                }
                let cell = kind.unit_cell_like(original);
                additions.entry(row).or_default().push((column, cell.key));
                builder.insert_cell(cell, Rc::new(kind.empty()));
                created += 1;
            }
        }
    }

    for (row, added) in additions {
        insert_by_column(builder.row_mut(row)?, layout, added)?;
    }

    log::debug!("separated {} merged cells, {created} cells created", merged.len());

    let bounds = shape.bounds;
    builder
        .build_selecting(
            (bounds.min_row, bounds.min_column),
            (bounds.max_row, bounds.max_column),
        )
        .map(Cow::Owned)
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

    #[test]
    fn test_merge_single_cell_is_noop() {
        let table = kind().new_table();
        let result = merge_selected(&table, &kind()).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_merge_row_picks_first_non_empty() {
        let mut builder = TableBuilder::new();
        let a = Cell::new();
        let b = Cell::new();
        let c = Cell::new();
        builder.push_row(vec![(a, ""), (b, "b"), (c, "c")]);
        let table = builder.build().unwrap();
        let table = select(&table, a.key, c.key).unwrap().into_owned();

        let next = merge_selected(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.rows()[0].cells, vec![b.key]);
        assert_eq!(next.cell(b.key).unwrap().column_span, 3);
        assert_eq!(next.focus(), b.key);
        assert_eq!(next.cell_count(), 1);
    }

    #[test]
    fn test_merge_all_empty_keeps_focus() {
        let mut builder = TableBuilder::new();
        let a = Cell::new();
        let b = Cell::new();
        builder.push_row(vec![(a, ""), (b, "")]);
        let table = builder.build().unwrap();
        let table = select(&table, a.key, b.key).unwrap().into_owned();

        let next = merge_selected(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.rows()[0].cells, vec![b.key]);
    }

    #[test]
    fn test_merge_keeps_neighbours_in_order() {
        let mut builder = TableBuilder::new();
        let cells: Vec<Cell> = (0..4).map(|_| Cell::new()).collect();
        builder.push_row(cells.iter().map(|&c| (c, "x")).collect());
        let table = builder.build().unwrap();
        let table = select(&table, cells[1].key, cells[2].key).unwrap().into_owned();

        let next = merge_selected(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.rows()[0].cells, vec![cells[0].key, cells[1].key, cells[3].key]);
        assert_eq!(next.layout().position(cells[3].key).unwrap().column, 3);
    }

    #[test]
    fn test_separate_unmerged_is_noop() {
        let mut builder = TableBuilder::new();
        builder.push_row(vec![(Cell::new(), "a"), (Cell::new(), "b")]);
        let table = builder.build().unwrap();
        let result = separate_selected(&table, &kind()).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_separate_tall_cell() {
        let mut builder = TableBuilder::new();
        let tall = Cell::header().with_span(2, 1);
        let b = Cell::new();
        let c = Cell::new();
        builder.push_row(vec![(tall, "t"), (b, "b")]);
        builder.push_row(vec![(c, "c")]);
        let table = builder.build().unwrap();

        let next = separate_selected(&table, &kind()).unwrap().into_owned();
        assert_eq!(next.cell(tall.key).unwrap().row_span, 1);
        assert_eq!(next.rows()[1].cells.len(), 2);
        assert_eq!(next.rows()[1].cells[1], c.key);
        let created = next.cell(next.rows()[1].cells[0]).unwrap();
        assert!(created.header);
        assert_eq!(*next.data(created.key).unwrap(), "");
        assert_eq!(next.anchor(), tall.key);
        assert_eq!(next.focus(), created.key);
    }
}
