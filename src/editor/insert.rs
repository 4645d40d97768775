//! Row and column insertion.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::rc::Rc;
use std::str::FromStr;

use super::{count_before, Edit, TableKind};
use crate::error::GridError;
use crate::types::{Row, Table};

/// Where a new row or column goes, relative to the table or the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertLocation {
    Start,
    Before,
    After,
    End,
}

impl InsertLocation {
    /// Index the new line will have, given the selection's extent on that axis.
    fn index(self, first: usize, last: usize, count: usize) -> usize {
        match self {
            Self::Start => 0,
            Self::Before => first,
            Self::After => last + 1,
            Self::End => count,
        }
    }

    /// Index of the existing line the new cells are modelled on: the one
    /// pushed away, or the one the new line follows.
    fn adjacent(self, index: usize) -> usize {
        match self {
            Self::Start | Self::Before => index,
            Self::After | Self::End => index.saturating_sub(1),
        }
    }
}

impl FromStr for InsertLocation {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "end" => Ok(Self::End),
            other => Err(GridError::UnknownCommand(format!("insert location '{other}'"))),
        }
    }
}

/// Insert a row at `location`.
///
/// Cells crossing the insertion line grow by one row; every other slot of the
/// new row gets a fresh empty cell as wide as the neighbour it is modelled on.
/// Focus moves to the new row in the old focus column.
pub fn insert_row<'a, D>(table: &'a Table<D>, kind: &TableKind<D>, location: InsertLocation) -> Edit<'a, D> {
    let layout = table.layout();
    let bounds = table.selection_shape().bounds;
    let at = location.index(bounds.min_row, bounds.max_row, layout.row_count());
    let adjacent = location.adjacent(at);

    let mut builder = table.to_builder();
    let mut extended = HashSet::new();
    let mut new_cells = Vec::new();

    for column in 0..layout.column_count() {
        let key = layout.try_cell_at(adjacent, column)?;
        let position = layout.position(key)?;
        if position.row < at && position.end_row() >= at {
            if extended.insert(key) {
                builder.cell_mut(key)?.row_span += 1;
            }
        } else if position.column == column {
            let cell = kind
                .unit_cell_like(table.cell(key)?)
                .with_span(1, position.column_span);
            new_cells.push(cell.key);
            builder.insert_cell(cell, Rc::new(kind.empty()));
        }
    }

    log::debug!(
        "inserting row at {at} ({} new cells, {} extended)",
        new_cells.len(),
        extended.len()
    );
    builder.rows_mut().insert(at, Row::new(new_cells));

    let focus_column = layout.position(table.focus())?.column;
    builder.build_focused_at(at, focus_column).map(Cow::Owned)
}

/// Insert a column at `location`.
///
/// Mirror image of [`insert_row`]: crossing cells grow by one column, other
/// slots get fresh empty cells as tall as their neighbour, inserted into their
/// home rows in column order. Focus moves to the new column in the old focus
/// row.
pub fn insert_column<'a, D>(
    table: &'a Table<D>,
    kind: &TableKind<D>,
    location: InsertLocation,
) -> Edit<'a, D> {
    let layout = table.layout();
    let bounds = table.selection_shape().bounds;
    let at = location.index(bounds.min_column, bounds.max_column, layout.column_count());
    let adjacent = location.adjacent(at);

    let mut builder = table.to_builder();
    let mut extended = HashSet::new();
    let mut created = 0usize;

    for (row_index, row) in table.rows().iter().enumerate() {
        let key = layout.try_cell_at(row_index, adjacent)?;
        let position = layout.position(key)?;
        if position.column < at && position.end_column() >= at {
            if extended.insert(key) {
                builder.cell_mut(key)?.column_span += 1;
            }
        } else if position.row == row_index {
            let cell = kind
                .unit_cell_like(table.cell(key)?)
                .with_span(position.row_span, 1);
            let index = count_before(layout, &row.cells, at)?;
            builder.row_mut(row_index)?.cells.insert(index, cell.key);
            builder.insert_cell(cell, Rc::new(kind.empty()));
            created += 1;
        }
    }

    log::debug!(
        "inserting column at {at} ({created} new cells, {} extended)",
        extended.len()
    );

    let focus_row = layout.position(table.focus())?.row;
    builder.build_focused_at(focus_row, at).map(Cow::Owned)
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
    use crate::editor::{select, TableKind};
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
    fn test_insert_row_end() {
        let table = grid(2, 3);
        let next = insert_row(&table, &kind(), InsertLocation::End).unwrap().into_owned();
        assert_eq!(next.layout().row_count(), 3);
        assert_eq!(next.rows()[2].cells.len(), 3);
        let focus = next.layout().position(next.focus()).unwrap();
        assert_eq!((focus.row, focus.column), (2, 0));
        assert_eq!(*next.data(next.focus()).unwrap(), "");
    }

    #[test]
    fn test_insert_row_start_keeps_old_cells() {
        let table = grid(1, 2);
        let old = table.rows()[0].cells.clone();
        let next = insert_row(&table, &kind(), InsertLocation::Start).unwrap().into_owned();
        assert_eq!(next.rows()[1].cells, old);
        assert_eq!(next.layout().position(old[0]).unwrap().row, 1);
    }

    #[test]
    fn test_insert_row_through_tall_cell_extends_it() {
        // A spans rows 0-1 in column 0; B, C are plain in column 1.
        let mut builder = TableBuilder::new();
        let a = Cell::new().with_span(2, 1);
        let b = Cell::new();
        let c = Cell::new();
        builder.push_row(vec![(a, "a"), (b, "b")]);
        builder.push_row(vec![(c, "c")]);
        let table = builder.build().unwrap();
        let table = select(&table, c.key, c.key).unwrap().into_owned();

        let next = insert_row(&table, &kind(), InsertLocation::Before).unwrap().into_owned();
        assert_eq!(next.cell(a.key).unwrap().row_span, 3);
        assert_eq!(next.rows()[1].cells.len(), 1);
        assert_eq!(next.layout().position(c.key).unwrap().row, 2);
        // Focus stays in column 1, on the new cell.
        let focus = next.layout().position(next.focus()).unwrap();
        assert_eq!((focus.row, focus.column), (1, 1));
    }

    #[test]
    fn test_insert_row_mirrors_neighbour_width() {
        let mut builder = TableBuilder::new();
        let wide = Cell::header().with_span(1, 2);
        builder.push_row(vec![(wide, "title")]);
        builder.push_row(vec![(Cell::new(), "x"), (Cell::new(), "y")]);
        let table = builder.build().unwrap();
        let table = select(&table, wide.key, wide.key).unwrap().into_owned();

        let next = insert_row(&table, &kind(), InsertLocation::After).unwrap().into_owned();
        let new_row = &next.rows()[1];
        assert_eq!(new_row.cells.len(), 1);
        let created = next.cell(new_row.cells[0]).unwrap();
        assert!(created.header);
        assert_eq!(created.column_span, 2);
    }

    #[test]
    fn test_insert_column_after_middle() {
        let table = grid(1, 3);
        let middle = table.rows()[0].cells[1];
        let table = select(&table, middle, middle).unwrap().into_owned();

        let next = insert_column(&table, &kind(), InsertLocation::After).unwrap().into_owned();
        assert_eq!(next.layout().column_count(), 4);
        let focus = next.layout().position(next.focus()).unwrap();
        assert_eq!((focus.row, focus.column), (0, 2));
        assert_eq!(next.rows()[0].cells[1], middle);
        assert_eq!(next.rows()[0].cells[2], next.focus());
    }

    #[test]
    fn test_insert_column_through_wide_cell_extends_it() {
        let mut builder = TableBuilder::new();
        let wide = Cell::new().with_span(1, 2);
        builder.push_row(vec![(wide, "w")]);
        builder.push_row(vec![(Cell::new(), "x"), (Cell::new(), "y")]);
        let table = builder.build().unwrap();
        let right = table.rows()[1].cells[1];
        let table = select(&table, right, right).unwrap().into_owned();

        let next = insert_column(&table, &kind(), InsertLocation::Before).unwrap().into_owned();
        assert_eq!(next.cell(wide.key).unwrap().column_span, 3);
        assert_eq!(next.rows()[0].cells.len(), 1);
        assert_eq!(next.rows()[1].cells.len(), 3);
        assert_eq!(next.layout().position(right).unwrap().column, 2);
    }

    #[test]
    fn test_location_from_str() {
        assert_eq!("after".parse::<InsertLocation>().unwrap(), InsertLocation::After);
        assert!("sideways".parse::<InsertLocation>().is_err());
    }
}
