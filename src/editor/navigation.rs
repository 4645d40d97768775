//! Focus movement and explicit selection.
//!
//! These edits only change the selection; the store and layout are shared
//! with the input table.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

use super::Edit;
use crate::error::GridError;
use crate::key::CellKey;
use crate::types::{Table, TableSelection};

/// One-axis step for focus movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delta {
    First,
    Prev,
    #[default]
    Stay,
    Next,
    Last,
}

impl Delta {
    /// Target index on an axis of `count` slots, from a cell at `current`
    /// spanning `span` slots.
    pub fn resolve(self, current: usize, span: usize, count: usize) -> usize {
        let max = count.saturating_sub(1);
        match self {
            Self::First => 0,
            Self::Prev => current.saturating_sub(1),
            Self::Stay => current,
            Self::Next => (current + span).min(max),
            Self::Last => max,
        }
    }
}

impl FromStr for Delta {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "prev" => Ok(Self::Prev),
            "stay" => Ok(Self::Stay),
            "next" => Ok(Self::Next),
            "last" => Ok(Self::Last),
            other => Err(GridError::UnknownCommand(format!("direction '{other}'"))),
        }
    }
}

/// Move the focus by `row` / `column` steps.
///
/// With `extend` the anchor stays put and the selection stretches to the new
/// focus; without it the selection collapses onto the new focus.
pub fn move_focus<D>(table: &Table<D>, row: Delta, column: Delta, extend: bool) -> Edit<'_, D> {
    let layout = table.layout();
    let position = layout.position(table.focus())?;
    let target_row = row.resolve(position.row, position.row_span, layout.row_count());
    let target_column = column.resolve(position.column, position.column_span, layout.column_count());

    let focus = layout.try_cell_at(target_row, target_column)?;
    let anchor = if extend { table.anchor() } else { focus };
    reselect(table, TableSelection { anchor, focus })
}

/// Select from the top-left cell to the bottom-right cell.
pub fn select_all<D>(table: &Table<D>) -> Edit<'_, D> {
    let layout = table.layout();
    let anchor = layout.try_cell_at(0, 0)?;
    let focus = layout.try_cell_at(
        layout.row_count().saturating_sub(1),
        layout.column_count().saturating_sub(1),
    )?;
    reselect(table, TableSelection { anchor, focus })
}

/// Select between two existing cells.
pub fn select<D>(table: &Table<D>, anchor: CellKey, focus: CellKey) -> Edit<'_, D> {
    reselect(table, TableSelection { anchor, focus })
}

fn reselect<D>(table: &Table<D>, selection: TableSelection) -> Edit<'_, D> {
    if selection == table.selection() {
        return Ok(Cow::Borrowed(table));
    }
    table.reselected(selection).map(Cow::Owned)
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
    use crate::types::{Cell, TableBuilder};

    fn grid(rows: usize, columns: usize) -> Table<()> {
        let mut builder = TableBuilder::new();
        for _ in 0..rows {
            builder.push_row((0..columns).map(|_| (Cell::new(), ())).collect());
        }
        builder.build().unwrap()
    }

    fn focus_at(table: &Table<()>) -> (usize, usize) {
        let p = table.layout().position(table.focus()).unwrap();
        (p.row, p.column)
    }

    #[test]
    fn test_delta_resolve() {
        assert_eq!(Delta::First.resolve(3, 1, 5), 0);
        assert_eq!(Delta::Prev.resolve(0, 1, 5), 0);
        assert_eq!(Delta::Prev.resolve(3, 1, 5), 2);
        assert_eq!(Delta::Stay.resolve(3, 1, 5), 3);
        assert_eq!(Delta::Next.resolve(3, 1, 5), 4);
        assert_eq!(Delta::Next.resolve(3, 2, 5), 4);
        assert_eq!(Delta::Next.resolve(1, 2, 5), 3);
        assert_eq!(Delta::Last.resolve(0, 1, 5), 4);
    }

    #[test]
    fn test_move_collapses_selection() {
        let table = grid(3, 3);
        let next = move_focus(&table, Delta::Next, Delta::Next, false).unwrap().into_owned();
        assert_eq!(focus_at(&next), (1, 1));
        assert_eq!(next.anchor(), next.focus());
    }

    #[test]
    fn test_move_extend_keeps_anchor() {
        let table = grid(3, 3);
        let next = move_focus(&table, Delta::Last, Delta::Last, true).unwrap().into_owned();
        assert_eq!(next.anchor(), table.focus());
        assert_eq!(next.selection_shape().len(), 9);
    }

    #[test]
    fn test_move_into_wall_is_noop() {
        let table = grid(2, 2);
        let result = move_focus(&table, Delta::Prev, Delta::First, false).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_move_skips_over_merged_span() {
        let mut builder = TableBuilder::new();
        let wide = Cell::new().with_span(1, 2);
        builder.push_row(vec![(wide, ()), (Cell::new(), ())]);
        let table = builder.build().unwrap();
        let next = move_focus(&table, Delta::Stay, Delta::Next, false).unwrap().into_owned();
        assert_eq!(focus_at(&next), (0, 2));
    }

    #[test]
    fn test_select_all() {
        let table = grid(2, 3);
        let next = select_all(&table).unwrap().into_owned();
        assert_eq!(next.anchor(), table.rows()[0].cells[0]);
        assert_eq!(next.focus(), table.rows()[1].cells[2]);
        assert!(matches!(select_all(&next).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_select_unknown_key() {
        let table = grid(1, 1);
        let stray = CellKey::generate();
        assert!(matches!(
            select(&table, stray, stray),
            Err(GridError::CellNotFound(_))
        ));
    }
}
