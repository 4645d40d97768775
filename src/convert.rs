//! Conversion between tables and plain row/cell lists.
//!
//! Persisted tables are stored as rows of cells in row-major order, each cell
//! listed in the row holding its top-left slot. [`StandardCell`] is the
//! generic JSON shape:
//!
//! ```json
//! [
//!   {"cells": [{"header": "Case", "rowSpan": 2}, {"header": "Singular"}]},
//!   {"cells": [{"data": "hund"}]}
//! ]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::editor::TableKind;
use crate::error::{GridError, Result};
use crate::types::{Cell, Table, TableBuilder};

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRow<C> {
    pub cells: Vec<C>,
}

/// Generic JSON cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Present-but-null is kept as `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<usize>,
}

fn present<'de, De: Deserializer<'de>>(deserializer: De) -> std::result::Result<Option<Value>, De::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl StandardCell {
    /// Build a cell and its payload.
    ///
    /// Header text makes a header cell whose payload is the text, unless
    /// `data` is also given, in which case `data` is the payload.
    pub fn into_cell(self) -> Result<(Cell, Value)> {
        let row_span = span(self.row_span, "rowSpan")?;
        let column_span = span(self.column_span, "columnSpan")?;
        let (cell, data) = match (self.header, self.data) {
            (Some(_), Some(data)) => (Cell::header(), data),
            (Some(text), None) => (Cell::header(), Value::String(text)),
            (None, Some(data)) => (Cell::new(), data),
            (None, None) => {
                return Err(GridError::Conversion(
                    "cell has neither header text nor data".into(),
                ))
            }
        };
        Ok((cell.with_span(row_span, column_span), data))
    }

    /// Inverse of [`StandardCell::into_cell`]. Unit spans are omitted.
    ///
    /// A header cell with a non-string payload keeps it under `data` next to
    /// an empty `header`.
    pub fn from_cell(cell: &Cell, data: &Value) -> Self {
        let (header, data) = match (cell.header, data) {
            (true, Value::String(text)) => (Some(text.clone()), None),
            (true, other) => (Some(String::new()), Some(other.clone())),
            (false, other) => (None, Some(other.clone())),
        };
        Self {
            header,
            data,
            row_span: (cell.row_span != 1).then_some(cell.row_span),
            column_span: (cell.column_span != 1).then_some(cell.column_span),
        }
    }
}

fn span(value: Option<usize>, field: &str) -> Result<usize> {
    match value {
        Some(0) => Err(GridError::Conversion(format!("{field} must be at least 1"))),
        Some(n) => Ok(n),
        None => Ok(1),
    }
}

/// Build a table from persisted rows.
///
/// Every cell gets a fresh key and the selection starts on the first cell.
/// Input without any cells yields the kind's default single-cell table.
pub fn convert_standard_table<C, D, F>(
    rows: Vec<StandardRow<C>>,
    kind: &TableKind<D>,
    mut convert_cell: F,
) -> Result<Table<D>>
where
    F: FnMut(C) -> Result<(Cell, D)>,
{
    if rows.iter().all(|row| row.cells.is_empty()) {
        log::debug!("no cells in {} input rows, using default table", rows.len());
        return Ok(kind.new_table());
    }

    let mut builder = TableBuilder::new();
    for row in rows {
        let cells = row
            .cells
            .into_iter()
            .map(&mut convert_cell)
            .collect::<Result<Vec<_>>>()?;
        builder.push_row(cells);
    }
    let table = builder.build()?;
    log::debug!(
        "converted table: {}x{}, {} cells",
        table.layout().row_count(),
        table.layout().column_count(),
        table.cell_count()
    );
    Ok(table)
}

/// Flatten a table back into persisted rows.
pub fn to_standard_rows<C, D, F>(table: &Table<D>, mut export_cell: F) -> Result<Vec<StandardRow<C>>>
where
    F: FnMut(&Cell, &D) -> C,
{
    table
        .rows()
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|&key| Ok(export_cell(table.cell(key)?, table.data(key)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(StandardRow { cells })
        })
        .collect()
}

/// Parse a JSON array of [`StandardRow<StandardCell>`].
pub fn parse_json_table(json: &str) -> Result<Table<Value>> {
    let rows: Vec<StandardRow<StandardCell>> = serde_json::from_str(json)?;
    convert_standard_table(rows, &TableKind::json(), StandardCell::into_cell)
}

/// Serialize a JSON table as a pretty-printed array of rows.
pub fn table_to_json(table: &Table<Value>) -> Result<String> {
    let rows = to_standard_rows(table, StandardCell::from_cell)?;
    Ok(serde_json::to_string_pretty(&rows)?)
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
    use serde_json::json;

    #[test]
    fn test_parse_header_and_data() {
        let table = parse_json_table(
            r#"[
                {"cells": [{"header": "Case", "rowSpan": 2}, {"header": "Sg"}]},
                {"cells": [{"data": "hund"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.layout().row_count(), 2);
        assert_eq!(table.layout().column_count(), 2);

        let first = table.cell(table.focus()).unwrap();
        assert!(first.header);
        assert_eq!(first.row_span, 2);
        assert_eq!(table.data(first.key).unwrap(), &json!("Case"));
    }

    #[test]
    fn test_null_data_is_present() {
        let table = parse_json_table(r#"[{"cells": [{"data": null}]}]"#).unwrap();
        assert_eq!(table.data(table.focus()).unwrap(), &Value::Null);
    }

    #[test]
    fn test_rejects_bare_cell() {
        let result = parse_json_table(r#"[{"cells": [{"rowSpan": 1}]}]"#);
        assert!(matches!(result, Err(GridError::Conversion(_))));
    }

    #[test]
    fn test_rejects_zero_span() {
        let result = parse_json_table(r#"[{"cells": [{"data": 1, "columnSpan": 0}]}]"#);
        assert!(matches!(result, Err(GridError::Conversion(_))));
    }

    #[test]
    fn test_empty_input_gives_default_table() {
        let table = parse_json_table(r#"[{"cells": []}]"#).unwrap();
        assert_eq!(table.cell_count(), 1);
        assert!(!table.cell(table.focus()).unwrap().header);
        assert_eq!(table.data(table.focus()).unwrap(), &Value::Null);
    }

    #[test]
    fn test_ragged_input_is_invalid() {
        let result = parse_json_table(r#"[{"cells": [{"data": 1}, {"data": 2}]}, {"cells": [{"data": 3}]}]"#);
        assert!(matches!(result, Err(GridError::InvalidTable(_))));
    }

    #[test]
    fn test_header_with_data_keeps_payload() {
        let table = parse_json_table(r#"[{"cells": [{"header": "", "data": 7}]}]"#).unwrap();
        let only = table.cell(table.focus()).unwrap();
        assert!(only.header);
        assert_eq!(table.data(only.key).unwrap(), &json!(7));
    }

    #[test]
    fn test_export_non_string_header() {
        let header = Cell::header();
        let exported = StandardCell::from_cell(&header, &Value::Null);
        assert_eq!(
            serde_json::to_value(&exported).unwrap(),
            json!({"header": "", "data": null})
        );
        let (cell, data) = exported.into_cell().unwrap();
        assert!(cell.header);
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_export_omits_unit_spans() {
        let cell = Cell::new();
        let exported = StandardCell::from_cell(&cell, &json!(7));
        assert_eq!(serde_json::to_value(&exported).unwrap(), json!({"data": 7}));

        let header = Cell::header().with_span(1, 3);
        let exported = StandardCell::from_cell(&header, &json!("Title"));
        assert_eq!(
            serde_json::to_value(&exported).unwrap(),
            json!({"header": "Title", "columnSpan": 3})
        );
    }
}
