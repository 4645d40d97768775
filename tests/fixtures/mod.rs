//! Test fixtures for building tables in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::TableFixture;
//!
//! // A | B
//! // A | C
//! let table = TableFixture::new()
//!     .row()
//!     .cell("A").span(2, 1)
//!     .cell("B")
//!     .row()
//!     .cell("C")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use serde_json::{json, Value};
use tablegrid::{Cell, Table, TableBuilder, TableKind};

/// The kind used by every integration test: JSON payloads.
pub fn kind() -> TableKind<Value> {
    TableKind::json()
}

#[derive(Debug, Clone)]
struct CellSpec {
    data: Value,
    header: bool,
    row_span: usize,
    column_span: usize,
}

/// Fluent builder for `Table<Value>`; rows and cells are listed the way they
/// are persisted (each cell in the row holding its top-left slot).
#[derive(Debug, Default)]
pub struct TableFixture {
    rows: Vec<Vec<CellSpec>>,
}

impl TableFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new row.
    pub fn row(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }

    /// Add a data cell holding `data` as a JSON string.
    pub fn cell(self, data: &str) -> Self {
        self.push(json!(data), false)
    }

    /// Add a data cell with empty (null) data.
    pub fn empty(self) -> Self {
        self.push(Value::Null, false)
    }

    /// Add a header cell holding `text`.
    pub fn header(self, text: &str) -> Self {
        self.push(json!(text), true)
    }

    /// Set the span of the last added cell.
    pub fn span(mut self, row_span: usize, column_span: usize) -> Self {
        let cell = self
            .rows
            .last_mut()
            .and_then(|row| row.last_mut())
            .expect("span() needs a cell first");
        cell.row_span = row_span;
        cell.column_span = column_span;
        self
    }

    fn push(mut self, data: Value, header: bool) -> Self {
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        self.rows.last_mut().unwrap().push(CellSpec {
            data,
            header,
            row_span: 1,
            column_span: 1,
        });
        self
    }

    pub fn build(self) -> Table<Value> {
        let mut builder = TableBuilder::new();
        for row in self.rows {
            builder.push_row(
                row.into_iter()
                    .map(|spec| {
                        let cell = if spec.header { Cell::header() } else { Cell::new() };
                        (cell.with_span(spec.row_span, spec.column_span), spec.data)
                    })
                    .collect(),
            );
        }
        builder.build().expect("fixture does not tile")
    }
}

/// A `rows x columns` table of unit data cells labelled `"r{row}c{column}"`.
pub fn grid(rows: usize, columns: usize) -> Table<Value> {
    let mut fixture = TableFixture::new();
    for r in 0..rows {
        fixture = fixture.row();
        for c in 0..columns {
            fixture = fixture.cell(&format!("r{r}c{c}"));
        }
    }
    fixture.build()
}
