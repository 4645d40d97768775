//! Integration tests for converting persisted rows to tables and back.
//!
//! Persisted format:
//! ```json
//! [{"cells": [{"header": "Case", "rowSpan": 2}, {"data": "x", "columnSpan": 2}]}]
//! ```
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_tiles, focus_slot, slot_labels};
use fixtures::kind;
use serde_json::{json, Value};
use tablegrid::{
    convert_standard_table, parse_json_table, table_to_json, to_standard_rows, Cell, GridError,
    StandardRow, TableCommand, TableEditor,
};
use test_case::test_case;

const PARADIGM: &str = r#"[
    {"cells": [{"header": ""}, {"header": "Singular"}, {"header": "Plural"}]},
    {"cells": [{"header": "Nominative"}, {"data": "hund"}, {"data": "hunde"}]},
    {"cells": [{"header": "Genitive", "rowSpan": 2}, {"data": "hunds"}, {"data": "hundes", "rowSpan": 2}]},
    {"cells": [{"data": "hundes"}]}
]"#;

#[test]
fn test_parse_paradigm() {
    let table = parse_json_table(PARADIGM).unwrap();
    assert_tiles(&table);
    assert_eq!(table.layout().row_count(), 4);
    assert_eq!(table.layout().column_count(), 3);
    assert_eq!(focus_slot(&table), (0, 0));
    assert_eq!(slot_labels(&table)[3], vec!["Genitive", "hundes", "hundes"]);
}

#[test]
fn test_round_trip_is_stable() {
    let table = parse_json_table(PARADIGM).unwrap();
    let json = table_to_json(&table).unwrap();
    let again = parse_json_table(&json).unwrap();
    assert_eq!(slot_labels(&again), slot_labels(&table));
    assert_eq!(table_to_json(&again).unwrap(), json);
}

#[test]
fn test_edited_table_round_trips() {
    let table = parse_json_table(PARADIGM).unwrap();
    let mut editor = TableEditor::new(table, kind());
    for command in ["extend:next:next", "merge", "insertColumn:end", "separate"] {
        editor.apply(command.parse::<TableCommand>().unwrap()).unwrap();
    }
    let json = table_to_json(editor.table()).unwrap();
    let again = parse_json_table(&json).unwrap();
    assert_tiles(&again);
    assert_eq!(slot_labels(&again), slot_labels(editor.table()));
}

#[test]
fn test_header_payload_types_round_trip() {
    let mut editor = TableEditor::new(
        parse_json_table(r#"[{"cells": [{"data": 7}, {"data": null}, {"data": "x"}]}]"#).unwrap(),
        kind(),
    );
    editor.apply("selectAll".parse().unwrap()).unwrap();
    editor.apply(TableCommand::ToggleHeader).unwrap();

    let json = table_to_json(editor.table()).unwrap();
    let again = parse_json_table(&json).unwrap();
    assert!(again.cells().all(|cell| cell.header));
    let payloads: Vec<Value> = again.rows()[0]
        .cells
        .iter()
        .map(|&key| again.data(key).unwrap().clone())
        .collect();
    assert_eq!(payloads, vec![json!(7), Value::Null, json!("x")]);
    assert_eq!(table_to_json(&again).unwrap(), json);
}

#[test_case(r#"[{"cells": [{}]}]"# ; "cell without header or data")]
#[test_case(r#"[{"cells": [{"data": 1, "rowSpan": 0}]}]"# ; "zero row span")]
#[test_case(r#"[{"cells": [{"header": "h", "columnSpan": 0}]}]"# ; "zero column span")]
fn test_conversion_errors(json: &str) {
    assert!(matches!(parse_json_table(json), Err(GridError::Conversion(_))));
}

#[test_case(r#"[{"cells": [{"data": 1}, {"data": 2}]}, {"cells": [{"data": 3}]}]"# ; "short row")]
#[test_case(r#"[{"cells": [{"data": 1, "rowSpan": 3}]}, {"cells": []}]"# ; "span past last row")]
#[test_case(r#"[{"cells": []}, {"cells": [{"data": 1}]}]"# ; "leading empty row")]
#[test_case(r#"[{"cells": [{"data": 1, "columnSpan": 18446744073709551615}, {"data": 2}]}]"# ; "column span overflows row width")]
#[test_case(r#"[{"cells": [{"data": 1, "columnSpan": 9223372036854775807}]}, {"cells": [{"data": 2, "columnSpan": 9223372036854775807}]}]"# ; "grid too large to allocate")]
#[test_case(r#"[{"cells": [{"data": 1, "rowSpan": 18446744073709551615}]}]"# ; "row span overflows")]
fn test_invalid_tables(json: &str) {
    assert!(matches!(parse_json_table(json), Err(GridError::InvalidTable(_))));
}

#[test_case("not json" ; "garbage")]
#[test_case(r#"{"cells": []}"# ; "object instead of array")]
fn test_malformed_json(json: &str) {
    assert!(matches!(parse_json_table(json), Err(GridError::Json(_))));
}

#[test_case("[]" ; "no rows")]
#[test_case(r#"[{"cells": []}, {"cells": []}]"# ; "only empty rows")]
fn test_no_cells_gives_default_table(json: &str) {
    let table = parse_json_table(json).unwrap();
    assert_eq!(table.cell_count(), 1);
    assert_eq!(table.data(table.focus()).unwrap(), &Value::Null);
}

#[test]
fn test_custom_cell_type() {
    // Domain cells: (is header, text) pairs with a fixed width.
    let rows = vec![
        StandardRow {
            cells: vec![(true, "a"), (false, "b")],
        },
        StandardRow {
            cells: vec![(false, "c"), (false, "d")],
        },
    ];
    let table = convert_standard_table(rows, &kind(), |(header, text)| {
        let cell = if header { Cell::header() } else { Cell::new() };
        Ok((cell, json!(text)))
    })
    .unwrap();
    assert!(table.cell(table.focus()).unwrap().header);

    let exported = to_standard_rows(&table, |cell, data| (cell.header, data.clone())).unwrap();
    assert_eq!(exported[1].cells, vec![(false, json!("c")), (false, json!("d"))]);
}

#[test]
fn test_convert_cell_error_propagates() {
    let rows = vec![StandardRow { cells: vec![1, 2] }];
    let result = convert_standard_table(rows, &kind(), |n: i32| {
        if n > 1 {
            Err(GridError::Conversion(format!("{n} too large")))
        } else {
            Ok((Cell::new(), json!(n)))
        }
    });
    assert!(matches!(result, Err(GridError::Conversion(_))));
}
