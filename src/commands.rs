//! Table commands and keyboard bindings.
//!
//! A [`TableCommand`] names one edit and its arguments. Commands serialize as
//! `{"type": "insertRow", "location": "after"}` and also parse from a compact
//! text form (`insertRow:after`, `move:next:stay`) used by the CLI. A
//! [`Keymap`] maps key chords to commands.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::editor::{
    delete_selected_columns, delete_selected_rows, insert_column, insert_row, merge_selected,
    move_focus, select_all, separate_selected, toggle_header_selected, Delta, Edit,
    InsertLocation, TableKind,
};
use crate::error::{GridError, Result};
use crate::types::Table;

/// One table edit, bindable to a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TableCommand {
    InsertRow {
        location: InsertLocation,
    },
    InsertColumn {
        location: InsertLocation,
    },
    DeleteRows,
    DeleteColumns,
    Merge,
    Separate,
    ToggleHeader,
    Move {
        #[serde(default)]
        row: Delta,
        #[serde(default)]
        column: Delta,
        #[serde(default)]
        extend: bool,
    },
    SelectAll,
}

/// A command bound to its table kind: takes the table and returns the next.
pub type TableCommandFn<D> = Box<dyn for<'a> Fn(&'a Table<D>) -> Edit<'a, D>>;

// Pins the closure signature so the returned borrow is tied to the input.
fn command_fn<D, F>(f: F) -> F
where
    F: for<'a> Fn(&'a Table<D>) -> Edit<'a, D>,
{
    f
}

impl TableCommand {
    pub fn apply<'a, D>(&self, table: &'a Table<D>, kind: &TableKind<D>) -> Edit<'a, D> {
        match *self {
            Self::InsertRow { location } => insert_row(table, kind, location),
            Self::InsertColumn { location } => insert_column(table, kind, location),
            Self::DeleteRows => delete_selected_rows(table, kind),
            Self::DeleteColumns => delete_selected_columns(table, kind),
            Self::Merge => merge_selected(table, kind),
            Self::Separate => separate_selected(table, kind),
            Self::ToggleHeader => toggle_header_selected(table),
            Self::Move {
                row,
                column,
                extend,
            } => move_focus(table, row, column, extend),
            Self::SelectAll => select_all(table),
        }
    }

    /// True for commands that only change the selection.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Move { .. } | Self::SelectAll)
    }

    /// Close over `kind`, producing a callable that needs only the table.
    pub fn bind<D: 'static>(self, kind: TableKind<D>) -> TableCommandFn<D> {
        Box::new(command_fn(move |table| self.apply(table, &kind)))
    }
}

impl FromStr for TableCommand {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();
        let mut arg = || {
            parts
                .next()
                .ok_or_else(|| GridError::UnknownCommand(format!("'{s}' is missing an argument")))
        };

        let command = match name {
            "insertRow" => Self::InsertRow {
                location: arg()?.parse()?,
            },
            "insertColumn" => Self::InsertColumn {
                location: arg()?.parse()?,
            },
            "deleteRows" => Self::DeleteRows,
            "deleteColumns" => Self::DeleteColumns,
            "merge" => Self::Merge,
            "separate" => Self::Separate,
            "toggleHeader" => Self::ToggleHeader,
            "selectAll" => Self::SelectAll,
            "move" | "extend" => Self::Move {
                row: arg()?.parse()?,
                column: arg()?.parse()?,
                extend: name == "extend",
            },
            other => return Err(GridError::UnknownCommand(other.to_string())),
        };

        if parts.next().is_some() {
            return Err(GridError::UnknownCommand(format!("'{s}' has too many arguments")));
        }
        Ok(command)
    }
}

/// A key chord and the command it triggers.
///
/// `key` is the DOM `KeyboardEvent.key` value; single characters match
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBinding {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    pub command: TableCommand,
}

impl KeyBinding {
    fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
            && self.key.eq_ignore_ascii_case(key)
    }

    fn same_chord(&self, other: &KeyBinding) -> bool {
        other.matches(&self.key, self.ctrl, self.shift, self.alt)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Ordered list of key bindings. Later bindings shadow earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keymap(Vec<KeyBinding>);

impl Keymap {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The command bound to a chord, if any.
    pub fn lookup(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> Option<TableCommand> {
        self.0
            .iter()
            .rev()
            .find(|binding| binding.matches(key, ctrl, shift, alt))
            .map(|binding| binding.command)
    }

    /// Layer `overrides` on top: a chord bound in both keeps the override.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Keymap) -> Self {
        for binding in overrides.0 {
            self.0.retain(|existing| !existing.same_chord(&binding));
            self.0.push(binding);
        }
        self
    }

    /// Parse a JSON array of bindings, skipping entries that do not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<Value>) -> Self {
        let mut bindings = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<KeyBinding>(entry) {
                Ok(binding) => bindings.push(binding),
                Err(e) => log::warn!("ignoring keymap entry {index}: {e}"),
            }
        }
        Self(bindings)
    }
}

impl<'de> Deserialize<'de> for Keymap {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> std::result::Result<Self, De::Error> {
        Vec::<Value>::deserialize(deserializer).map(Self::from_entries)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        use Delta::{First, Last, Next, Prev, Stay};
        use InsertLocation::{After, Before};

        let chord = |key: &str, ctrl: bool, shift: bool, alt: bool, command| KeyBinding {
            key: key.to_string(),
            ctrl,
            shift,
            alt,
            command,
        };
        let step = |row, column, extend| TableCommand::Move {
            row,
            column,
            extend,
        };

        let mut bindings = Vec::new();
        for extend in [false, true] {
            bindings.push(chord("ArrowUp", false, extend, false, step(Prev, Stay, extend)));
            bindings.push(chord("ArrowDown", false, extend, false, step(Next, Stay, extend)));
            bindings.push(chord("ArrowLeft", false, extend, false, step(Stay, Prev, extend)));
            bindings.push(chord("ArrowRight", false, extend, false, step(Stay, Next, extend)));
            bindings.push(chord("Home", false, extend, false, step(Stay, First, extend)));
            bindings.push(chord("End", false, extend, false, step(Stay, Last, extend)));
            bindings.push(chord("Home", true, extend, false, step(First, First, extend)));
            bindings.push(chord("End", true, extend, false, step(Last, Last, extend)));
        }
        bindings.extend([
            chord("a", true, false, false, TableCommand::SelectAll),
            chord("m", true, false, false, TableCommand::Merge),
            chord("m", true, true, false, TableCommand::Separate),
            chord("h", true, false, false, TableCommand::ToggleHeader),
            chord("ArrowUp", true, false, true, TableCommand::InsertRow { location: Before }),
            chord("ArrowDown", true, false, true, TableCommand::InsertRow { location: After }),
            chord("ArrowLeft", true, false, true, TableCommand::InsertColumn { location: Before }),
            chord("ArrowRight", true, false, true, TableCommand::InsertColumn { location: After }),
            chord("-", true, false, false, TableCommand::DeleteRows),
            chord("-", true, false, true, TableCommand::DeleteColumns),
        ]);
        Self(bindings)
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
    use std::borrow::Cow;
    use test_case::test_case;

    #[test_case("merge", TableCommand::Merge ; "merge")]
    #[test_case("deleteColumns", TableCommand::DeleteColumns ; "delete columns")]
    #[test_case("insertRow:after", TableCommand::InsertRow { location: InsertLocation::After } ; "insert row")]
    #[test_case("insertColumn:start", TableCommand::InsertColumn { location: InsertLocation::Start } ; "insert column")]
    #[test_case("move:next:stay", TableCommand::Move { row: Delta::Next, column: Delta::Stay, extend: false } ; "move")]
    #[test_case("extend:last:first", TableCommand::Move { row: Delta::Last, column: Delta::First, extend: true } ; "extend")]
    fn test_parse_command(input: &str, expected: TableCommand) {
        assert_eq!(input.parse::<TableCommand>().unwrap(), expected);
    }

    #[test_case("explode" ; "unknown name")]
    #[test_case("insertRow" ; "missing argument")]
    #[test_case("insertRow:above" ; "bad location")]
    #[test_case("merge:now" ; "extra argument")]
    #[test_case("move:next" ; "missing column delta")]
    fn test_parse_command_rejects(input: &str) {
        assert!(matches!(
            input.parse::<TableCommand>(),
            Err(GridError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_command_json_shape() {
        let command = TableCommand::InsertRow {
            location: InsertLocation::Before,
        };
        let json = serde_json::to_value(command).unwrap();
        assert_eq!(json, serde_json::json!({"type": "insertRow", "location": "before"}));

        let parsed: TableCommand = serde_json::from_str(r#"{"type": "move", "column": "next"}"#).unwrap();
        assert_eq!(
            parsed,
            TableCommand::Move {
                row: Delta::Stay,
                column: Delta::Next,
                extend: false
            }
        );
    }

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();
        assert_eq!(keymap.lookup("M", true, false, false), Some(TableCommand::Merge));
        assert_eq!(keymap.lookup("m", true, true, false), Some(TableCommand::Separate));
        assert_eq!(
            keymap.lookup("ArrowRight", false, true, false),
            Some(TableCommand::Move {
                row: Delta::Stay,
                column: Delta::Next,
                extend: true
            })
        );
        assert_eq!(keymap.lookup("q", false, false, false), None);
    }

    #[test]
    fn test_keymap_overrides_shadow_defaults() {
        let overrides = Keymap::from_json(
            r#"[
                {"key": "m", "ctrl": true, "command": {"type": "toggleHeader"}},
                {"key": "x", "command": {"type": "noSuchCommand"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(overrides.len(), 1);

        let before = Keymap::default().len();
        let keymap = Keymap::default().with_overrides(overrides);
        assert_eq!(keymap.len(), before);
        assert_eq!(keymap.lookup("m", true, false, false), Some(TableCommand::ToggleHeader));
    }

    #[test]
    fn test_bound_command() {
        let kind = TableKind::<Value>::json();
        let insert = TableCommand::InsertRow {
            location: InsertLocation::End,
        }
        .bind(kind);
        let table = kind.new_table();
        let next = insert(&table).unwrap();
        assert_eq!(next.layout().row_count(), 2);

        let select = TableCommand::SelectAll.bind(kind);
        assert!(matches!(select(&table).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_binding_display() {
        let binding = KeyBinding {
            key: "ArrowUp".into(),
            ctrl: true,
            shift: false,
            alt: true,
            command: TableCommand::InsertRow {
                location: InsertLocation::Before,
            },
        };
        assert_eq!(binding.to_string(), "Ctrl+Alt+ArrowUp");
    }
}
