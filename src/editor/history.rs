//! Stateful editor with undo/redo over table snapshots.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{select, set_cell_data, TableKind};
use crate::commands::{Keymap, TableCommand};
use crate::error::Result;
use crate::key::CellKey;
use crate::types::Table;

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Editor settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps kept; older ones are dropped
    pub history_limit: usize,
    /// Bindings layered over [`Keymap::default`]
    pub keymap: Keymap,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            keymap: Keymap::empty(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Owns the current table and its undo/redo stacks.
///
/// Structural edits are undoable. Selection-only edits replace the current
/// snapshot without an undo entry, so undo skips straight back over cursor
/// movement to the last structural change.
#[derive(Debug)]
pub struct TableEditor<D> {
    kind: TableKind<D>,
    keymap: Keymap,
    history_limit: usize,
    current: Rc<Table<D>>,
    undo: VecDeque<Rc<Table<D>>>,
    redo: Vec<Rc<Table<D>>>,
}

impl<D> TableEditor<D> {
    pub fn new(table: Table<D>, kind: TableKind<D>) -> Self {
        Self::with_config(table, kind, EditorConfig::default())
    }

    pub fn with_config(table: Table<D>, kind: TableKind<D>, config: EditorConfig) -> Self {
        Self {
            kind,
            keymap: Keymap::default().with_overrides(config.keymap),
            history_limit: config.history_limit,
            current: Rc::new(table),
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table<D> {
        &self.current
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Rc<Table<D>> {
        Rc::clone(&self.current)
    }

    pub fn kind(&self) -> &TableKind<D> {
        &self.kind
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Apply a command. Returns whether the table changed.
    pub fn apply(&mut self, command: TableCommand) -> Result<bool> {
        let next = match command.apply(&self.current, &self.kind)? {
            Cow::Borrowed(_) => return Ok(false),
            Cow::Owned(next) => next,
        };
        if command.is_navigation() {
            self.current = Rc::new(next);
        } else {
            log::debug!("{command:?}: {}x{}", next.layout().row_count(), next.layout().column_count());
            self.commit(next);
        }
        Ok(true)
    }

    /// Look a key chord up in the keymap and apply its command.
    ///
    /// Returns `Ok(false)` for unbound chords and no-op commands.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool) -> Result<bool> {
        match self.keymap.lookup(key, ctrl, shift, alt) {
            Some(command) => self.apply(command),
            None => Ok(false),
        }
    }

    /// Select between two cells. Not undoable.
    pub fn select(&mut self, anchor: CellKey, focus: CellKey) -> Result<bool> {
        let next = match select(&self.current, anchor, focus)? {
            Cow::Borrowed(_) => return Ok(false),
            Cow::Owned(next) => next,
        };
        self.current = Rc::new(next);
        Ok(true)
    }

    /// Replace one cell's payload. Undoable.
    pub fn set_cell_data(&mut self, key: CellKey, data: D) -> Result<()> {
        let next = set_cell_data(&self.current, key, data)?;
        self.commit(next);
        Ok(())
    }

    /// Swap in an unrelated table, clearing history.
    pub fn replace_table(&mut self, table: Table<D>) {
        self.current = Rc::new(table);
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            log::warn!("nothing to undo");
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.redo.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            log::warn!("nothing to redo");
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.undo.push_back(current);
        true
    }

    fn commit(&mut self, next: Table<D>) {
        let previous = std::mem::replace(&mut self.current, Rc::new(next));
        self.undo.push_back(previous);
        while self.undo.len() > self.history_limit {
            self.undo.pop_front();
        }
        self.redo.clear();
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
    use crate::editor::{Delta, InsertLocation};
    use serde_json::{json, Value};

    fn editor() -> TableEditor<Value> {
        let kind = TableKind::json();
        TableEditor::new(kind.new_table(), kind)
    }

    const ADD_ROW: TableCommand = TableCommand::InsertRow {
        location: InsertLocation::End,
    };

    #[test]
    fn test_undo_redo_structural_edit() {
        let mut editor = editor();
        assert!(editor.apply(ADD_ROW).unwrap());
        assert_eq!(editor.table().layout().row_count(), 2);

        assert!(editor.undo());
        assert_eq!(editor.table().layout().row_count(), 1);
        assert!(editor.can_redo());

        assert!(editor.redo());
        assert_eq!(editor.table().layout().row_count(), 2);
        assert!(!editor.redo());
    }

    #[test]
    fn test_navigation_is_not_undoable() {
        let mut editor = editor();
        editor.apply(ADD_ROW).unwrap();
        let moved = editor
            .apply(TableCommand::Move {
                row: Delta::First,
                column: Delta::Stay,
                extend: false,
            })
            .unwrap();
        assert!(moved);
        assert_eq!(editor.undo.len(), 1);
    }

    #[test]
    fn test_noop_leaves_history_alone() {
        let mut editor = editor();
        assert!(!editor.apply(TableCommand::Merge).unwrap());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut editor = editor();
        editor.apply(ADD_ROW).unwrap();
        editor.undo();
        editor.apply(ADD_ROW).unwrap();
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_history_limit() {
        let kind = TableKind::json();
        let config = EditorConfig::from_json(r#"{"historyLimit": 2}"#).unwrap();
        let mut editor = TableEditor::with_config(kind.new_table(), kind, config);
        for _ in 0..5 {
            editor.apply(ADD_ROW).unwrap();
        }
        assert!(editor.undo());
        assert!(editor.undo());
        assert!(!editor.undo());
        assert_eq!(editor.table().layout().row_count(), 4);
    }

    #[test]
    fn test_set_cell_data_undo() {
        let mut editor = editor();
        let key = editor.table().focus();
        editor.set_cell_data(key, json!("hello")).unwrap();
        assert_eq!(editor.table().data(key).unwrap(), &json!("hello"));
        editor.undo();
        assert_eq!(editor.table().data(key).unwrap(), &Value::Null);
    }

    #[test]
    fn test_handle_key() {
        let mut editor = editor();
        assert!(editor.handle_key("ArrowDown", true, false, true).unwrap());
        assert_eq!(editor.table().layout().row_count(), 2);
        assert!(!editor.handle_key("F13", false, false, false).unwrap());
    }

    #[test]
    fn test_config_keymap_override() {
        let kind = TableKind::json();
        let config = EditorConfig::from_json(
            r#"{"keymap": [{"key": "Enter", "command": {"type": "insertRow", "location": "after"}}]}"#,
        )
        .unwrap();
        assert_eq!(config.history_limit, 100);
        let mut editor = TableEditor::with_config(kind.new_table(), kind, config);
        assert!(editor.handle_key("Enter", false, false, false).unwrap());
        assert_eq!(editor.table().layout().row_count(), 2);
    }
}
