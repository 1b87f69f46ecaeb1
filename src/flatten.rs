//! Flattening of heterogeneous event records into a rectangular table.
//!
//! Columns are the union of keys across all events in first-seen order, minus an
//! exclusion set. Rows keep the order of the input; a key missing from an event
//! yields an empty cell. This module does no I/O.

use crate::types::Event;
use serde_json::Value;

/// Bookkeeping columns that never appear in exported output
pub const RESERVED_COLUMNS: [&str; 2] = ["_pagination_key", "_xact_id"];

/// A rectangular table of rendered cells
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, in first-seen order
    pub columns: Vec<String>,
    /// One entry per input event; every row has `columns.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flatten events into a table, dropping the columns named in `exclude`
///
/// An empty `events` slice yields an empty table; `exclude` is never consulted in
/// that case.
pub fn flatten_events(events: &[Event], exclude: &[&str]) -> Table {
    if events.is_empty() {
        return Table::default();
    }

    let mut columns: Vec<String> = Vec::new();
    for event in events {
        for key in event.keys() {
            if exclude.contains(&key.as_str()) || columns.iter().any(|c| c == key) {
                continue;
            }
            columns.push(key.clone());
        }
    }

    let rows = events
        .iter()
        .map(|event| {
            columns
                .iter()
                .map(|column| event.get(column).map(render_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Table { columns, rows }
}

/// Render one JSON value as CSV cell text
///
/// Strings are written raw, scalars in their JSON spelling, null as an empty
/// cell, and objects/arrays as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
