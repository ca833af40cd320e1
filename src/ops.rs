//! Config operations: dotted-key navigation of resolved values, listing, and
//! the result type returned to callers for display.

use std::fmt;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use crate::error::AskfigError;
use crate::types::render_value;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A key's resolved value and the question that documents it.
    KeyValue {
        key: String,
        value: String,
        doc: Option<String>,
    },
    /// Confirmation that a value was persisted.
    ValueSet { key: String, value: String },
    /// Confirmation that a value was removed.
    ValueUnset { key: String },
    /// All resolved configuration key-value pairs.
    Listing { entries: Vec<(String, String)> },
    /// Location of the persisted document.
    Path(PathBuf),
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::KeyValue { key, value, doc } => {
                if let Some(doc) = doc {
                    writeln!(f, "# {doc}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ConfigResult::ValueUnset { key } => write!(f, "Unset {key}"),
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Navigate a mapping by dotted key path (e.g. `"database.url"`).
pub fn table_get<'a>(table: &'a Mapping, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_mapping()?;
            }
            current
        }
        None => table,
    };

    tbl.get(leaf)
}

/// Set a value by dotted key path, creating intermediate mappings.
///
/// Returns the previous value. Fails if an intermediate key holds a scalar.
pub fn table_set(
    table: &mut Mapping,
    dotted_key: &str,
    value: Value,
) -> Result<Option<Value>, AskfigError> {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| AskfigError::KeyNotFound(dotted_key.into()))?;
    let mut current = table;

    for segment in parents {
        current = current
            .entry(Value::from(*segment))
            .or_insert_with(|| Value::Mapping(Mapping::new()))
            .as_mapping_mut()
            .ok_or_else(|| AskfigError::InvalidValue {
                key: dotted_key.into(),
                reason: format!("'{segment}' is not a section"),
            })?;
    }

    Ok(current.insert(Value::from(*leaf), value))
}

/// Remove a value by dotted key path, returning it.
pub fn table_remove(table: &mut Mapping, dotted_key: &str) -> Option<Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let mut current = table;
    if let Some(path) = path {
        for segment in path.split('.') {
            current = current.get_mut(segment)?.as_mapping_mut()?;
        }
    }
    current.shift_remove(leaf)
}

/// List all resolved values as flattened dotted key-value pairs.
pub fn list_values(table: &Mapping) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    collect_entries(table, "", &mut entries);
    entries
}

fn collect_entries(table: &Mapping, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let key = render_value(key);
        let dotted = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Mapping(sub) => collect_entries(sub, &dotted, out),
            other => out.push((dotted, render_value(other))),
        }
    }
}
