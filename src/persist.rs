//! Document persistence: read and write the resolved value tree.
//!
//! The document is the resolved tree serialized directly, no envelope.
//! Writes replace the whole file and create parent directories as needed.
//! A missing file is reported as `Ok(None)` so the caller can elicit.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::AskfigError;
use crate::types::DocumentFormat;

/// Pure function: parse document text into a mapping.
///
/// An empty document is an empty mapping.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    path: &Path,
) -> Result<Mapping, AskfigError> {
    let parse_error = |reason: String| AskfigError::ParseError {
        path: path.to_path_buf(),
        reason,
    };

    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match format {
        DocumentFormat::Yaml => match serde_yaml::from_str::<Value>(content) {
            Ok(Value::Mapping(m)) => Ok(m),
            Ok(Value::Null) => Ok(Mapping::new()),
            Ok(other) => Err(parse_error(format!(
                "expected a mapping at the top level, found {}",
                crate::types::render_value(&other)
            ))),
            Err(e) => Err(parse_error(e.to_string())),
        },
        DocumentFormat::Toml => {
            toml::from_str::<Mapping>(content).map_err(|e| parse_error(e.to_string()))
        }
    }
}

/// Pure function: render a mapping as document text.
pub fn render_document(
    values: &Mapping,
    format: DocumentFormat,
    path: &Path,
) -> Result<String, AskfigError> {
    let rendered = match format {
        DocumentFormat::Yaml => serde_yaml::to_string(values).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::to_string(values).map_err(|e| e.to_string()),
    };
    rendered.map_err(|reason| AskfigError::SerializeError {
        path: path.to_path_buf(),
        reason,
    })
}

/// I/O wrapper: read and parse the document, `None` if it does not exist.
pub fn read_document(
    file_path: &Path,
    format: DocumentFormat,
) -> Result<Option<Mapping>, AskfigError> {
    let content = match std::fs::read_to_string(file_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %file_path.display(), "no config document");
            return Ok(None);
        }
        Err(e) => {
            return Err(AskfigError::IoError {
                path: file_path.to_path_buf(),
                source: e,
            });
        }
    };
    parse_document(&content, format, file_path).map(Some)
}

/// I/O wrapper: render and write the document.
/// Creates parent directories if needed.
pub fn write_document(
    file_path: &Path,
    values: &Mapping,
    format: DocumentFormat,
) -> Result<(), AskfigError> {
    let content = render_document(values, format, file_path)?;

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AskfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(file_path, &content).map_err(|e| AskfigError::IoError {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %file_path.display(), keys = values.len(), "wrote config document");
    Ok(())
}
