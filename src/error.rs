use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskfigError {
    #[error("Invalid declaration for '{key}': {reason}")]
    Schema { key: String, reason: String },

    #[error("Unknown key '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<AskfigError>),

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to serialize {path}: {reason}")]
    SerializeError { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration for '{0}' is not loaded; call .load() or enable read_immediately")]
    NotLoaded(String),

    #[error("No home directory found for this user")]
    NoHomeDirectory,

    #[error("Input closed while waiting for an answer to '{0}'")]
    PromptClosed(String),

    #[error("Prompt I/O failed: {0}")]
    PromptIo(#[from] std::io::Error),
}
