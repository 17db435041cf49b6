use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single encrypted entry in the password store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreEntry {
    /// Entry name relative to the store root, without the `.gpg` suffix.
    pub name: String,
    /// Absolute path of the encrypted file on disk.
    pub path: PathBuf,
}

/// Output format for listing commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
