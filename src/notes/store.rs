use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{CategoryTaxonomy, Note};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected note store layout: {0}")]
    Shape(String),
}

/// Reads the note list from the local store file. A missing file is an empty
/// store.
pub fn load_notes(path: &Path) -> Result<Vec<Note>, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "note store missing, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let parsed: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    parse_notes(parsed)
}

/// Accepts either a bare array of notes or an object holding a `notes`
/// array. Records that do not decode are skipped.
pub fn parse_notes(document: Value) -> Result<Vec<Note>, StoreError> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("notes") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(StoreError::Shape(format!(
                    "`notes` must be an array, found {}",
                    json_kind(&other)
                )));
            }
        },
        Value::Null => Vec::new(),
        other => {
            return Err(StoreError::Shape(format!(
                "expected an array or an object, found {}",
                json_kind(&other)
            )));
        }
    };

    let mut notes = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match Note::deserialize(entry) {
            Ok(note) => notes.push(note),
            Err(error) => warn!(position, %error, "skipping malformed note record"),
        }
    }

    Ok(notes)
}

pub fn load_taxonomy(path: &Path) -> Result<CategoryTaxonomy, StoreError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
