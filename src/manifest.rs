//! JSON manifests (`package.json`, `config.json`).
//!
//! Documents are kept as ordered JSON objects so a rewrite only touches the
//! fields we set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ReleaseError, Result};

/// Indentation used when writing manifests back.
pub const INDENT: &[u8] = b"    ";

/// A JSON object document loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonManifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl JsonManifest {
    /// Reads and parses a manifest.
    ///
    /// # Returns
    /// * `Ok(JsonManifest)` - Parsed document
    /// * `Err(ReleaseError::File)` - File missing or unreadable
    /// * `Err(ReleaseError::Manifest)` - Content is not a JSON object
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ReleaseError::file(path.display().to_string(), e))?;
        Self::parse(path, &text)
    }

    /// Parses manifest text that came from `path`.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let document: Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(path.display().to_string(), e))?;

        Ok(JsonManifest { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// String value of a top-level field, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.document.get(key).and_then(Value::as_str)
    }

    /// Sets a top-level string field, keeping its position if it exists.
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.document
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// Pretty JSON with four-space indentation and no trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.document
            .serialize(&mut serializer)
            .map_err(|e| ReleaseError::manifest(self.path.display().to_string(), e))?;

        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Overwrites the file this manifest was loaded from.
    pub fn write(&self) -> Result<()> {
        let text = self.to_pretty_string()?;
        fs::write(&self.path, text)
            .map_err(|e| ReleaseError::file(self.path.display().to_string(), e))
    }
}
