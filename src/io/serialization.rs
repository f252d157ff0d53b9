// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reading and writing project records and scene graphs on disk.
//!
//! JSON is the storage format of the file-backed project store; YAML is
//! offered for hand-edited exports. Writes go through a sibling temporary
//! file so a crashed save never leaves a truncated record behind.

use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// On-disk encodings understood by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            other => Err(anyhow!("Unsupported file extension: {:?}", other)),
        }
    }

    pub fn encode<T: Serialize>(self, data: &T) -> Result<String> {
        Ok(match self {
            FileFormat::Json => serde_json::to_string_pretty(data)?,
            FileFormat::Yaml => serde_yaml::to_string(data)?,
        })
    }

    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T> {
        Ok(match self {
            FileFormat::Json => serde_json::from_str(text)?,
            FileFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }
}

/// Write `data` to `path` in `format`, replacing any existing file.
pub fn write_file<T: Serialize>(data: &T, path: &Path, format: FileFormat) -> Result<()> {
    let text = format.encode(data)?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, text).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

pub fn read_file<T: DeserializeOwned>(path: &Path, format: FileFormat) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    format
        .decode(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Export choosing the format from the file extension.
pub fn export_by_extension<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    write_file(data, path, FileFormat::from_path(path)?)
}

/// Import choosing the format from the file extension.
pub fn import_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    read_file(path, FileFormat::from_path(path)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
