// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Object storage and image probing collaborators.

use crate::error::{EditorError, EditorResult};
use crate::io::media;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Hosted file storage.
pub trait ObjectStorage: Send + Sync {
    fn upload(&self, bytes: &[u8], filename: &str) -> EditorResult<UploadedFile>;
}

/// Resolves the natural dimensions of an image URL.
pub trait ImageProbe: Send + Sync {
    fn probe(&self, url: &str) -> EditorResult<(u32, u32)>;
}

/// Keeps uploads in memory under `mem://` URLs and answers probes for them.
#[derive(Default)]
pub struct InMemoryObjectStorage {
    files: Mutex<HashMap<String, (Vec<u8>, u32, u32)>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    fn upload(&self, bytes: &[u8], filename: &str) -> EditorResult<UploadedFile> {
        if filename.trim().is_empty() {
            return Err(EditorError::Upload("file name is required".to_string()));
        }
        let (width, height) =
            media::image_dimensions(bytes).map_err(|e| EditorError::Upload(e.to_string()))?;

        let mut files = self
            .files
            .lock()
            .map_err(|_| EditorError::Upload("storage lock poisoned".to_string()))?;
        let id = format!("file-{}", files.len() + 1);
        let url = format!("mem://{}/{}", id, filename);
        files.insert(url.clone(), (bytes.to_vec(), width, height));
        log::info!("Uploaded {} ({}x{}) as {}", filename, width, height, url);

        Ok(UploadedFile { id, url, width, height })
    }
}

impl ImageProbe for InMemoryObjectStorage {
    fn probe(&self, url: &str) -> EditorResult<(u32, u32)> {
        let files = self
            .files
            .lock()
            .map_err(|_| EditorError::Load("storage lock poisoned".to_string()))?;
        files
            .get(url)
            .map(|(_, w, h)| (*w, *h))
            .ok_or_else(|| EditorError::Load(format!("unknown image {}", url)))
    }
}

/// Probe decoding `data:` URLs and local files, with a table of known
/// dimensions for everything else.
#[derive(Default)]
pub struct StaticImageProbe {
    known: HashMap<String, (u32, u32)>,
    root: Option<PathBuf>,
}

impl StaticImageProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, width: u32, height: u32) -> Self {
        self.known.insert(url.into(), (width, height));
        self
    }

    /// Resolve relative paths against `root` on disk.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl ImageProbe for StaticImageProbe {
    fn probe(&self, url: &str) -> EditorResult<(u32, u32)> {
        if let Some(dims) = self.known.get(url) {
            return Ok(*dims);
        }
        let load_error = |e: anyhow::Error| EditorError::Load(e.to_string());
        if url.starts_with("data:") {
            let bytes = media::decode_data_url(url).map_err(load_error)?;
            return media::image_dimensions(&bytes).map_err(load_error);
        }
        if let Some(ref root) = self.root {
            let path = root.join(url.strip_prefix("file://").unwrap_or(url));
            if path.is_file() {
                let bytes = std::fs::read(&path).map_err(|e| EditorError::Load(e.to_string()))?;
                return media::image_dimensions(&bytes).map_err(load_error);
            }
        }
        Err(EditorError::Load(format!("cannot resolve image {}", url)))
    }
}
