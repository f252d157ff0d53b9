// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remote AI image service contracts.
//!
//! The generative backends are opaque: the core hands over image
//! references and masks and gets back a reference to a new image.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};

/// An image produced by a remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Removal mask sent along with a cleanup request.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskUpload {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Remote image operations. Implementations are called from worker threads
/// and may block for as long as the transport allows.
pub trait AiService: Send + Sync {
    /// Remove the masked region from the image.
    fn cleanup(&self, image_url: &str, mask: &MaskUpload) -> EditorResult<RemoteImage>;

    /// Generate a new image from a text prompt.
    fn text_to_image(&self, prompt: &str, style: &str) -> EditorResult<RemoteImage>;

    /// Outpaint the image to the given natural size.
    fn extend(&self, image_url: &str, width: u32, height: u32) -> EditorResult<RemoteImage>;

    /// Prompt-driven retouch of the image.
    fn retouch(&self, image_url: &str, prompt: &str) -> EditorResult<RemoteImage>;
}

/// Service used when no AI backend is configured: every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableAiService;

impl UnavailableAiService {
    fn unavailable<T>(&self, operation: &str) -> EditorResult<T> {
        Err(EditorError::Service(format!("{} is not available offline", operation)))
    }
}

impl AiService for UnavailableAiService {
    fn cleanup(&self, _image_url: &str, _mask: &MaskUpload) -> EditorResult<RemoteImage> {
        self.unavailable("cleanup")
    }

    fn text_to_image(&self, _prompt: &str, _style: &str) -> EditorResult<RemoteImage> {
        self.unavailable("text-to-image")
    }

    fn extend(&self, _image_url: &str, _width: u32, _height: u32) -> EditorResult<RemoteImage> {
        self.unavailable("extend")
    }

    fn retouch(&self, _image_url: &str, _prompt: &str) -> EditorResult<RemoteImage> {
        self.unavailable("retouch")
    }
}
