// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tool catalog.
//!
//! This module lists the editing tools offered by the toolbar, with their
//! labels, plan requirements and the cursor each tool asks for.

use crate::editor::store::Cursor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    Resize,
    Crop,
    Filters,
    Adjust,
    Text,
    Background,
    AiExtender,
    AiEdit,
}

impl ToolId {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolId; 8] = [
        ToolId::Resize,
        ToolId::Crop,
        ToolId::Filters,
        ToolId::Adjust,
        ToolId::Text,
        ToolId::Background,
        ToolId::AiExtender,
        ToolId::AiEdit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolId::Resize => "Resize",
            ToolId::Crop => "Crop",
            ToolId::Filters => "Filters",
            ToolId::Adjust => "Adjust",
            ToolId::Text => "Text",
            ToolId::Background => "Background",
            ToolId::AiExtender => "AI Extender",
            ToolId::AiEdit => "AI Retouch",
        }
    }

    /// Short hint shown next to the toolbar.
    pub fn description(&self) -> &'static str {
        match self {
            ToolId::Resize => "Change the canvas size, optionally keeping the aspect ratio",
            ToolId::Crop => "Drag a rectangle over the image to keep",
            ToolId::Filters => "Apply a one-click preset filter",
            ToolId::Adjust => "Fine-tune brightness, contrast, colour and blur",
            ToolId::Text => "Add and style text",
            ToolId::Background => "Change the canvas background colour",
            ToolId::AiExtender => "Extend the image beyond its borders",
            ToolId::AiEdit => "Paint over an area to remove it, or retouch with a prompt",
        }
    }

    /// Whether the tool needs a paid plan.
    pub fn pro_only(&self) -> bool {
        matches!(self, ToolId::Background | ToolId::AiExtender | ToolId::AiEdit)
    }

    /// Cursor to show while the tool is active.
    pub fn cursor(&self) -> Cursor {
        match self {
            ToolId::Crop => Cursor::Crosshair,
            _ => Cursor::Default,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_uses_crosshair() {
        assert_eq!(ToolId::Crop.cursor(), Cursor::Crosshair);
        assert_eq!(ToolId::Adjust.cursor(), Cursor::Default);
    }

    #[test]
    fn test_free_tools() {
        let free: Vec<_> = ToolId::ALL.iter().filter(|t| !t.pro_only()).collect();
        assert_eq!(
            free,
            vec![&ToolId::Resize, &ToolId::Crop, &ToolId::Filters, &ToolId::Adjust, &ToolId::Text]
        );
    }
}
