// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export jobs.
//!
//! An export is rendered at project resolution from the scene without its
//! mask overlay. Rendering itself belongs to the front end; the core only
//! describes what to render.

use crate::models::scene::SceneGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Webp];

    /// Encoder quality in [0, 1].
    pub fn quality(&self) -> f32 {
        match self {
            ExportFormat::Png => 1.0,
            ExportFormat::Jpeg | ExportFormat::Webp => 0.9,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Webp => "WEBP",
        };
        f.write_str(name)
    }
}

/// Everything a renderer needs to produce one exported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub quality: f32,
    pub width: u32,
    pub height: u32,
    pub filename: String,
    pub scene: SceneGraph,
}

impl ExportJob {
    pub fn new(title: &str, format: ExportFormat, graph: &SceneGraph) -> Self {
        let stem = if title.trim().is_empty() { "untitled" } else { title.trim() };
        Self {
            format,
            quality: format.quality(),
            width: graph.width,
            height: graph.height,
            filename: format!("{}.{}", stem, format.extension()),
            scene: graph.without_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{ObjectKind, PathObject, Point, SceneObject, StrokeStyle, Transform};

    #[test]
    fn test_job_drops_mask_paths() {
        let mut graph = SceneGraph::new(640, 480, "#ffffff");
        graph.objects.push(SceneObject::new(
            ObjectKind::Path(PathObject {
                points: vec![Point::new(1.0, 1.0)],
                stroke: StrokeStyle {
                    width: 30.0,
                    color: "red".to_string(),
                },
            }),
            Transform::default(),
        ));
        let job = ExportJob::new("Holiday", ExportFormat::Jpeg, &graph);
        assert_eq!(job.filename, "Holiday.jpg");
        assert_eq!(job.quality, 0.9);
        assert!(job.scene.objects.is_empty());
        assert_eq!((job.width, job.height), (640, 480));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("JPEG"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("gif"), None);
    }
}
