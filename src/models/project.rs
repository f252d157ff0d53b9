// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project records as exchanged with the project store.
//!
//! The editing core reads projects when a session opens and writes partial
//! updates (scene snapshot, dimensions, current image) back through
//! [`ProjectPatch`].

use super::scene::Snapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image_url: Option<String>,
    /// Persisted scene graph, opaque to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_state: Option<Snapshot>,
}

impl Project {
    /// Create a new project with the given title and dimensions.
    pub fn new(id: impl Into<String>, title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: ProjectId::new(id),
            title: title.into(),
            width,
            height,
            original_image_url: None,
            current_image_url: None,
            scene_state: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.original_image_url = Some(url.clone());
        self.current_image_url = Some(url);
        self
    }

    /// Image the scene should be bootstrapped from when no scene is stored.
    pub fn source_image_url(&self) -> Option<&str> {
        self.current_image_url
            .as_deref()
            .or(self.original_image_url.as_deref())
    }

    /// Merge a partial update into this record.
    pub fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(ref scene) = patch.scene_state {
            self.scene_state = Some(scene.clone());
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(ref url) = patch.current_image_url {
            self.current_image_url = Some(url.clone());
        }
    }
}

/// Partial project update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_state: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image_url: Option<String>,
}

impl ProjectPatch {
    pub fn scene(snapshot: Snapshot) -> Self {
        Self {
            scene_state: Some(snapshot),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut project = Project::new("p1", "Holiday", 800, 600).with_image("orig.png");
        let patch = ProjectPatch {
            width: Some(1600),
            ..Default::default()
        };
        project.apply_patch(&patch);
        assert_eq!(project.width, 1600);
        assert_eq!(project.height, 600);
        assert_eq!(project.current_image_url.as_deref(), Some("orig.png"));
        assert!(project.scene_state.is_none());
    }

    #[test]
    fn test_source_image_prefers_current() {
        let mut project = Project::new("p1", "t", 10, 10).with_image("orig.png");
        project.current_image_url = Some("edited.png".to_string());
        assert_eq!(project.source_image_url(), Some("edited.png"));
    }
}
