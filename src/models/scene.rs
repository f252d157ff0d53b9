// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene graph and its serialized snapshot form.

use super::object::{ObjectId, SceneObject};
use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered objects of one canvas. Insertion order is z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub objects: Vec<SceneObject>,
}

impl SceneGraph {
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
            objects: Vec::new(),
        }
    }

    /// The canonical AI subject: the first image object.
    pub fn main_image(&self) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.is_image())
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn path_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_path()).count()
    }

    /// Copy of the graph with the uncommitted mask overlay removed.
    pub fn without_paths(&self) -> SceneGraph {
        SceneGraph {
            width: self.width,
            height: self.height,
            background: self.background.clone(),
            objects: self.objects.iter().filter(|o| !o.is_path()).cloned().collect(),
        }
    }

    /// Largest id in use, or 0 for an empty graph.
    pub fn max_id(&self) -> u64 {
        self.objects.iter().map(|o| o.id.0).max().unwrap_or(0)
    }

    /// Structural checks applied before a decoded graph is accepted.
    pub fn validate(&self) -> EditorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EditorError::Load(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        let mut seen = HashSet::new();
        for obj in &self.objects {
            if !seen.insert(obj.id) {
                return Err(EditorError::Load(format!("duplicate object id {}", obj.id)));
            }
            obj.check().map_err(EditorError::Load)?;
        }
        Ok(())
    }
}

/// Serialized copy of a scene graph.
///
/// Serialization is deterministic, so two equal graphs always produce
/// byte-identical snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn from_graph(graph: &SceneGraph) -> EditorResult<Self> {
        serde_json::to_string(graph)
            .map(Snapshot)
            .map_err(|e| EditorError::Load(format!("failed to serialize scene: {}", e)))
    }

    /// Wrap raw serialized text without checking it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Snapshot(raw.into())
    }

    /// Decode and validate the graph held by this snapshot.
    pub fn decode(&self) -> EditorResult<SceneGraph> {
        let graph: SceneGraph = serde_json::from_str(&self.0)
            .map_err(|e| EditorError::Load(e.to_string()))?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
