// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project store collaborator.
//!
//! The editing core only ever reads a project and patches it. Two stores
//! are provided: an in-memory one and one backed by a directory of JSON
//! files.

use crate::error::{EditorError, EditorResult};
use crate::io::serialization::{self, FileFormat};
use crate::models::project::{Project, ProjectId, ProjectPatch};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistence for project records. Calls may come from worker threads.
pub trait ProjectStore: Send + Sync {
    fn get_project(&self, id: &ProjectId) -> EditorResult<Project>;
    fn patch_project(&self, id: &ProjectId, patch: &ProjectPatch) -> EditorResult<Project>;
}

/// Projects held in memory.
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, project: Project) {
        if let Ok(mut projects) = self.projects.lock() {
            projects.insert(project.id.clone(), project);
        }
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn get_project(&self, id: &ProjectId) -> EditorResult<Project> {
        let projects = self
            .projects
            .lock()
            .map_err(|_| EditorError::Store("project store lock poisoned".to_string()))?;
        projects
            .get(id)
            .cloned()
            .ok_or_else(|| EditorError::NotFound(id.clone()))
    }

    fn patch_project(&self, id: &ProjectId, patch: &ProjectPatch) -> EditorResult<Project> {
        let mut projects = self
            .projects
            .lock()
            .map_err(|_| EditorError::Store("project store lock poisoned".to_string()))?;
        let project = projects
            .get_mut(id)
            .ok_or_else(|| EditorError::NotFound(id.clone()))?;
        project.apply_patch(patch);
        Ok(project.clone())
    }
}

/// Projects stored as `<dir>/<id>.json`.
pub struct FileProjectStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &ProjectId) -> EditorResult<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EditorError::Store(format!("invalid project id {:?}", id.as_str())));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Write a full project record, creating the directory if needed.
    pub fn insert(&self, project: &Project) -> EditorResult<()> {
        let path = self.path_for(&project.id)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| EditorError::Store(e.to_string()))?;
        serialization::write_file(project, &path, FileFormat::Json).map_err(|e| EditorError::Store(e.to_string()))
    }
}

impl ProjectStore for FileProjectStore {
    fn get_project(&self, id: &ProjectId) -> EditorResult<Project> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(EditorError::NotFound(id.clone()));
        }
        serialization::read_file(&path, FileFormat::Json).map_err(|e| EditorError::Store(e.to_string()))
    }

    fn patch_project(&self, id: &ProjectId, patch: &ProjectPatch) -> EditorResult<Project> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| EditorError::Store("project store lock poisoned".to_string()))?;
        let mut project = self.get_project(id)?;
        project.apply_patch(patch);
        self.insert(&project)?;
        log::debug!("Patched project {} at {}", id, self.dir.display());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::Snapshot;

    #[test]
    fn test_in_memory_patch_and_get() {
        let store = InMemoryProjectStore::new();
        store.insert(Project::new("p1", "Test", 800, 600));
        let id = ProjectId::new("p1");

        let patch = ProjectPatch::scene(Snapshot::from_raw("{}"));
        store.patch_project(&id, &patch).unwrap();
        let project = store.get_project(&id).unwrap();
        assert_eq!(project.scene_state, Some(Snapshot::from_raw("{}")));
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let store = InMemoryProjectStore::new();
        let id = ProjectId::new("nope");
        assert_eq!(store.get_project(&id), Err(EditorError::NotFound(id)));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProjectStore::new(dir.path());
        let project = Project::new("p-1", "On disk", 640, 480).with_image("a.png");
        store.insert(&project).unwrap();

        let patch = ProjectPatch {
            width: Some(1280),
            height: Some(960),
            ..Default::default()
        };
        store.patch_project(&project.id, &patch).unwrap();

        let loaded = store.get_project(&project.id).unwrap();
        assert_eq!(loaded.width, 1280);
        assert_eq!(loaded.height, 960);
        assert_eq!(loaded.original_image_url.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_file_store_rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProjectStore::new(dir.path());
        let result = store.get_project(&ProjectId::new("../etc/passwd"));
        assert!(matches!(result, Err(EditorError::Store(_))));
    }
}
