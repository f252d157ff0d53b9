// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! External collaborators of the editing core.

pub mod ai;
pub mod entitlement;
pub mod project_store;
pub mod storage;

use ai::AiService;
use entitlement::Entitlements;
use project_store::ProjectStore;
use std::sync::Arc;
use storage::{ImageProbe, ObjectStorage};

/// Everything a session talks to outside the process.
#[derive(Clone)]
pub struct Services {
    pub projects: Arc<dyn ProjectStore>,
    pub ai: Arc<dyn AiService>,
    pub storage: Arc<dyn ObjectStorage>,
    pub probe: Arc<dyn ImageProbe>,
    pub entitlements: Arc<dyn Entitlements>,
}
