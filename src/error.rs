// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for the editing session.
//!
//! Every variant is recoverable: the session keeps running and the scene
//! graph is left as it was before the failing call.

use crate::editor::ai::AiOperationKind;
use crate::models::project::ProjectId;
use crate::ui::toolbar::ToolId;
use thiserror::Error;

/// Errors raised by the editing core and its collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// A tool was applied with no eligible image object.
    #[error("no image available for this tool")]
    NoTarget,

    /// Mask commit attempted without a main image.
    #[error("no image found on the canvas")]
    NoSubject,

    /// Mask commit attempted with no drawn paths.
    #[error("draw a mask over the area you want to remove first")]
    EmptyMask,

    /// A remote operation of the same kind is still pending.
    #[error("{0} is already in progress")]
    Busy(AiOperationKind),

    /// Serialized scene could not be decoded or validated.
    #[error("failed to load scene: {0}")]
    Load(String),

    /// A remote image service failed.
    #[error("image service error: {0}")]
    Service(String),

    /// Object storage upload failed.
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Project store failure other than a missing project.
    #[error("project store error: {0}")]
    Store(String),

    /// The current plan does not include this tool.
    #[error("{0} requires an upgraded plan")]
    AccessDenied(ToolId),

    /// Monthly export allowance used up.
    #[error("export limit reached for this month")]
    ExportLimit,

    /// The canvas was resized; the session must be reopened before editing.
    #[error("canvas was resized; reload the session")]
    ReloadRequired,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type EditorResult<T> = Result<T, EditorError>;
