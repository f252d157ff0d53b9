// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas Session - editing core of a browser image editor
//!
//! Owns the scene graph of one open project and mediates every change to
//! it: tool edits, mask drawing, AI round-trips, undo/redo and autosave.

pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod services;
pub mod tools;
pub mod ui;
pub mod util;

pub use config::SessionConfig;
pub use editor::session::EditingSession;
pub use error::{EditorError, EditorResult};
