// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The editing core: scene store, history, autosave, masks and AI edits,
//! tied together by [`session::EditingSession`].

pub mod ai;
pub mod autosave;
pub mod export;
pub mod history;
pub mod mask;
pub mod schedule;
pub mod session;
pub mod store;
