// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentation-side state: the tool catalog and the viewport.

pub mod toolbar;
pub mod viewport;
