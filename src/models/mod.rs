// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: scene objects, filters, scene graphs and projects.

pub mod filter;
pub mod object;
pub mod project;
pub mod scene;
