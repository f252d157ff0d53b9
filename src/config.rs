// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session configuration.
//!
//! All fields have defaults matching the hosted product, so an empty YAML
//! document is a valid configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum undoable steps kept (oldest evicted first).
    pub history_depth: usize,
    /// Quiet period before an autosave fires.
    pub autosave_delay_ms: u64,
    /// Delay after load before the history baseline is taken.
    pub baseline_delay_ms: u64,
    pub brush_width: f64,
    pub brush_color: String,
    pub background: String,
    pub viewport_padding: f32,
    pub viewport_max_scale: f32,
    pub free_project_limit: u32,
    pub free_export_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: 20,
            autosave_delay_ms: 2000,
            baseline_delay_ms: 1000,
            brush_width: 30.0,
            brush_color: "rgba(255,0,0,0.5)".to_string(),
            background: "#ffffff".to_string(),
            viewport_padding: 20.0,
            viewport_max_scale: 1.0,
            free_project_limit: 3,
            free_export_limit: 20,
        }
    }
}

impl SessionConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn baseline_delay(&self) -> Duration {
        Duration::from_millis(self.baseline_delay_ms)
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    /// Load a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn sanitized(mut self) -> Self {
        if self.history_depth == 0 {
            log::warn!("history_depth of 0 is not usable, falling back to 1");
            self.history_depth = 1;
        }
        if !(self.brush_width.is_finite() && self.brush_width > 0.0) {
            log::warn!("invalid brush_width {}, using default", self.brush_width);
            self.brush_width = SessionConfig::default().brush_width;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = SessionConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.autosave_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config = SessionConfig::from_yaml_str("history_depth: 5\nbrush_width: 12.5\n").unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.brush_width, 12.5);
        assert_eq!(config.autosave_delay_ms, 2000);
    }

    #[test]
    fn test_zero_depth_is_clamped() {
        let config = SessionConfig::from_yaml_str("history_depth: 0").unwrap();
        assert_eq!(config.history_depth, 1);
    }
}
