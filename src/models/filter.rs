// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image filter descriptors.
//!
//! Filters are plain tagged values: the kind and its parameters travel
//! together, so reading the current adjustment back out of an image never
//! depends on runtime type identity.

use serde::{Deserialize, Serialize};

/// One filter in an image's filter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Filter {
    // Adjust channels (normalized parameters)
    Brightness { brightness: f64 },
    Contrast { contrast: f64 },
    Saturation { saturation: f64 },
    Vibrance { vibrance: f64 },
    Blur { blur: f64 },
    /// Rotation in radians.
    HueRotation { rotation: f64 },

    // Presets
    Sepia,
    Grayscale,
    Invert,
    BlackWhite,
    Brownie,
    Vintage,
    Kodachrome,
    Technicolor,
    Polaroid,
    Convolute { matrix: Vec<f64> },
    Pixelate { blocksize: u32 },
    Noise { noise: f64 },
    BlendColor { color: String, mode: String, alpha: f64 },
}

impl Filter {
    /// Short lowercase name for logs and notifications.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Brightness { .. } => "brightness",
            Filter::Contrast { .. } => "contrast",
            Filter::Saturation { .. } => "saturation",
            Filter::Vibrance { .. } => "vibrance",
            Filter::Blur { .. } => "blur",
            Filter::HueRotation { .. } => "hue-rotation",
            Filter::Sepia => "sepia",
            Filter::Grayscale => "grayscale",
            Filter::Invert => "invert",
            Filter::BlackWhite => "black-white",
            Filter::Brownie => "brownie",
            Filter::Vintage => "vintage",
            Filter::Kodachrome => "kodachrome",
            Filter::Technicolor => "technicolor",
            Filter::Polaroid => "polaroid",
            Filter::Convolute { .. } => "convolute",
            Filter::Pixelate { .. } => "pixelate",
            Filter::Noise { .. } => "noise",
            Filter::BlendColor { .. } => "blend-color",
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Filter::Brightness { brightness: v }
            | Filter::Contrast { contrast: v }
            | Filter::Saturation { saturation: v }
            | Filter::Vibrance { vibrance: v }
            | Filter::Blur { blur: v }
            | Filter::HueRotation { rotation: v }
            | Filter::Noise { noise: v } => v.is_finite(),
            Filter::BlendColor { alpha, .. } => alpha.is_finite(),
            Filter::Convolute { matrix } => matrix.iter().all(|v| v.is_finite()),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_tagging() {
        let json = serde_json::to_string(&Filter::Brightness { brightness: 0.5 }).unwrap();
        assert_eq!(json, r#"{"type":"Brightness","brightness":0.5}"#);

        let unit = serde_json::to_string(&Filter::Sepia).unwrap();
        assert_eq!(unit, r#"{"type":"Sepia"}"#);
    }
}
