// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Adjust tool: slider-driven color and blur corrections.
//!
//! Slider values are kept in UI units (percent, degrees for hue) and mapped
//! to filter parameters when applied. Applying replaces the whole filter
//! list, so adjustments and presets never stack.

use super::{current_filters, set_filters};
use crate::editor::store::SceneStore;
use crate::error::{EditorError, EditorResult};
use crate::models::filter::Filter;
use crate::models::object::ObjectId;

/// Adjust channels, in the order their filters are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustChannel {
    Brightness,
    Contrast,
    Saturation,
    Vibrance,
    Blur,
    Hue,
}

impl AdjustChannel {
    pub const ALL: [AdjustChannel; 6] = [
        AdjustChannel::Brightness,
        AdjustChannel::Contrast,
        AdjustChannel::Saturation,
        AdjustChannel::Vibrance,
        AdjustChannel::Blur,
        AdjustChannel::Hue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdjustChannel::Brightness => "Brightness",
            AdjustChannel::Contrast => "Contrast",
            AdjustChannel::Saturation => "Saturation",
            AdjustChannel::Vibrance => "Vibrance",
            AdjustChannel::Blur => "Blur",
            AdjustChannel::Hue => "Hue",
        }
    }

    /// Slider range in UI units.
    pub fn range(&self) -> (f64, f64) {
        match self {
            AdjustChannel::Blur => (0.0, 100.0),
            AdjustChannel::Hue => (-180.0, 180.0),
            _ => (-100.0, 100.0),
        }
    }

    pub fn default_value(&self) -> f64 {
        0.0
    }

    fn to_filter(self, value: f64) -> Filter {
        match self {
            AdjustChannel::Brightness => Filter::Brightness { brightness: value / 100.0 },
            AdjustChannel::Contrast => Filter::Contrast { contrast: value / 100.0 },
            AdjustChannel::Saturation => Filter::Saturation { saturation: value / 100.0 },
            AdjustChannel::Vibrance => Filter::Vibrance { vibrance: value / 100.0 },
            AdjustChannel::Blur => Filter::Blur { blur: value / 100.0 },
            AdjustChannel::Hue => Filter::HueRotation { rotation: value.to_radians() },
        }
    }

    /// Channel and UI value encoded by `filter`, if it is an adjust filter.
    fn from_filter(filter: &Filter) -> Option<(AdjustChannel, f64)> {
        let read = match *filter {
            Filter::Brightness { brightness } => (AdjustChannel::Brightness, brightness * 100.0),
            Filter::Contrast { contrast } => (AdjustChannel::Contrast, contrast * 100.0),
            Filter::Saturation { saturation } => (AdjustChannel::Saturation, saturation * 100.0),
            Filter::Vibrance { vibrance } => (AdjustChannel::Vibrance, vibrance * 100.0),
            Filter::Blur { blur } => (AdjustChannel::Blur, blur * 100.0),
            Filter::HueRotation { rotation } => (AdjustChannel::Hue, rotation.to_degrees()),
            _ => return None,
        };
        Some((read.0, read.1.round()))
    }
}

/// Slider positions of the adjust panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustValues {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub vibrance: f64,
    pub blur: f64,
    pub hue: f64,
}

impl AdjustValues {
    pub fn get(&self, channel: AdjustChannel) -> f64 {
        match channel {
            AdjustChannel::Brightness => self.brightness,
            AdjustChannel::Contrast => self.contrast,
            AdjustChannel::Saturation => self.saturation,
            AdjustChannel::Vibrance => self.vibrance,
            AdjustChannel::Blur => self.blur,
            AdjustChannel::Hue => self.hue,
        }
    }

    /// Set a channel, clamped to its slider range.
    pub fn set(&mut self, channel: AdjustChannel, value: f64) -> EditorResult<()> {
        if !value.is_finite() {
            return Err(EditorError::InvalidState(format!(
                "{} must be a finite number",
                channel.label()
            )));
        }
        let (min, max) = channel.range();
        let value = value.clamp(min, max);
        match channel {
            AdjustChannel::Brightness => self.brightness = value,
            AdjustChannel::Contrast => self.contrast = value,
            AdjustChannel::Saturation => self.saturation = value,
            AdjustChannel::Vibrance => self.vibrance = value,
            AdjustChannel::Blur => self.blur = value,
            AdjustChannel::Hue => self.hue = value,
        }
        Ok(())
    }

    /// Reset all values to defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if any adjustments have been made
    pub fn is_unedited(&self) -> bool {
        AdjustChannel::ALL
            .iter()
            .all(|c| self.get(*c) == c.default_value())
    }

    /// Filters for every non-default channel, in channel order.
    pub fn to_filters(&self) -> Vec<Filter> {
        AdjustChannel::ALL
            .iter()
            .filter(|c| self.get(**c) != c.default_value())
            .map(|c| c.to_filter(self.get(*c)))
            .collect()
    }

    /// Read slider positions back from a filter list. Non-adjust filters
    /// are ignored.
    pub fn from_filters(filters: &[Filter]) -> Self {
        let mut values = Self::default();
        for (channel, value) in filters.iter().filter_map(AdjustChannel::from_filter) {
            // Values come from our own filters; clamp anything out of range
            let (min, max) = channel.range();
            let _ = values.set(channel, value.clamp(min, max));
        }
        values
    }
}

/// Apply `values` to the target image, replacing its filter list.
pub fn apply(store: &mut SceneStore, values: &AdjustValues) -> EditorResult<ObjectId> {
    // Same range and finiteness rules as the sliders
    let mut checked = AdjustValues::default();
    for channel in AdjustChannel::ALL {
        checked.set(channel, values.get(channel))?;
    }
    let target = set_filters(store, checked.to_filters())?;
    log::debug!("Adjustments applied to {}: {:?}", target, checked);
    Ok(target)
}

/// Clear every adjustment on the target image.
pub fn reset(store: &mut SceneStore) -> EditorResult<ObjectId> {
    set_filters(store, Vec::new())
}

/// Slider positions matching the target image's current filters.
pub fn current(store: &SceneStore) -> EditorResult<AdjustValues> {
    Ok(AdjustValues::from_filters(&current_filters(store)?))
}
