// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! One-click preset filters.

use super::{current_filters, set_filters};
use crate::editor::store::SceneStore;
use crate::error::EditorResult;
use crate::models::filter::Filter;
use crate::models::object::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    None,
    Sepia,
    Grayscale,
    Invert,
    BlackWhite,
    Brownie,
    Vintage,
    Kodachrome,
    Technicolor,
    Polaroid,
    Sharpen,
    Emboss,
    Pixelate,
    Noise,
    CoolTint,
}

const SHARPEN: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
const EMBOSS: [f64; 9] = [1.0, 1.0, 1.0, 1.0, 0.7, -1.0, -1.0, -1.0, -1.0];

impl Preset {
    pub const ALL: [Preset; 15] = [
        Preset::None,
        Preset::Sepia,
        Preset::Grayscale,
        Preset::Invert,
        Preset::BlackWhite,
        Preset::Brownie,
        Preset::Vintage,
        Preset::Kodachrome,
        Preset::Technicolor,
        Preset::Polaroid,
        Preset::Sharpen,
        Preset::Emboss,
        Preset::Pixelate,
        Preset::Noise,
        Preset::CoolTint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::None => "None",
            Preset::Sepia => "Sepia",
            Preset::Grayscale => "Grayscale",
            Preset::Invert => "Invert",
            Preset::BlackWhite => "Black & White",
            Preset::Brownie => "Brownie",
            Preset::Vintage => "Vintage",
            Preset::Kodachrome => "Kodachrome",
            Preset::Technicolor => "Technicolor",
            Preset::Polaroid => "Polaroid",
            Preset::Sharpen => "Sharpen",
            Preset::Emboss => "Emboss",
            Preset::Pixelate => "Pixelate",
            Preset::Noise => "Noise",
            Preset::CoolTint => "Cool Tint",
        }
    }

    /// The filter this preset puts on the image.
    pub fn filter(&self) -> Option<Filter> {
        let filter = match self {
            Preset::None => return None,
            Preset::Sepia => Filter::Sepia,
            Preset::Grayscale => Filter::Grayscale,
            Preset::Invert => Filter::Invert,
            Preset::BlackWhite => Filter::BlackWhite,
            Preset::Brownie => Filter::Brownie,
            Preset::Vintage => Filter::Vintage,
            Preset::Kodachrome => Filter::Kodachrome,
            Preset::Technicolor => Filter::Technicolor,
            Preset::Polaroid => Filter::Polaroid,
            Preset::Sharpen => Filter::Convolute { matrix: SHARPEN.to_vec() },
            Preset::Emboss => Filter::Convolute { matrix: EMBOSS.to_vec() },
            Preset::Pixelate => Filter::Pixelate { blocksize: 8 },
            Preset::Noise => Filter::Noise { noise: 100.0 },
            Preset::CoolTint => Filter::BlendColor {
                color: "#00c3ff".to_string(),
                mode: "tint".to_string(),
                alpha: 0.5,
            },
        };
        Some(filter)
    }

    /// Preset whose filter list equals `filters`, if any.
    pub fn detect(filters: &[Filter]) -> Option<Preset> {
        Preset::ALL.iter().copied().find(|preset| match preset.filter() {
            Some(filter) => filters.len() == 1 && filters[0] == filter,
            None => filters.is_empty(),
        })
    }
}

/// Replace the target image's filters with `preset`.
pub fn apply(store: &mut SceneStore, preset: Preset) -> EditorResult<ObjectId> {
    let target = set_filters(store, preset.filter().into_iter().collect())?;
    log::info!("Applied {} filter to {}", preset.name(), target);
    Ok(target)
}

/// Preset currently on the target image.
pub fn current(store: &SceneStore) -> EditorResult<Option<Preset>> {
    Ok(Preset::detect(&current_filters(store)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{ImageObject, ObjectKind, SceneObject, Transform};
    use crate::tools::adjust::{self, AdjustChannel, AdjustValues};

    fn store() -> SceneStore {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        store.add_object(SceneObject::new(
            ObjectKind::Image(ImageObject::new("photo.png", 800, 600)),
            Transform::default(),
        ));
        store
    }

    #[test]
    fn test_preset_replaces_adjustments() {
        let mut store = store();
        let mut values = AdjustValues::default();
        values.set(AdjustChannel::Brightness, 40.0).unwrap();
        adjust::apply(&mut store, &values).unwrap();

        apply(&mut store, Preset::Sharpen).unwrap();
        assert_eq!(current_filters(&store).unwrap().len(), 1);
        assert_eq!(current(&store).unwrap(), Some(Preset::Sharpen));
        assert!(adjust::current(&store).unwrap().is_unedited());
    }

    #[test]
    fn test_none_clears_filters() {
        let mut store = store();
        apply(&mut store, Preset::CoolTint).unwrap();
        apply(&mut store, Preset::None).unwrap();
        assert!(current_filters(&store).unwrap().is_empty());
        assert_eq!(current(&store).unwrap(), Some(Preset::None));
    }

    #[test]
    fn test_emboss_and_sharpen_are_distinct() {
        assert_ne!(Preset::Emboss.filter(), Preset::Sharpen.filter());
        let emboss = vec![Preset::Emboss.filter().unwrap()];
        assert_eq!(Preset::detect(&emboss), Some(Preset::Emboss));
    }
}
