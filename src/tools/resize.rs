// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas resize.
//!
//! Resizing scales every object's position and scale by the per-axis ratio
//! of new to old canvas size, so the composition stretches with the canvas.

use super::target_image;
use crate::editor::store::{ChangeKind, SceneStore};
use crate::error::{EditorError, EditorResult};

/// Social media aspect ratio preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectPreset {
    pub name: &'static str,
    pub ratio: (u32, u32),
    pub label: &'static str,
}

pub const ASPECT_PRESETS: [AspectPreset; 6] = [
    AspectPreset { name: "Instagram Story", ratio: (9, 16), label: "9:16" },
    AspectPreset { name: "Instagram Post", ratio: (1, 1), label: "1:1" },
    AspectPreset { name: "Youtube Thumbnail", ratio: (16, 9), label: "16:9" },
    AspectPreset { name: "Portrait", ratio: (2, 3), label: "2:3" },
    AspectPreset { name: "Facebook Cover", ratio: (851, 315), label: "2.7:1" },
    AspectPreset { name: "Twitter Header", ratio: (3, 1), label: "3:1" },
];

impl AspectPreset {
    pub fn find(name: &str) -> Option<&'static AspectPreset> {
        ASPECT_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Dimensions with this aspect ratio and the same area as `width`x`height`.
    pub fn dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let area = width as f64 * height as f64;
        let aspect = self.ratio.0 as f64 / self.ratio.1 as f64;
        let new_height = (area / aspect).sqrt();
        let new_width = new_height * aspect;
        (new_width.round() as u32, new_height.round() as u32)
    }
}

/// Height matching `new_width` with the aspect ratio locked.
pub fn locked_height(width: u32, height: u32, new_width: u32) -> u32 {
    if width == 0 {
        return height;
    }
    (new_width as f64 * height as f64 / width as f64).round() as u32
}

/// Width matching `new_height` with the aspect ratio locked.
pub fn locked_width(width: u32, height: u32, new_height: u32) -> u32 {
    if height == 0 {
        return width;
    }
    (new_height as f64 * width as f64 / height as f64).round() as u32
}

/// Per-axis ratio of new to old dimensions.
pub fn scale_factors(old: (u32, u32), new: (u32, u32)) -> (f64, f64) {
    (new.0 as f64 / old.0 as f64, new.1 as f64 / old.1 as f64)
}

/// Resize the canvas. Returns false when the size did not change.
pub fn apply(store: &mut SceneStore, width: u32, height: u32) -> EditorResult<bool> {
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidDimensions { width, height });
    }
    target_image(store)?;
    let old = (store.width(), store.height());
    if old == (width, height) {
        return Ok(false);
    }

    let (fx, fy) = scale_factors(old, (width, height));
    store.edit_graph(ChangeKind::Resized { width, height }, |graph| {
        graph.width = width;
        graph.height = height;
        for object in graph.objects.iter_mut() {
            object.transform.left *= fx;
            object.transform.top *= fy;
            object.transform.scale_x *= fx;
            object.transform.scale_y *= fy;
        }
        Ok(())
    })?;
    log::info!("Canvas resized from {}x{} to {}x{}", old.0, old.1, width, height);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{ImageObject, ObjectKind, SceneObject, Transform};

    #[test]
    fn test_doubling_scales_everything_by_two() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let id = store.add_object(SceneObject::new(
            ObjectKind::Image(ImageObject::new("photo.png", 400, 300)),
            Transform {
                left: 120.0,
                top: 45.0,
                scale_x: 0.75,
                scale_y: 1.25,
                ..Transform::default()
            },
        ));
        assert!(apply(&mut store, 1600, 1200).unwrap());

        let t = store.object(id).unwrap().transform;
        assert_eq!((t.left, t.top, t.scale_x, t.scale_y), (240.0, 90.0, 1.5, 2.5));
        assert_eq!((store.width(), store.height()), (1600, 1200));
    }

    #[test]
    fn test_same_size_is_noop() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        store.add_object(SceneObject::new(
            ObjectKind::Image(ImageObject::new("photo.png", 400, 300)),
            Transform::default(),
        ));
        let revision = store.revision();
        assert!(!apply(&mut store, 800, 600).unwrap());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        assert_eq!(
            apply(&mut store, 0, 600),
            Err(EditorError::InvalidDimensions { width: 0, height: 600 })
        );
    }

    #[test]
    fn test_aspect_presets_preserve_area() {
        let square = AspectPreset::find("instagram post").unwrap();
        assert_eq!(square.dimensions(800, 800), (800, 800));
        let wide = AspectPreset::find("Twitter Header").unwrap();
        assert_eq!(wide.dimensions(300, 300), (520, 173));
    }

    #[test]
    fn test_locked_aspect_helpers() {
        assert_eq!(locked_height(800, 600, 1000), 750);
        assert_eq!(locked_width(800, 600, 300), 400);
    }
}
