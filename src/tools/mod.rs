// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tool mutators.
//!
//! Each tool is a set of plain functions over the scene store. Image tools
//! act on the selected image or, when nothing is selected, the main image.

pub mod adjust;
pub mod crop;
pub mod presets;
pub mod resize;
pub mod text;

use crate::editor::store::SceneStore;
use crate::error::{EditorError, EditorResult};
use crate::models::filter::Filter;
use crate::models::object::{ImageObject, ObjectId, ObjectKind, Origin, SceneObject, Transform};
use crate::util::geometry;

/// The image a tool should act on.
pub fn target_image(store: &SceneStore) -> EditorResult<ObjectId> {
    store
        .active_object()
        .filter(|o| o.is_image())
        .or_else(|| store.find_main_image())
        .map(|o| o.id)
        .ok_or(EditorError::NoTarget)
}

/// Replace the target image's filter list.
pub fn set_filters(store: &mut SceneStore, filters: Vec<Filter>) -> EditorResult<ObjectId> {
    let target = target_image(store)?;
    store.modify_object(target, |object| {
        if let Some(image) = object.as_image_mut() {
            image.filters = filters;
        }
    })?;
    Ok(target)
}

/// Filter list of the target image.
pub fn current_filters(store: &SceneStore) -> EditorResult<Vec<Filter>> {
    let target = target_image(store)?;
    Ok(store
        .object(target)
        .and_then(|o| o.as_image())
        .map(|i| i.filters.clone())
        .unwrap_or_default())
}

/// An image centered on the canvas and scaled to fit it, aspect preserved.
pub fn fitted_image(src: &str, width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> SceneObject {
    let scale = geometry::fit_scale(
        width as f64,
        height as f64,
        canvas_width as f64,
        canvas_height as f64,
    );
    SceneObject::new(
        ObjectKind::Image(ImageObject::new(src, width, height)),
        Transform {
            left: canvas_width as f64 / 2.0,
            top: canvas_height as f64 / 2.0,
            scale_x: scale,
            scale_y: scale,
            angle: 0.0,
            origin: Origin::CENTER,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(src: &str) -> SceneObject {
        SceneObject::new(
            ObjectKind::Image(ImageObject::new(src, 100, 100)),
            Transform::default(),
        )
    }

    #[test]
    fn test_target_prefers_selected_image() {
        let mut store = SceneStore::new(800, 600, "#ffffff");
        let main = store.add_object(image("main.png"));
        let second = store.add_object(image("second.png"));
        assert_eq!(target_image(&store).unwrap(), main);

        store.set_active(second).unwrap();
        assert_eq!(target_image(&store).unwrap(), second);
    }

    #[test]
    fn test_no_image_is_no_target() {
        let store = SceneStore::new(800, 600, "#ffffff");
        assert_eq!(target_image(&store), Err(EditorError::NoTarget));
    }

    #[test]
    fn test_fitted_image_is_centered() {
        let object = fitted_image("a.png", 1600, 800, 800, 600);
        assert_eq!(object.transform.left, 400.0);
        assert_eq!(object.transform.top, 300.0);
        assert_eq!(object.transform.scale_x, 0.5);
        assert_eq!(object.transform.origin, Origin::CENTER);
    }
}
