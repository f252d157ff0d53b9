// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop tool.
//!
//! A crop narrows the visible region of an image. The region is given in
//! the image's natural pixel space and accumulates with earlier crops. The
//! kept pixels stay exactly where they were on the canvas.

use super::target_image;
use crate::editor::store::SceneStore;
use crate::error::{EditorError, EditorResult};
use crate::models::object::{CropRect, ObjectId, Point, SceneObject, Transform};
use crate::util::geometry;

/// Crop the target image to `rect`.
pub fn apply(store: &mut SceneStore, rect: CropRect) -> EditorResult<ObjectId> {
    let target = target_image(store)?;
    let object = store.object(target).ok_or(EditorError::NoTarget)?;
    let image = object.as_image().ok_or(EditorError::NoTarget)?;
    validate(rect, image.width, image.height)?;

    let transform = cropped_transform(&object.transform, (image.width, image.height), rect);
    let (base_x, base_y) = image.crop.map(|c| (c.x, c.y)).unwrap_or((0, 0));
    let visible = CropRect {
        x: base_x + rect.x,
        y: base_y + rect.y,
        width: rect.width,
        height: rect.height,
    };

    store.modify_object(target, |object| {
        object.transform = transform;
        if let Some(image) = object.as_image_mut() {
            image.width = visible.width;
            image.height = visible.height;
            image.crop = Some(visible);
        }
    })?;
    log::info!("Cropped {} to {}x{}", target, rect.width, rect.height);
    Ok(target)
}

/// Convert two scene-space corners of a drag into a crop rectangle on
/// `object`, clamped to its bounds.
pub fn region_from_scene(object: &SceneObject, a: Point, b: Point) -> EditorResult<CropRect> {
    let image = object.as_image().ok_or(EditorError::NoTarget)?;
    let scaled = object.scaled_size();
    let sx = object.transform.scale_x.abs();
    let sy = object.transform.scale_y.abs();
    if sx == 0.0 || sy == 0.0 {
        return Err(EditorError::InvalidState("image has zero scale".to_string()));
    }

    let la = geometry::scene_to_local(a, &object.transform, scaled);
    let lb = geometry::scene_to_local(b, &object.transform, scaled);
    let clamp_x = |v: f64| (v / sx).clamp(0.0, image.width as f64);
    let clamp_y = |v: f64| (v / sy).clamp(0.0, image.height as f64);

    let x0 = clamp_x(la.x.min(lb.x)).floor();
    let x1 = clamp_x(la.x.max(lb.x)).ceil();
    let y0 = clamp_y(la.y.min(lb.y)).floor();
    let y1 = clamp_y(la.y.max(lb.y)).ceil();

    let rect = CropRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    };
    validate(rect, image.width, image.height)?;
    Ok(rect)
}

fn validate(rect: CropRect, width: u32, height: u32) -> EditorResult<()> {
    if rect.width == 0 || rect.height == 0 {
        return Err(EditorError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        });
    }
    let right = rect.x.checked_add(rect.width);
    let bottom = rect.y.checked_add(rect.height);
    match (right, bottom) {
        (Some(r), Some(b)) if r <= width && b <= height => Ok(()),
        _ => Err(EditorError::InvalidState(format!(
            "crop {}x{}+{}+{} exceeds image bounds {}x{}",
            rect.width, rect.height, rect.x, rect.y, width, height
        ))),
    }
}

/// Transform that keeps the cropped region in place on the canvas.
fn cropped_transform(transform: &Transform, natural: (u32, u32), rect: CropRect) -> Transform {
    let sx = transform.scale_x.abs();
    let sy = transform.scale_y.abs();
    let old_scaled = (natural.0 as f64 * sx, natural.1 as f64 * sy);
    let new_scaled = (rect.width as f64 * sx, rect.height as f64 * sy);

    let corner = geometry::top_left(transform, old_scaled);
    let (ox, oy) = geometry::rotate(rect.x as f64 * sx, rect.y as f64 * sy, transform.angle);
    let (fx, fy) = transform.origin.factors();
    let (ax, ay) = geometry::rotate(fx * new_scaled.0, fy * new_scaled.1, transform.angle);

    Transform {
        left: corner.x + ox + ax,
        top: corner.y + oy + ay,
        ..*transform
    }
}
