// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations shared by the tools:
//! fit-to-canvas scaling, rotation, and conversion between scene space and
//! an object's local (scaled, unrotated) space.

use crate::models::object::{Point, Transform};

/// Largest uniform scale that fits `width`x`height` inside the bounds.
pub fn fit_scale(width: f64, height: f64, bounds_width: f64, bounds_height: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (bounds_width / width).min(bounds_height / height)
}

/// Rotate a vector by `degrees` (clockwise in screen space).
pub fn rotate(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    if degrees == 0.0 {
        return (x, y);
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Convert a scene point into an object's local space.
///
/// Local space has its origin at the object's top-left corner, is axis
/// aligned with the object and measured in scaled (on-canvas) pixels.
/// `scaled_size` is the object's width/height after scaling.
pub fn scene_to_local(point: Point, transform: &Transform, scaled_size: (f64, f64)) -> Point {
    let (fx, fy) = transform.origin.factors();
    let dx = point.x - transform.left;
    let dy = point.y - transform.top;
    let (rx, ry) = rotate(dx, dy, -transform.angle);
    Point::new(rx + fx * scaled_size.0, ry + fy * scaled_size.1)
}

/// Scene position of an object's top-left corner.
pub fn top_left(transform: &Transform, scaled_size: (f64, f64)) -> Point {
    let (fx, fy) = transform.origin.factors();
    let (ox, oy) = rotate(-fx * scaled_size.0, -fy * scaled_size.1, transform.angle);
    Point::new(transform.left + ox, transform.top + oy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::Origin;

    #[test]
    fn test_fit_scale_preserves_aspect() {
        // 1600x800 into 800x600 is width-bound
        assert_eq!(fit_scale(1600.0, 800.0, 800.0, 600.0), 0.5);
        // 400x1200 into 800x600 is height-bound
        assert_eq!(fit_scale(400.0, 1200.0, 800.0, 600.0), 0.5);
    }

    #[test]
    fn test_scene_to_local_top_left_origin_subtracts_position() {
        let transform = Transform {
            left: 100.0,
            top: 50.0,
            ..Transform::default()
        };
        let local = scene_to_local(Point::new(130.0, 70.0), &transform, (200.0, 100.0));
        assert_eq!(local, Point::new(30.0, 20.0));
    }

    #[test]
    fn test_scene_to_local_center_origin() {
        let transform = Transform {
            left: 400.0,
            top: 300.0,
            origin: Origin::CENTER,
            ..Transform::default()
        };
        // Center of a 200x100 object maps to (100, 50) locally
        let local = scene_to_local(Point::new(400.0, 300.0), &transform, (200.0, 100.0));
        assert_eq!(local, Point::new(100.0, 50.0));
        let corner = top_left(&transform, (200.0, 100.0));
        assert_eq!(corner, Point::new(300.0, 250.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let (x, y) = rotate(1.0, 0.0, 90.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }
}
