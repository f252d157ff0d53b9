// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene object data structures.
//!
//! This module defines the visual objects that make up a scene graph:
//! images, freehand paths and text, together with the transform every
//! object carries.

use super::filter::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in scene (canvas pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Stable identifier of an object within one scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal anchor of an object's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of an object's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Which point of the object `left`/`top` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Origin {
    pub x: OriginX,
    pub y: OriginY,
}

impl Origin {
    pub const TOP_LEFT: Origin = Origin { x: OriginX::Left, y: OriginY::Top };
    pub const CENTER: Origin = Origin { x: OriginX::Center, y: OriginY::Center };

    /// Fraction of the object's width/height at which the anchor sits.
    pub fn factors(&self) -> (f64, f64) {
        let fx = match self.x {
            OriginX::Left => 0.0,
            OriginX::Center => 0.5,
            OriginX::Right => 1.0,
        };
        let fy = match self.y {
            OriginY::Top => 0.0,
            OriginY::Center => 0.5,
            OriginY::Bottom => 1.0,
        };
        (fx, fy)
    }
}

/// Position, scale, rotation and origin of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, clockwise.
    pub angle: f64,
    pub origin: Origin,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin: Origin::TOP_LEFT,
        }
    }
}

impl Transform {
    pub fn is_finite(&self) -> bool {
        [self.left, self.top, self.scale_x, self.scale_y, self.angle]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Stroke appearance of a freehand path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: String,
}

/// Rectangle in an image's natural pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A raster image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub src: String,
    /// Natural width of the visible content, in source pixels.
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Visible region of `src`; `None` shows the whole source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
}

impl ImageObject {
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
            filters: Vec::new(),
            crop: None,
        }
    }
}

/// A freehand stroke. Only ever used as mask geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathObject {
    pub points: Vec<Point>,
    pub stroke: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
}

/// Variant payload of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Image(ImageObject),
    Path(PathObject),
    Text(TextObject),
}

/// One visual object in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub transform: Transform,
    pub selectable: bool,
    pub evented: bool,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Reject geometry or parameters that cannot be stored and restored.
    pub fn check(&self) -> Result<(), String> {
        if !self.transform.is_finite() {
            return Err(format!("object {} has a non-finite transform", self.id));
        }
        match &self.kind {
            ObjectKind::Image(image) => {
                if image.width == 0 || image.height == 0 {
                    return Err(format!("image {} has empty bounds", self.id));
                }
                if !image.filters.iter().all(|f| f.is_finite()) {
                    return Err(format!("image {} has invalid filter values", self.id));
                }
            }
            ObjectKind::Path(path) => {
                if !path.points.iter().all(|p| p.is_finite()) {
                    return Err(format!("path {} has invalid points", self.id));
                }
            }
            ObjectKind::Text(_) => {}
        }
        Ok(())
    }

    /// Create an interactive object. The id is assigned by the scene store.
    pub fn new(kind: ObjectKind, transform: Transform) -> Self {
        Self {
            id: ObjectId(0),
            transform,
            selectable: true,
            evented: true,
            kind,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, ObjectKind::Path(_))
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match &self.kind {
            ObjectKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageObject> {
        match &mut self.kind {
            ObjectKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathObject> {
        match &self.kind {
            ObjectKind::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Type tag as written in serialized scenes.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Image(_) => "image",
            ObjectKind::Path(_) => "path",
            ObjectKind::Text(_) => "text",
        }
    }

    /// Unscaled size of the object's bounding box.
    pub fn natural_size(&self) -> (f64, f64) {
        match &self.kind {
            ObjectKind::Image(image) => (image.width as f64, image.height as f64),
            ObjectKind::Path(path) => {
                let (min, max) = path_bounds(&path.points);
                (max.x - min.x, max.y - min.y)
            }
            ObjectKind::Text(text) => {
                // Rough metrics; text layout belongs to the renderer.
                let chars = text.text.chars().count().max(1) as f64;
                (chars * text.font_size * 0.6, text.font_size * 1.16)
            }
        }
    }

    /// Size on the canvas after applying scale.
    pub fn scaled_size(&self) -> (f64, f64) {
        let (w, h) = self.natural_size();
        (w * self.transform.scale_x.abs(), h * self.transform.scale_y.abs())
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.selectable = interactive;
        self.evented = interactive;
    }
}

/// Axis-aligned bounds of a point list.
pub fn path_bounds(points: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    if points.is_empty() {
        (Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_serializes_with_type_tag() {
        let obj = SceneObject::new(
            ObjectKind::Image(ImageObject::new("a.png", 10, 20)),
            Transform::default(),
        );
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["src"], "a.png");
        assert_eq!(json["transform"]["origin"]["x"], "left");
    }

    #[test]
    fn test_origin_factors() {
        assert_eq!(Origin::TOP_LEFT.factors(), (0.0, 0.0));
        assert_eq!(Origin::CENTER.factors(), (0.5, 0.5));
    }

    #[test]
    fn test_scaled_size_uses_scale() {
        let mut obj = SceneObject::new(
            ObjectKind::Image(ImageObject::new("a.png", 100, 50)),
            Transform::default(),
        );
        obj.transform.scale_x = 2.0;
        obj.transform.scale_y = 0.5;
        assert_eq!(obj.scaled_size(), (200.0, 25.0));
    }
}
