// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mask authoring.
//!
//! Freehand strokes are added to the scene as path objects while drawing
//! mode is on. Committing rasterizes every path into a grayscale mask in
//! the main image's local space and removes the paths from the scene.

use super::store::{Cursor, SceneStore};
use crate::error::{EditorError, EditorResult};
use crate::io::media;
use crate::models::object::{ObjectId, ObjectKind, PathObject, Point, SceneObject, StrokeStyle, Transform};
use crate::util::geometry;
use image::{GrayImage, Luma};

/// Mask authoring state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskState {
    #[default]
    Idle,
    Drawing,
    /// Mask handed off to the remote service.
    Committing,
}

/// Rasterized mask ready for upload.
#[derive(Debug, Clone)]
pub struct MaskRaster {
    /// Main image the mask was drawn over.
    pub target: ObjectId,
    pub image: GrayImage,
    pub png: Vec<u8>,
}

impl MaskRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of pixels marked for removal.
    pub fn coverage(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] > 0).count()
    }
}

pub struct MaskAuthoring {
    state: MaskState,
    failed: bool,
    brush: StrokeStyle,
}

impl MaskAuthoring {
    pub fn new(brush: StrokeStyle) -> Self {
        Self {
            state: MaskState::Idle,
            failed: false,
            brush,
        }
    }

    pub fn state(&self) -> MaskState {
        self.state
    }

    /// True after the remote call for the last commit failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn brush(&self) -> &StrokeStyle {
        &self.brush
    }

    /// Switch the canvas into freehand drawing.
    pub fn enter_drawing(&mut self, store: &mut SceneStore) -> EditorResult<()> {
        match self.state {
            MaskState::Drawing => return Ok(()),
            MaskState::Committing if !self.failed => {
                return Err(EditorError::InvalidState("mask commit in progress".to_string()));
            }
            _ => {}
        }

        if let Some(id) = store.find_main_image().map(|o| o.id) {
            store.set_interactive(id, false)?;
        }
        store.set_selection_enabled(false);
        store.discard_active();
        store.set_drawing_mode(true);
        store.set_cursor(Cursor::Brush);

        self.state = MaskState::Drawing;
        self.failed = false;
        log::debug!("Mask drawing started");
        Ok(())
    }

    /// Add one freehand stroke in scene coordinates.
    pub fn add_stroke(&mut self, store: &mut SceneStore, points: Vec<Point>) -> EditorResult<ObjectId> {
        if self.state != MaskState::Drawing {
            return Err(EditorError::InvalidState("not in drawing mode".to_string()));
        }
        if points.is_empty() || !points.iter().all(|p| p.is_finite()) {
            return Err(EditorError::InvalidState("stroke needs finite points".to_string()));
        }

        let mut path = SceneObject::new(
            ObjectKind::Path(PathObject {
                points,
                stroke: self.brush.clone(),
            }),
            Transform::default(),
        );
        path.set_interactive(false);
        Ok(store.add_object(path))
    }

    /// Leave drawing mode. Strokes stay on the canvas.
    pub fn exit_drawing(&mut self, store: &mut SceneStore) {
        if self.state != MaskState::Drawing {
            return;
        }
        restore_interaction(store);
        self.state = MaskState::Idle;
        log::debug!("Mask drawing stopped");
    }

    /// Remove every stroke. Returns how many were removed.
    pub fn clear_mask(&mut self, store: &mut SceneStore) -> EditorResult<usize> {
        if self.state == MaskState::Committing {
            return Err(EditorError::InvalidState("mask commit in progress".to_string()));
        }
        Ok(store.remove_where(|o| o.is_path()).len())
    }

    /// Rasterize all strokes into a mask over the main image and remove
    /// them from the scene.
    ///
    /// Fails without touching the scene when there is no main image or no
    /// stroke.
    pub fn commit_mask(&mut self, store: &mut SceneStore) -> EditorResult<MaskRaster> {
        if self.state == MaskState::Committing {
            return Err(EditorError::InvalidState("mask commit in progress".to_string()));
        }
        let subject = store.find_main_image().ok_or(EditorError::NoSubject)?;
        let paths: Vec<&PathObject> = store.objects().iter().filter_map(|o| o.as_path()).collect();
        if paths.is_empty() {
            return Err(EditorError::EmptyMask);
        }

        let target = subject.id;
        let image = rasterize(subject, &paths);
        let png = media::encode_png(&image).map_err(|e| EditorError::InvalidState(e.to_string()))?;

        self.exit_drawing(store);
        self.state = MaskState::Committing;
        self.failed = false;
        let removed = store.remove_where(|o| o.is_path());
        log::info!(
            "Mask committed: {} strokes, {}x{} raster",
            removed.len(),
            image.width(),
            image.height()
        );

        Ok(MaskRaster { target, image, png })
    }

    /// Report the outcome of the remote call that consumed the last mask.
    pub fn finish_commit(&mut self, success: bool) {
        if self.state != MaskState::Committing {
            log::warn!("Mask commit finished while in {:?}", self.state);
            return;
        }
        if success {
            self.state = MaskState::Idle;
            self.failed = false;
        } else {
            // Stays in Committing until the user draws again
            self.failed = true;
        }
    }
}

fn restore_interaction(store: &mut SceneStore) {
    if let Some(id) = store.find_main_image().map(|o| o.id) {
        if let Err(e) = store.set_interactive(id, true) {
            log::warn!("Could not restore interactivity: {}", e);
        }
    }
    store.set_selection_enabled(true);
    store.set_drawing_mode(false);
    store.set_cursor(Cursor::Default);
}

/// Stamp every stroke into a mask the size of the subject's scaled bounds.
fn rasterize(subject: &SceneObject, paths: &[&PathObject]) -> GrayImage {
    let (sw, sh) = subject.scaled_size();
    let width = (sw.round() as u32).max(1);
    let height = (sh.round() as u32).max(1);
    let mut mask = GrayImage::new(width, height);

    for path in paths {
        let radius = (path.stroke.width / 2.0).max(0.5);
        let local: Vec<Point> = path
            .points
            .iter()
            .map(|p| geometry::scene_to_local(*p, &subject.transform, (sw, sh)))
            .collect();

        if let [only] = local.as_slice() {
            stamp_disc(&mut mask, *only, radius);
            continue;
        }
        for pair in local.windows(2) {
            stamp_segment(&mut mask, pair[0], pair[1], radius);
        }
    }
    mask
}

fn stamp_segment(mask: &mut GrayImage, from: Point, to: Point, radius: f64) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length = (dx * dx + dy * dy).sqrt();
    let step = (radius / 2.0).max(0.5);
    let steps = (length / step).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        stamp_disc(mask, Point::new(from.x + dx * t, from.y + dy * t), radius);
    }
}

fn stamp_disc(mask: &mut GrayImage, center: Point, radius: f64) {
    let (w, h) = mask.dimensions();
    let x0 = (center.x - radius).floor().max(0.0);
    let y0 = (center.y - radius).floor().max(0.0);
    let x1 = (center.x + radius).ceil().min(w as f64 - 1.0);
    let y1 = (center.y + radius).ceil().min(h as f64 - 1.0);
    if x1 < x0 || y1 < y0 {
        return;
    }

    for py in y0 as u32..=y1 as u32 {
        for px in x0 as u32..=x1 as u32 {
            // Sample at pixel centers
            let ddx = px as f64 + 0.5 - center.x;
            let ddy = py as f64 + 0.5 - center.y;
            if ddx * ddx + ddy * ddy <= radius * radius {
                mask.put_pixel(px, py, Luma([255]));
            }
        }
    }
}
