// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport mapping between the project canvas and the screen.
//!
//! The canvas is shown scaled down to fit its container (never enlarged)
//! and centered. Object coordinates are never touched: the viewport is a
//! pure zoom applied at render time.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Logical canvas size in project pixels.
    canvas: Vec2,
    /// Screen area available for the canvas.
    container: Rect,
    padding: f32,
    max_scale: f32,
}

impl Viewport {
    pub fn new(canvas_width: u32, canvas_height: u32, padding: f32, max_scale: f32) -> Self {
        Self {
            canvas: vec2(canvas_width as f32, canvas_height as f32),
            container: Rect::from_min_size(Pos2::ZERO, vec2(canvas_width as f32, canvas_height as f32)),
            padding,
            max_scale,
        }
    }

    pub fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.container = Rect::from_min_size(self.container.min, vec2(width, height));
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas = vec2(width as f32, height as f32);
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    /// Zoom factor from project pixels to screen points.
    pub fn scale(&self) -> f32 {
        if self.canvas.x <= 0.0 || self.canvas.y <= 0.0 {
            return self.max_scale;
        }
        let available = self.container.size() - vec2(self.padding, self.padding);
        let scale = (available.x / self.canvas.x)
            .min(available.y / self.canvas.y)
            .min(self.max_scale);
        scale.max(0.0)
    }

    /// On-screen size of the canvas.
    pub fn display_size(&self) -> Vec2 {
        self.canvas * self.scale()
    }

    /// On-screen rectangle of the canvas, centered in the container.
    pub fn screen_rect(&self) -> Rect {
        Rect::from_center_size(self.container.center(), self.display_size())
    }

    pub fn screen_to_scene(&self, screen: Pos2) -> Pos2 {
        let scale = self.scale();
        if scale == 0.0 {
            return Pos2::ZERO;
        }
        let origin = self.screen_rect().min;
        pos2((screen.x - origin.x) / scale, (screen.y - origin.y) / scale)
    }

    pub fn scene_to_screen(&self, scene: Pos2) -> Pos2 {
        self.screen_rect().min + scene.to_vec2() * self.scale()
    }

    /// Whether a screen point falls on the canvas.
    pub fn contains(&self, screen: Pos2) -> bool {
        self.screen_rect().contains(screen)
    }
}
