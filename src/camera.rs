//! Player-following camera
//!
//! Maps between world coordinates and screen pixels. Hosts use it to draw
//! the visible part of the world and to turn a mouse position into an aim
//! point for [`crate::sim::Fire`].

use glam::Vec2;

use crate::sim::Rect;

/// Closest zoom (world drawn 3x larger)
pub const MAX_ZOOM: f32 = 3.0;
/// Farthest zoom
pub const MIN_ZOOM: f32 = 0.5;
/// Follow smoothing rate (per second)
const FOLLOW_SMOOTH: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position shown at the middle of the screen
    pub center: Vec2,
    /// Screen size in pixels
    pub viewport: Vec2,
    /// Screen pixels per world unit
    zoom: f32,
}

impl Camera {
    pub fn new(center: Vec2, viewport: Vec2) -> Self {
        Self {
            center,
            viewport,
            zoom: 1.0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Multiply the zoom factor (mouse wheel)
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Ease toward `target`, snapping once within a pixel's worth
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = (FOLLOW_SMOOTH * dt).min(1.0);
        self.center += (target - self.center) * t;
        if self.center.distance(target) * self.zoom < 1.0 {
            self.center = target;
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.zoom + self.viewport / 2.0
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport / 2.0) / self.zoom + self.center
    }

    /// World area currently on screen
    pub fn visible_rect(&self) -> Rect {
        Rect::centered(self.center, self.viewport / self.zoom)
    }

    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.visible_rect().overlaps(rect)
    }
}
