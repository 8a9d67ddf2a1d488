//! Viewport transform: zoom, pan, grid lock, and the pointwise working area.
//!
//! All state is private and changes only through the gated setters below, so
//! the zoom bounds and the grid lock cannot be bypassed by callers.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, PanConfig, WorkingArea, ZoomConfig, bounded};
use crate::consts::POINTWISE_RANGE;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Zoom/pan state for the design canvas.
///
/// `pan` is in screen pixels; `zoom` is a scale factor (1.0 = one world unit
/// per pixel).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    grid_locked: bool,
    locked_zoom: Option<f64>,
    width: f64,
    height: f64,
    zoom_cfg: ZoomConfig,
    pan_cfg: PanConfig,
    area: WorkingArea,
}

impl Viewport {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            zoom: bounded(1.0, config.zoom.min, config.zoom.max),
            pan: Point::default(),
            grid_locked: false,
            locked_zoom: None,
            width: 0.0,
            height: 0.0,
            zoom_cfg: config.zoom.clone(),
            pan_cfg: config.pan.clone(),
            area: config.working_area,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn grid_locked(&self) -> bool {
        self.grid_locked
    }

    /// Zoom captured when the grid lock was engaged, if it is engaged.
    #[must_use]
    pub fn locked_zoom(&self) -> Option<f64> {
        self.locked_zoom
    }

    /// Canvas size in screen pixels.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    // --- Conversions ---

    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan.x) / self.zoom, y: (screen.y - self.pan.y) / self.zoom }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x * self.zoom + self.pan.x, y: world.y * self.zoom + self.pan.y }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    // --- Setters ---

    /// Record the canvas size. Non-finite or negative sizes become zero,
    /// which disables the pan envelope on that axis.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
    }

    /// Engage or release the grid lock. Engaging captures the current zoom.
    pub fn set_grid_lock(&mut self, locked: bool) {
        self.grid_locked = locked;
        self.locked_zoom = locked.then_some(self.zoom);
        debug!(locked, zoom = self.zoom, "viewport: grid lock changed");
    }

    /// Multiply the zoom by `factor`, keeping the world point under `screen` fixed.
    ///
    /// Returns `false` (and changes nothing) while grid-locked or for a
    /// non-finite/non-positive factor.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        self.zoom_at_within(screen, factor, self.zoom_cfg.min, self.zoom_cfg.max)
    }

    /// Wheel-driven zoom: `dy < 0` zooms in by the adaptive factor, `dy > 0` zooms out.
    /// Bounded by the narrower wheel range, which only stops the wheel from
    /// pushing further out: a zoom already beyond it never jumps back.
    pub fn wheel_zoom(&mut self, screen: Point, dy: f64) -> bool {
        if dy == 0.0 || !dy.is_finite() {
            return false;
        }
        let (wheel_min, wheel_max) = (self.zoom_cfg.wheel_min, self.zoom_cfg.wheel_max);
        let zoom_in = dy < 0.0;
        if (zoom_in && self.zoom >= wheel_max) || (!zoom_in && self.zoom <= wheel_min) {
            debug!(zoom = self.zoom, zoom_in, "viewport: wheel step outside wheel range ignored");
            return false;
        }
        let step = adaptive_factor(self.zoom);
        let factor = if zoom_in { step } else { 1.0 / step };
        self.zoom_at_within(screen, factor, wheel_min.min(self.zoom), wheel_max.max(self.zoom))
    }

    /// Set an absolute zoom, anchored on the viewport center.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if self.reject_zoom() || !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        let center = Point::new(self.width * 0.5, self.height * 0.5);
        let world = self.screen_to_world(center);
        self.zoom = bounded(zoom, self.zoom_cfg.min, self.zoom_cfg.max);
        self.anchor(world, center);
        true
    }

    /// Shift the pan offset by a screen-space delta, then clamp it to the envelope.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if self.grid_locked && self.pan_cfg.lock_blocks_pan {
            debug!(dx, dy, "viewport: pan rejected while grid locked");
            return false;
        }
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        self.pan.x += dx;
        self.pan.y += dy;
        self.clamp_pan();
        true
    }

    /// Return to zoom 1.0 with no pan.
    pub fn reset(&mut self) -> bool {
        if self.reject_zoom() {
            return false;
        }
        self.zoom = bounded(1.0, self.zoom_cfg.min, self.zoom_cfg.max);
        self.pan = Point::default();
        true
    }

    // --- Working area ---

    /// Top-left corner and size of the working area in world space.
    ///
    /// The area is centered on the canvas as seen at zoom 1 with no pan, so it
    /// stays fixed in world space while the user zooms and pans.
    #[must_use]
    pub fn working_area_rect(&self) -> (Point, Point) {
        let size = Point::new(self.area.pixel_width(), self.area.pixel_height());
        let origin = Point::new((self.width - size.x) * 0.5, (self.height - size.y) * 0.5);
        (origin, size)
    }

    /// World-space center of the working area.
    #[must_use]
    pub fn working_area_center(&self) -> Point {
        let (origin, size) = self.working_area_rect();
        Point::new(origin.x + size.x * 0.5, origin.y + size.y * 0.5)
    }

    /// Map a screen pixel to the 0–10 pointwise scale of the working area.
    #[must_use]
    pub fn pixel_to_pointwise(&self, screen: Point) -> Point {
        let world = self.screen_to_world(screen);
        let (origin, size) = self.working_area_rect();
        let rel_x = ((world.x - origin.x) / size.x).clamp(0.0, 1.0);
        let rel_y = ((world.y - origin.y) / size.y).clamp(0.0, 1.0);
        Point::new(rel_x * POINTWISE_RANGE, rel_y * POINTWISE_RANGE)
    }

    /// Map a pointwise coordinate back to a screen pixel.
    #[must_use]
    pub fn pointwise_to_pixel(&self, pointwise: Point) -> Point {
        let (origin, size) = self.working_area_rect();
        let rel_x = (pointwise.x / POINTWISE_RANGE).clamp(0.0, 1.0);
        let rel_y = (pointwise.y / POINTWISE_RANGE).clamp(0.0, 1.0);
        self.world_to_screen(Point::new(origin.x + rel_x * size.x, origin.y + rel_y * size.y))
    }

    /// Pointwise coordinate rounded to two decimals for the operator readout.
    #[must_use]
    pub fn pointwise_readout(&self, screen: Point) -> Point {
        let q = self.pixel_to_pointwise(screen);
        Point::new((q.x * 100.0).round() / 100.0, (q.y * 100.0).round() / 100.0)
    }

    // --- Internals ---

    fn reject_zoom(&self) -> bool {
        if self.grid_locked {
            debug!(zoom = self.zoom, "viewport: zoom rejected while grid locked");
        }
        self.grid_locked
    }

    fn zoom_at_within(&mut self, screen: Point, factor: f64, min: f64, max: f64) -> bool {
        if self.reject_zoom() {
            return false;
        }
        if !factor.is_finite() || factor <= 0.0 || !screen.is_finite() {
            return false;
        }
        let world = self.screen_to_world(screen);
        let raw = bounded(self.zoom * factor, min, max);
        self.zoom = bounded(snap_zoom(raw, &self.zoom_cfg.snap_levels, self.zoom_cfg.snap_tolerance), min, max);
        self.anchor(world, screen);
        true
    }

    /// Recompute the pan so that `world` lands on `screen` at the current zoom.
    fn anchor(&mut self, world: Point, screen: Point) {
        self.pan = Point::new(screen.x - world.x * self.zoom, screen.y - world.y * self.zoom);
    }

    fn clamp_pan(&mut self) {
        let ratio = if self.zoom >= 1.0 { self.pan_cfg.ratio_zoomed_in } else { self.pan_cfg.ratio_zoomed_out };
        let scale = ratio * self.zoom.max(1.0);
        if self.width > 0.0 {
            let limit = self.width * scale;
            self.pan.x = bounded(self.pan.x, -limit, limit);
        }
        if self.height > 0.0 {
            let limit = self.height * scale;
            self.pan.y = bounded(self.pan.y, -limit, limit);
        }
    }
}

/// Wheel step for the given zoom: coarse near the bottom of the range, fine near the top.
#[must_use]
pub fn adaptive_factor(zoom: f64) -> f64 {
    if zoom < 2.0 {
        1.2
    } else if zoom < 4.0 {
        1.15
    } else {
        1.1
    }
}

/// Round `zoom` onto the first snap level within `tolerance` (relative) of it.
#[must_use]
pub fn snap_zoom(zoom: f64, levels: &[f64], tolerance: f64) -> f64 {
    levels
        .iter()
        .copied()
        .find(|level| (zoom - level).abs() <= level * tolerance)
        .unwrap_or(zoom)
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
