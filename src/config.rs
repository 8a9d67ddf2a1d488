//! Engine configuration.
//!
//! DESIGN
//! ======
//! Every tunable number the engine consults (zoom bounds, handle sizes, pan
//! envelope ratios, mark size limits, snapshot capacity) lives in one
//! immutable [`EngineConfig`] handed to [`crate::engine::Engine::new`]. The
//! defaults come from [`crate::consts`]; hosts may deserialize a partial JSON
//! document over them or override a handful of values from `MARKCANVAS_*`
//! environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} bounds are inverted or out of range: min {min}, max {max}")]
    InvalidBounds { name: &'static str, min: f64, max: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("snapshot capacity must be at least 1")]
    ZeroCapacity,
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Zoom limits and snapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    /// Narrower range applied to wheel-driven changes.
    pub wheel_min: f64,
    pub wheel_max: f64,
    pub snap_levels: Vec<f64>,
    /// Relative tolerance: a zoom `z` snaps onto `level` when `|z - level| <= level * tolerance`.
    pub snap_tolerance: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: consts::MIN_ZOOM,
            max: consts::MAX_ZOOM,
            wheel_min: consts::WHEEL_MIN_ZOOM,
            wheel_max: consts::WHEEL_MAX_ZOOM,
            snap_levels: consts::ZOOM_SNAP_LEVELS.to_vec(),
            snap_tolerance: consts::ZOOM_SNAP_TOLERANCE,
        }
    }
}

/// Hit regions, all in screen pixels (converted to world units at the current zoom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    pub radius_px: f64,
    pub resize_px: f64,
    pub rotate_offset_px: f64,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            radius_px: consts::HANDLE_RADIUS_PX,
            resize_px: consts::RESIZE_HANDLE_PX,
            rotate_offset_px: consts::ROTATE_HANDLE_OFFSET_PX,
        }
    }
}

/// Pan envelope and grid-lock behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    pub ratio_zoomed_in: f64,
    pub ratio_zoomed_out: f64,
    /// Whether grid lock also freezes the pan offset.
    pub lock_blocks_pan: bool,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            ratio_zoomed_in: consts::PAN_RATIO_ZOOMED_IN,
            ratio_zoomed_out: consts::PAN_RATIO_ZOOMED_OUT,
            lock_blocks_pan: true,
        }
    }
}

/// Geometry limits shared by generic resize and the variant controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_size: f64,
    pub max_size: f64,
    pub step_divisor: f64,
    pub matrix_dead_zone: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_size: consts::MIN_MARK_SIZE,
            max_size: consts::MAX_MARK_SIZE,
            step_divisor: consts::CONTROL_STEP_DIVISOR,
            matrix_dead_zone: consts::MATRIX_DEAD_ZONE,
        }
    }
}

impl SizeLimits {
    /// Clamp a width or height into `[min_size, max_size]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        bounded(value, self.min_size, self.max_size)
    }
}

/// Physical marking window used for pointwise coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingArea {
    pub width_units: f64,
    pub height_units: f64,
    pub pixels_per_unit: f64,
}

impl Default for WorkingArea {
    fn default() -> Self {
        Self {
            width_units: consts::WORKING_AREA_WIDTH,
            height_units: consts::WORKING_AREA_HEIGHT,
            pixels_per_unit: consts::PIXELS_PER_UNIT,
        }
    }
}

impl WorkingArea {
    /// Width of the area in world units.
    #[must_use]
    pub fn pixel_width(&self) -> f64 {
        self.width_units * self.pixels_per_unit
    }

    /// Height of the area in world units.
    #[must_use]
    pub fn pixel_height(&self) -> f64 {
        self.height_units * self.pixels_per_unit
    }
}

/// Undo history and destructive-clear timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub clear_highlight_ms: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: consts::SNAPSHOT_CAPACITY, clear_highlight_ms: consts::CLEAR_HIGHLIGHT_MS }
    }
}

/// Clamp that tolerates inverted or NaN bounds from an unvalidated config:
/// `hi` wins when the bounds cross.
#[must_use]
pub(crate) fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Immutable configuration supplied at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom: ZoomConfig,
    pub handles: HandleConfig,
    pub pan: PanConfig,
    pub limits: SizeLimits,
    pub working_area: WorkingArea,
    pub history: HistoryConfig,
    /// Refuse resize gestures on size-locked marks with a notice instead of
    /// entering a resize drag that cannot change anything.
    pub reject_locked_resize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomConfig::default(),
            handles: HandleConfig::default(),
            pan: PanConfig::default(),
            limits: SizeLimits::default(),
            working_area: WorkingArea::default(),
            history: HistoryConfig::default(),
            reject_locked_resize: true,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `MARKCANVAS_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.history.capacity = env_parse("MARKCANVAS_SNAPSHOT_CAPACITY", config.history.capacity);
        config.handles.radius_px = env_parse("MARKCANVAS_HANDLE_RADIUS_PX", config.handles.radius_px);
        config.handles.resize_px = env_parse("MARKCANVAS_RESIZE_HANDLE_PX", config.handles.resize_px);
        config.zoom.max = env_parse("MARKCANVAS_MAX_ZOOM", config.zoom.max);
        config.limits.min_size = env_parse("MARKCANVAS_MIN_MARK_SIZE", config.limits.min_size);
        config.limits.max_size = env_parse("MARKCANVAS_MAX_MARK_SIZE", config.limits.max_size);
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_bounds("zoom", self.zoom.min, self.zoom.max)?;
        check_bounds("wheel zoom", self.zoom.wheel_min, self.zoom.wheel_max)?;
        if self.zoom.wheel_min < self.zoom.min || self.zoom.wheel_max > self.zoom.max {
            return Err(ConfigError::InvalidBounds {
                name: "wheel zoom",
                min: self.zoom.wheel_min,
                max: self.zoom.wheel_max,
            });
        }
        check_bounds("mark size", self.limits.min_size, self.limits.max_size)?;
        check_positive("handle radius", self.handles.radius_px)?;
        check_positive("resize handle", self.handles.resize_px)?;
        check_positive("step divisor", self.limits.step_divisor)?;
        check_positive("matrix dead zone", self.limits.matrix_dead_zone)?;
        check_positive("working area width", self.working_area.width_units)?;
        check_positive("working area height", self.working_area.height_units)?;
        check_positive("pixels per unit", self.working_area.pixels_per_unit)?;
        if self.history.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

fn check_bounds(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds { name, min, max })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(ConfigError::NotPositive { name, value }) }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(&raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(raw: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.trim().parse::<T>().unwrap_or(default)
}
