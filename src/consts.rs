//! Default numeric constants for the engine.
//!
//! These only seed [`crate::config::EngineConfig::default`]; the engine itself
//! always reads the configuration value it was constructed with.

// ── Zoom ────────────────────────────────────────────────────────

/// Lowest zoom reachable through any setter.
pub const MIN_ZOOM: f64 = 0.1;

/// Highest zoom reachable through any setter.
pub const MAX_ZOOM: f64 = 10.0;

/// Lowest zoom reachable with the mouse wheel.
pub const WHEEL_MIN_ZOOM: f64 = 0.1;

/// Highest zoom reachable with the mouse wheel.
pub const WHEEL_MAX_ZOOM: f64 = 5.0;

/// Zoom levels that a computed zoom snaps onto (50 %, 100 %, 200 %).
pub const ZOOM_SNAP_LEVELS: [f64; 3] = [0.5, 1.0, 2.0];

/// Relative distance to a snap level inside which the zoom is rounded onto it.
pub const ZOOM_SNAP_TOLERANCE: f64 = 0.05;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels of a special control handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Screen-space side length in pixels of the generic resize square.
pub const RESIZE_HANDLE_PX: f64 = 10.0;

/// Distance from an arc's rim to its rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Pan envelope ────────────────────────────────────────────────

/// Fraction of the (zoomed) viewport extent the pan may reach when zoomed in.
pub const PAN_RATIO_ZOOMED_IN: f64 = 1.0;

/// Fraction of the viewport extent the pan may reach when zoomed out.
pub const PAN_RATIO_ZOOMED_OUT: f64 = 0.5;

// ── Marks ───────────────────────────────────────────────────────

/// Smallest width or height a resize may produce, in world units.
pub const MIN_MARK_SIZE: f64 = 5.0;

/// Largest width or height a resize may produce, in world units.
pub const MAX_MARK_SIZE: f64 = 5000.0;

/// Divisor applied to pointer deltas by stepped controls (dot pitch, diameter).
pub const CONTROL_STEP_DIVISOR: f64 = 5.0;

/// Accumulated pointer travel before the dot-matrix size steps once.
pub const MATRIX_DEAD_ZONE: f64 = 15.0;

// ── Working area ────────────────────────────────────────────────

/// Physical width of the marking window, in millimetres.
pub const WORKING_AREA_WIDTH: f64 = 100.0;

/// Physical height of the marking window, in millimetres.
pub const WORKING_AREA_HEIGHT: f64 = 60.0;

/// World units (pixels at zoom 1) per millimetre.
pub const PIXELS_PER_UNIT: f64 = 4.0;

/// Upper bound of the operator-facing pointwise scale on each axis.
pub const POINTWISE_RANGE: f64 = 10.0;

// ── History ─────────────────────────────────────────────────────

/// Number of undo snapshots retained before the oldest is evicted.
pub const SNAPSHOT_CAPACITY: usize = 20;

/// Delay between highlighting the marks and clearing them.
pub const CLEAR_HIGHLIGHT_MS: u32 = 300;
