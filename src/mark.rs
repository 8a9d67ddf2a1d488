//! Mark model: the base placeable entity and its per-variant capability trait.
//!
//! A [`Mark`] carries the geometry and flags every variant shares. The
//! variant payload ([`MarkKind`]) implements [`MarkShape`], which is the only
//! place variant-specific behavior lives: control anchors, containment,
//! control drags, post-resize fixups, and mirroring. `Mark` dispatches to it
//! through a single exhaustive match in [`MarkKind::shape`].
//!
//! Deep copies are the derived `Clone`; every variant field is copied.

#[cfg(test)]
#[path = "mark_test.rs"]
mod mark_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SizeLimits;
use crate::hit::{ControlHandle, HandleMetrics};
use crate::mirror::MirrorDirection;
use crate::variants::{
    ArcLetters, AvoidPoint, Barcode, BowText, DotMatrix, Farzi, Graph, LineMark, RectangleMark, Ruler, TextMark,
};
use crate::viewport::Point;

/// Unique identifier for a mark.
pub type MarkId = Uuid;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Failure while applying a drag, resize, or control update to a mark.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragError {
    #[error("pointer position is not finite: ({x}, {y})")]
    NonFinitePointer { x: f64, y: f64 },
    #[error("mark not found: {0}")]
    MarkMissing(MarkId),
    #[error("{variant} has no {handle:?} control")]
    UnsupportedHandle { variant: &'static str, handle: ControlHandle },
    #[error("update produced degenerate geometry on {variant}")]
    DegenerateGeometry { variant: &'static str },
}

// =============================================================================
// GEOMETRY AND FLAGS
// =============================================================================

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive point-in-box test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Persistent per-mark permissions and render flags.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkFlags {
    pub can_drag: bool,
    pub can_resize: bool,
    /// Width and height may not change while set.
    pub lock_size: bool,
    pub disable_print: bool,
    /// Render-side mirror flag, toggled by every mirror operation.
    pub mirrored: bool,
    /// Mark is locked against move and mirror transformations.
    pub lock_transform: bool,
}

impl Default for MarkFlags {
    fn default() -> Self {
        Self {
            can_drag: true,
            can_resize: true,
            lock_size: false,
            disable_print: false,
            mirrored: false,
            lock_transform: false,
        }
    }
}

/// Transient flags describing a gesture in progress on this mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureFlags {
    pub dragging: bool,
    pub resizing: bool,
}

/// Pointer context for a control-handle drag.
///
/// `anchor` is the world point the last step was measured from; stepped
/// controls move it to the pointer after each step. `accum` collects travel
/// for controls with a dead zone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlDrag {
    pub pointer: Point,
    pub anchor: Point,
    pub accum: Point,
}

// =============================================================================
// CAPABILITY TRAIT
// =============================================================================

/// Variant-specific behavior of a mark.
pub trait MarkShape {
    /// Short variant name for logs and errors.
    fn label(&self) -> &'static str;

    /// Special control handles and their world-space anchors, in test order.
    fn controls(&self, _bounds: &Bounds, _metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        Vec::new()
    }

    /// Whether `p` lies on the mark body. `tolerance` widens thin shapes.
    fn contains(&self, bounds: &Bounds, p: Point, _tolerance: f64) -> bool {
        bounds.contains(p)
    }

    /// Update the variant (and possibly its bounds) from a control drag.
    fn apply_control(
        &mut self,
        _bounds: &mut Bounds,
        handle: ControlHandle,
        _drag: &mut ControlDrag,
        _limits: &SizeLimits,
    ) -> Result<(), DragError> {
        Err(DragError::UnsupportedHandle { variant: self.label(), handle })
    }

    /// Re-derive variant parameters after a generic resize changed `bounds`.
    fn on_resized(&mut self, _bounds: &mut Bounds, _limits: &SizeLimits) {}

    fn supports_mirror(&self) -> bool {
        true
    }

    /// Whether the variant carries text whose character order mirrors.
    fn is_text_bearing(&self) -> bool {
        false
    }

    /// Direction used when the caller does not name one: wider-than-tall
    /// shapes flip vertically, everything else horizontally.
    fn default_mirror(&self, bounds: &Bounds) -> MirrorDirection {
        if bounds.width > bounds.height { MirrorDirection::Vertical } else { MirrorDirection::Horizontal }
    }

    /// Variant-specific part of a mirror (character order, orientation flags, angles).
    fn mirror_content(&mut self, _direction: MirrorDirection) {}
}

/// Variant payload of a mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkKind {
    Text(TextMark),
    ArcLetters(ArcLetters),
    BowText(BowText),
    Ruler(Ruler),
    DotMatrix(DotMatrix),
    Graph(Graph),
    Rectangle(RectangleMark),
    Line(LineMark),
    Farzi(Farzi),
    AvoidPoint(AvoidPoint),
    Barcode(Barcode),
}

impl MarkKind {
    #[must_use]
    pub fn shape(&self) -> &dyn MarkShape {
        match self {
            Self::Text(v) => v,
            Self::ArcLetters(v) => v,
            Self::BowText(v) => v,
            Self::Ruler(v) => v,
            Self::DotMatrix(v) => v,
            Self::Graph(v) => v,
            Self::Rectangle(v) => v,
            Self::Line(v) => v,
            Self::Farzi(v) => v,
            Self::AvoidPoint(v) => v,
            Self::Barcode(v) => v,
        }
    }

    pub fn shape_mut(&mut self) -> &mut dyn MarkShape {
        match self {
            Self::Text(v) => v,
            Self::ArcLetters(v) => v,
            Self::BowText(v) => v,
            Self::Ruler(v) => v,
            Self::DotMatrix(v) => v,
            Self::Graph(v) => v,
            Self::Rectangle(v) => v,
            Self::Line(v) => v,
            Self::Farzi(v) => v,
            Self::AvoidPoint(v) => v,
            Self::Barcode(v) => v,
        }
    }
}

// =============================================================================
// MARK
// =============================================================================

/// A placeable, editable design object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: MarkId,
    pub bounds: Bounds,
    #[serde(default)]
    pub flags: MarkFlags,
    #[serde(skip)]
    pub gesture: GestureFlags,
    pub kind: MarkKind,
}

impl Mark {
    /// Create a mark with a fresh id and default flags.
    ///
    /// Avoid points are fixed-size keep-out markers and start non-resizable.
    #[must_use]
    pub fn new(kind: MarkKind, bounds: Bounds) -> Self {
        let flags = MarkFlags { can_resize: !matches!(kind, MarkKind::AvoidPoint(_)), ..MarkFlags::default() };
        Self { id: Uuid::new_v4(), bounds, flags, gesture: GestureFlags::default(), kind }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MarkFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.kind.shape().label()
    }

    #[must_use]
    pub fn controls(&self, metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        self.kind.shape().controls(&self.bounds, metrics)
    }

    #[must_use]
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        self.kind.shape().contains(&self.bounds, p, tolerance)
    }

    /// Translate the mark by a world-space delta.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<(), DragError> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(DragError::NonFinitePointer { x: dx, y: dy });
        }
        self.bounds.x += dx;
        self.bounds.y += dy;
        Ok(())
    }

    /// Generic resize: the bottom-right corner follows `p`, within the size limits.
    ///
    /// Returns `Ok(false)` without touching the mark when it is size-locked
    /// or not resizable.
    pub fn resize_to(&mut self, p: Point, limits: &SizeLimits) -> Result<bool, DragError> {
        if !p.is_finite() {
            return Err(DragError::NonFinitePointer { x: p.x, y: p.y });
        }
        if self.flags.lock_size || !self.flags.can_resize {
            return Ok(false);
        }
        let before = self.bounds;
        self.bounds.width = limits.clamp(p.x - self.bounds.x);
        self.bounds.height = limits.clamp(p.y - self.bounds.y);
        self.kind.shape_mut().on_resized(&mut self.bounds, limits);
        self.check_geometry(before)?;
        Ok(true)
    }

    /// Route a control drag to the variant.
    ///
    /// Size-changing handles are inert on size-locked or non-resizable marks, and the ruler's
    /// position handle is inert on marks that cannot be dragged.
    pub fn apply_control(
        &mut self,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<bool, DragError> {
        if !drag.pointer.is_finite() {
            return Err(DragError::NonFinitePointer { x: drag.pointer.x, y: drag.pointer.y });
        }
        if handle.changes_size() && (self.flags.lock_size || !self.flags.can_resize) {
            return Ok(false);
        }
        if handle.moves_mark() && (!self.flags.can_drag || self.flags.lock_transform) {
            return Ok(false);
        }
        let before = self.bounds;
        self.kind.shape_mut().apply_control(&mut self.bounds, handle, drag, limits)?;
        self.check_geometry(before)?;
        Ok(true)
    }

    fn check_geometry(&mut self, before: Bounds) -> Result<(), DragError> {
        if self.bounds.is_finite() {
            return Ok(());
        }
        self.bounds = before;
        Err(DragError::DegenerateGeometry { variant: self.label() })
    }
}
