//! Hit-testing and control-handle resolution.
//!
//! A press is resolved against the collection in insertion order. For each
//! mark the resolver tries, in order: the variant's special control handles,
//! the generic bottom-right resize square, and finally the variant's
//! containment test. The first mark that yields anything wins, so on overlap
//! the earliest-inserted mark is selected.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::collection::MarkCollection;
use crate::config::HandleConfig;
use crate::mark::{Bounds, Mark, MarkId};
use crate::viewport::{Point, Viewport};

/// Which part of a text box an edge handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomLeft,
    CornerBottomRight,
}

impl Edge {
    /// Corners first so they win over the adjacent edge midpoints on small marks.
    pub const ALL: [Edge; 8] = [
        Edge::CornerTopLeft,
        Edge::CornerTopRight,
        Edge::CornerBottomLeft,
        Edge::CornerBottomRight,
        Edge::Top,
        Edge::Bottom,
        Edge::Left,
        Edge::Right,
    ];

    /// World-space position of this handle on `bounds`.
    #[must_use]
    pub fn anchor(self, bounds: &Bounds) -> Point {
        let (cx, cy) = (bounds.x + bounds.width * 0.5, bounds.y + bounds.height * 0.5);
        let (right, bottom) = (bounds.right(), bounds.bottom());
        match self {
            Self::Top => Point::new(cx, bounds.y),
            Self::Bottom => Point::new(cx, bottom),
            Self::Left => Point::new(bounds.x, cy),
            Self::Right => Point::new(right, cy),
            Self::CornerTopLeft => Point::new(bounds.x, bounds.y),
            Self::CornerTopRight => Point::new(right, bounds.y),
            Self::CornerBottomLeft => Point::new(bounds.x, bottom),
            Self::CornerBottomRight => Point::new(right, bottom),
        }
    }

    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::CornerTopLeft | Self::CornerBottomLeft)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::CornerTopRight | Self::CornerBottomRight)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::CornerTopLeft | Self::CornerTopRight)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::CornerBottomLeft | Self::CornerBottomRight)
    }
}

/// A variant-specific control handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlHandle {
    // Arc letters.
    Rotation,
    StartAngle,
    EndAngle,
    Radius,
    TextSize,
    // Dot matrix.
    DotPitch,
    DotDiameter,
    MatrixSize,
    // Text and bow text.
    Edge(Edge),
    Curvature,
    // Ruler.
    Position,
    Length,
    Height,
    ScaleSize,
    NumberOffset,
}

impl ControlHandle {
    /// Whether dragging this handle can change the mark's width or height.
    #[must_use]
    pub fn changes_size(self) -> bool {
        matches!(
            self,
            Self::Edge(_) | Self::Radius | Self::DotPitch | Self::MatrixSize | Self::Length | Self::Height
        )
    }

    /// Whether dragging this handle translates the whole mark.
    #[must_use]
    pub fn moves_mark(self) -> bool {
        matches!(self, Self::Position)
    }
}

/// Which part of a mark was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Control(ControlHandle),
    Resize,
    Body,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub mark_id: MarkId,
    pub part: HitPart,
}

/// Handle sizes converted to world units at the current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Radius of a special control's circular hit region.
    pub radius: f64,
    /// Half the side of the generic resize square.
    pub resize_half: f64,
    /// Distance from a rim to handles drawn outside the mark (arc rotation).
    pub rotate_offset: f64,
}

impl HandleMetrics {
    /// Scale the configured pixel sizes so they keep a constant on-screen size.
    #[must_use]
    pub fn new(handles: &HandleConfig, viewport: &Viewport) -> Self {
        Self {
            radius: viewport.screen_dist_to_world(handles.radius_px),
            resize_half: viewport.screen_dist_to_world(handles.resize_px) * 0.5,
            rotate_offset: viewport.screen_dist_to_world(handles.rotate_offset_px),
        }
    }
}

/// Test a single mark. Controls beat the resize square, which beats the body.
///
/// Size-changing controls are not offered on marks that cannot resize.
#[must_use]
pub fn probe(mark: &Mark, world_pt: Point, metrics: &HandleMetrics) -> Option<HitPart> {
    if let Some((handle, _)) = mark
        .controls(metrics)
        .into_iter()
        .filter(|(handle, _)| mark.flags.can_resize || !handle.changes_size())
        .find(|(_, anchor)| anchor.distance(world_pt) <= metrics.radius)
    {
        return Some(HitPart::Control(handle));
    }

    if mark.flags.can_resize {
        let corner = Point::new(mark.bounds.right(), mark.bounds.bottom());
        if (world_pt.x - corner.x).abs() <= metrics.resize_half && (world_pt.y - corner.y).abs() <= metrics.resize_half {
            return Some(HitPart::Resize);
        }
    }

    mark.contains(world_pt, metrics.radius).then_some(HitPart::Body)
}

/// Find the first mark in collection order with any positive hit at `world_pt`.
#[must_use]
pub fn hit_test(world_pt: Point, marks: &MarkCollection, metrics: &HandleMetrics) -> Option<Hit> {
    if !world_pt.is_finite() {
        return None;
    }
    marks
        .iter()
        .find_map(|mark| probe(mark, world_pt, metrics).map(|part| Hit { mark_id: mark.id, part }))
}
