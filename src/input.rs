//! Input model: modifier keys, mouse buttons, cursor hints, and the gesture state machine.
//!
//! `Modifiers` and `Button` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying the bound mark and whatever context
//! the drag needs to compute incremental updates.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::hit::{ControlHandle, Edge, HitPart};
use crate::mark::MarkId;
use crate::viewport::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Whether a press with this button and these modifiers starts a pan
    /// regardless of what lies under the pointer.
    #[must_use]
    pub fn triggers_pan(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Middle | Self::Secondary => true,
            Self::Primary => modifiers.ctrl || modifiers.shift,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, zooms out).
    pub dy: f64,
}

/// Cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    ResizeNwse,
    ResizeNesw,
    ResizeNs,
    ResizeEw,
    Rotate,
    Crosshair,
}

impl CursorHint {
    /// CSS cursor name.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::ResizeNwse => "nwse-resize",
            Self::ResizeNesw => "nesw-resize",
            Self::ResizeNs => "ns-resize",
            Self::ResizeEw => "ew-resize",
            Self::Rotate => "alias",
            Self::Crosshair => "crosshair",
        }
    }

    /// Cursor shown while hovering or dragging a given hit part.
    #[must_use]
    pub fn for_part(part: HitPart) -> Self {
        match part {
            HitPart::Body => Self::Move,
            HitPart::Resize => Self::ResizeNwse,
            HitPart::Control(handle) => Self::for_handle(handle),
        }
    }

    fn for_handle(handle: ControlHandle) -> Self {
        match handle {
            ControlHandle::Edge(Edge::Top | Edge::Bottom) | ControlHandle::Height => Self::ResizeNs,
            ControlHandle::Edge(Edge::Left | Edge::Right) | ControlHandle::Length => Self::ResizeEw,
            ControlHandle::Edge(Edge::CornerTopLeft | Edge::CornerBottomRight) => Self::ResizeNwse,
            ControlHandle::Edge(Edge::CornerTopRight | Edge::CornerBottomLeft) => Self::ResizeNesw,
            ControlHandle::Rotation | ControlHandle::StartAngle | ControlHandle::EndAngle => Self::Rotate,
            ControlHandle::Position => Self::Move,
            _ => Self::Crosshair,
        }
    }
}

/// State visible to the surrounding UI.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected mark, if any.
    pub selected_id: Option<MarkId>,
    /// Cursor hint for the current hover or gesture.
    pub cursor: CursorHint,
    /// Last pointer position in screen pixels.
    pub last_pointer: Option<Point>,
    /// The whole collection is highlighted pending a scheduled clear.
    pub clear_pending: bool,
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to apply
/// incremental updates until pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// The user is dragging one of a mark's special control handles.
    SpecialControlDrag {
        /// Mark that owns the handle.
        id: MarkId,
        /// Which handle is being dragged.
        handle: ControlHandle,
        /// World point the last step was measured from.
        anchor: Point,
        /// Travel not yet consumed by dead-zone controls.
        accum: Point,
    },
    /// The user is resizing a mark by its bottom-right corner.
    ResizeDrag {
        /// Mark being resized.
        id: MarkId,
    },
    /// The user is moving a mark across the canvas.
    MoveDrag {
        /// Mark being moved.
        id: MarkId,
        /// World-space pointer position at the previous event.
        anchor: Point,
    },
}

impl InputState {
    /// Mark bound to the current gesture, if any.
    #[must_use]
    pub fn bound_mark(&self) -> Option<MarkId> {
        match self {
            Self::SpecialControlDrag { id, .. } | Self::ResizeDrag { id } | Self::MoveDrag { id, .. } => Some(*id),
            Self::Idle | Self::Panning { .. } => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
