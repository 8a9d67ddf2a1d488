use uuid::Uuid;

use super::*;

// =============================================================
// Button
// =============================================================

#[test]
fn middle_and_secondary_always_pan() {
    assert!(Button::Middle.triggers_pan(Modifiers::default()));
    assert!(Button::Secondary.triggers_pan(Modifiers::default()));
}

#[test]
fn primary_pans_only_with_ctrl_or_shift() {
    assert!(!Button::Primary.triggers_pan(Modifiers::default()));
    assert!(Button::Primary.triggers_pan(Modifiers { ctrl: true, ..Default::default() }));
    assert!(Button::Primary.triggers_pan(Modifiers { shift: true, ..Default::default() }));
    assert!(!Button::Primary.triggers_pan(Modifiers { alt: true, meta: true, ..Default::default() }));
}

// =============================================================
// CursorHint
// =============================================================

#[test]
fn cursor_css_names() {
    assert_eq!(CursorHint::Default.as_css(), "default");
    assert_eq!(CursorHint::Grabbing.as_css(), "grabbing");
    assert_eq!(CursorHint::ResizeNwse.as_css(), "nwse-resize");
}

#[test]
fn cursor_for_hit_parts() {
    assert_eq!(CursorHint::for_part(HitPart::Body), CursorHint::Move);
    assert_eq!(CursorHint::for_part(HitPart::Resize), CursorHint::ResizeNwse);
    assert_eq!(CursorHint::for_part(HitPart::Control(ControlHandle::Rotation)), CursorHint::Rotate);
    assert_eq!(CursorHint::for_part(HitPart::Control(ControlHandle::Edge(Edge::Top))), CursorHint::ResizeNs);
    assert_eq!(
        CursorHint::for_part(HitPart::Control(ControlHandle::Edge(Edge::CornerTopRight))),
        CursorHint::ResizeNesw
    );
    assert_eq!(CursorHint::for_part(HitPart::Control(ControlHandle::Length)), CursorHint::ResizeEw);
    assert_eq!(CursorHint::for_part(HitPart::Control(ControlHandle::DotPitch)), CursorHint::Crosshair);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn default_state_is_idle() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert_eq!(state.bound_mark(), None);
}

#[test]
fn panning_binds_no_mark() {
    let state = InputState::Panning { last_screen: Point::new(1.0, 2.0) };
    assert!(!state.is_idle());
    assert_eq!(state.bound_mark(), None);
}

#[test]
fn drag_states_expose_bound_mark() {
    let id = Uuid::new_v4();
    let states = [
        InputState::SpecialControlDrag {
            id,
            handle: ControlHandle::Radius,
            anchor: Point::default(),
            accum: Point::default(),
        },
        InputState::ResizeDrag { id },
        InputState::MoveDrag { id, anchor: Point::default() },
    ];
    for state in states {
        assert_eq!(state.bound_mark(), Some(id));
    }
}

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(ui.selected_id.is_none());
    assert_eq!(ui.cursor, CursorHint::Default);
    assert!(!ui.clear_pending);
}
