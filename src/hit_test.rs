use super::*;
use crate::config::EngineConfig;
use crate::mark::MarkKind;
use crate::variants::{ArcLetters, AvoidPoint, LineMark, RectangleMark, Ruler, TextMark};

fn metrics() -> HandleMetrics {
    HandleMetrics { radius: 8.0, resize_half: 5.0, rotate_offset: 24.0 }
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Mark {
    Mark::new(MarkKind::Rectangle(RectangleMark::default()), Bounds::new(x, y, w, h))
}

fn collection(marks: Vec<Mark>) -> MarkCollection {
    let mut c = MarkCollection::new();
    for m in marks {
        c.push(m);
    }
    c
}

// =============================================================
// Edge / ControlHandle
// =============================================================

#[test]
fn edge_anchor_positions() {
    let b = Bounds::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(Edge::Top.anchor(&b), Point::new(50.0, 0.0));
    assert_eq!(Edge::Left.anchor(&b), Point::new(0.0, 25.0));
    assert_eq!(Edge::CornerBottomRight.anchor(&b), Point::new(100.0, 50.0));
}

#[test]
fn corner_edges_move_two_sides() {
    assert!(Edge::CornerTopLeft.moves_left() && Edge::CornerTopLeft.moves_top());
    assert!(!Edge::CornerTopLeft.moves_right());
    assert!(Edge::Bottom.moves_bottom() && !Edge::Bottom.moves_left());
}

#[test]
fn size_changing_handles() {
    assert!(ControlHandle::Edge(Edge::Top).changes_size());
    assert!(ControlHandle::Radius.changes_size());
    assert!(ControlHandle::MatrixSize.changes_size());
    assert!(!ControlHandle::Rotation.changes_size());
    assert!(!ControlHandle::DotDiameter.changes_size());
    assert!(ControlHandle::Position.moves_mark());
    assert!(!ControlHandle::Length.moves_mark());
}

// =============================================================
// HandleMetrics
// =============================================================

#[test]
fn metrics_shrink_in_world_units_when_zoomed_in() {
    let config = EngineConfig::default();
    let mut vp = crate::viewport::Viewport::new(&config);
    vp.set_size(800.0, 600.0);
    let base = HandleMetrics::new(&config.handles, &vp);
    assert!((base.radius - 8.0).abs() < 1e-9);
    assert!((base.resize_half - 5.0).abs() < 1e-9);

    vp.zoom_at(Point::new(0.0, 0.0), 2.0);
    let zoomed = HandleMetrics::new(&config.handles, &vp);
    assert!((zoomed.radius - 4.0).abs() < 1e-9);
}

// =============================================================
// probe
// =============================================================

#[test]
fn probe_body_inside_bounds() {
    let m = rect(0.0, 0.0, 100.0, 100.0);
    assert_eq!(probe(&m, Point::new(50.0, 50.0), &metrics()), Some(HitPart::Body));
}

#[test]
fn probe_resize_square_at_bottom_right() {
    let m = rect(0.0, 0.0, 100.0, 100.0);
    assert_eq!(probe(&m, Point::new(104.0, 96.0), &metrics()), Some(HitPart::Resize));
}

#[test]
fn probe_never_reports_resize_when_not_resizable() {
    let mut m = rect(0.0, 0.0, 100.0, 100.0);
    m.flags.can_resize = false;
    assert_eq!(probe(&m, Point::new(104.0, 104.0), &metrics()), None);
    assert_eq!(probe(&m, Point::new(99.0, 99.0), &metrics()), Some(HitPart::Body));
}

#[test]
fn size_controls_are_skipped_when_not_resizable() {
    let mut m = Mark::new(MarkKind::Text(TextMark::new("T")), Bounds::new(0.0, 0.0, 100.0, 40.0));
    m.flags.can_resize = false;
    assert_eq!(probe(&m, Point::new(100.0, 40.0), &metrics()), Some(HitPart::Body));
    assert_eq!(probe(&m, Point::new(50.0, 0.0), &metrics()), Some(HitPart::Body));
}

#[test]
fn non_size_controls_survive_when_not_resizable() {
    let mut m = Mark::new(MarkKind::ArcLetters(ArcLetters::new("ARC", 50.0)), Bounds::new(0.0, 0.0, 100.0, 100.0));
    m.flags.can_resize = false;
    let controls = m.controls(&metrics());
    let (_, rotation) = controls.iter().find(|(h, _)| *h == ControlHandle::Rotation).copied().unwrap();
    let (_, radius) = controls.iter().find(|(h, _)| *h == ControlHandle::Radius).copied().unwrap();

    assert_eq!(probe(&m, rotation, &metrics()), Some(HitPart::Control(ControlHandle::Rotation)));
    assert_ne!(probe(&m, radius, &metrics()), Some(HitPart::Control(ControlHandle::Radius)));
}

#[test]
fn probe_miss() {
    let m = rect(0.0, 0.0, 100.0, 100.0);
    assert_eq!(probe(&m, Point::new(300.0, 300.0), &metrics()), None);
}

#[test]
fn probe_controls_beat_resize_square() {
    // Text's bottom-right corner handle sits where the generic square would.
    let m = Mark::new(MarkKind::Text(TextMark::new("T")), Bounds::new(0.0, 0.0, 100.0, 40.0));
    assert_eq!(
        probe(&m, Point::new(100.0, 40.0), &metrics()),
        Some(HitPart::Control(ControlHandle::Edge(Edge::CornerBottomRight)))
    );
}

#[test]
fn probe_arc_rotation_handle_outside_bounds() {
    let m = Mark::new(MarkKind::ArcLetters(ArcLetters::new("ARC", 50.0)), Bounds::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(probe(&m, Point::new(52.0, -22.0), &metrics()), Some(HitPart::Control(ControlHandle::Rotation)));
}

#[test]
fn probe_ruler_position_handle() {
    let m = Mark::new(MarkKind::Ruler(Ruler::default()), Bounds::new(0.0, 0.0, 200.0, 40.0));
    assert_eq!(probe(&m, Point::new(3.0, 3.0), &metrics()), Some(HitPart::Control(ControlHandle::Position)));
}

#[test]
fn probe_line_uses_segment_containment() {
    let m = Mark::new(MarkKind::Line(LineMark::default()), Bounds::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(probe(&m, Point::new(40.0, 42.0), &metrics()), Some(HitPart::Body));
    assert_eq!(probe(&m, Point::new(80.0, 20.0), &metrics()), None);
}

#[test]
fn probe_avoid_point_has_no_resize_square() {
    let m = Mark::new(MarkKind::AvoidPoint(AvoidPoint::default()), Bounds::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(probe(&m, Point::new(5.0, 5.0), &metrics()), Some(HitPart::Body));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn first_inserted_mark_wins_on_overlap() {
    let first = rect(0.0, 0.0, 100.0, 100.0);
    let second = rect(50.0, 50.0, 100.0, 100.0);
    let first_id = first.id;
    let marks = collection(vec![first, second]);
    let hit = hit_test(Point::new(75.0, 75.0), &marks, &metrics()).unwrap();
    assert_eq!(hit.mark_id, first_id);
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn scan_continues_past_misses() {
    let first = rect(0.0, 0.0, 10.0, 10.0);
    let second = rect(200.0, 200.0, 50.0, 50.0);
    let second_id = second.id;
    let marks = collection(vec![first, second]);
    let hit = hit_test(Point::new(220.0, 220.0), &marks, &metrics()).unwrap();
    assert_eq!(hit.mark_id, second_id);
}

#[test]
fn earlier_body_beats_later_control() {
    let body = rect(0.0, 0.0, 300.0, 300.0);
    let ruler = Mark::new(MarkKind::Ruler(Ruler::default()), Bounds::new(100.0, 100.0, 100.0, 40.0));
    let body_id = body.id;
    let marks = collection(vec![body, ruler]);
    let hit = hit_test(Point::new(100.0, 100.0), &marks, &metrics()).unwrap();
    assert_eq!(hit.mark_id, body_id);
}

#[test]
fn empty_collection_and_nan_miss() {
    let marks = collection(vec![rect(0.0, 0.0, 10.0, 10.0)]);
    assert!(hit_test(Point::new(f64::NAN, 1.0), &marks, &metrics()).is_none());
    assert!(hit_test(Point::new(5.0, 5.0), &MarkCollection::new(), &metrics()).is_none());
}
