//! End-to-end gestures through the public engine API.
#![allow(clippy::float_cmp)]

use markcanvas::config::EngineConfig;
use markcanvas::engine::{Action, Engine, Notice};
use markcanvas::input::{Button, CursorHint, Modifiers, WheelDelta};
use markcanvas::mark::{Bounds, Mark, MarkKind};
use markcanvas::mirror::MirrorDirection;
use markcanvas::variants::{ArcLetters, Barcode, Symbology, TextMark};
use markcanvas::viewport::Point;

const EPSILON: f64 = 1e-9;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
}

fn engine() -> Engine {
    init_tracing();
    let mut e = Engine::new(EngineConfig::default());
    e.set_viewport(800.0, 600.0);
    e
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn gesture(e: &mut Engine, from: Point, to: Point) {
    e.on_pointer_down(from, Button::Primary, Modifiers::default());
    e.on_pointer_move(to, Modifiers::default());
    e.on_pointer_up(to, Button::Primary, Modifiers::default());
}

#[test]
fn wheel_zoom_keeps_point_under_cursor() {
    let mut e = engine();
    let before = e.viewport().screen_to_world(pt(100.0, 100.0));
    e.on_wheel(pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 });
    let after = e.viewport().screen_to_world(pt(100.0, 100.0));
    assert!((e.viewport().zoom() - 1.2).abs() < EPSILON);
    assert!((before.x - after.x).abs() < EPSILON && (before.y - after.y).abs() < EPSILON);
}

#[test]
fn text_mark_move_drag() {
    let mut e = engine();
    let mark = Mark::new(MarkKind::Text(TextMark::new("SERIAL")), Bounds::new(100.0, 100.0, 140.0, 40.0));
    let id = mark.id;
    e.add_mark(mark);

    gesture(&mut e, pt(150.0, 115.0), pt(180.0, 105.0));

    let b = e.mark(&id).map(|m| m.bounds).unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (130.0, 90.0, 140.0, 40.0));
    assert_eq!(e.cursor(), CursorHint::Default);
}

#[test]
fn size_locked_mark_resists_resize() {
    let mut e = engine();
    let mut mark = Mark::new(MarkKind::Barcode(Barcode::new("0042", Symbology::Code128)), Bounds::new(100.0, 100.0, 50.0, 50.0));
    mark.flags.lock_size = true;
    let id = mark.id;
    e.add_mark(mark);

    let actions = e.on_pointer_down(pt(150.0, 150.0), Button::Primary, Modifiers::default());
    assert!(actions.contains(&Action::Notice(Notice::ResizeLocked(id))));
    e.on_pointer_move(pt(700.0, 500.0), Modifiers::default());
    e.on_pointer_up(pt(700.0, 500.0), Button::Primary, Modifiers::default());

    assert_eq!(e.mark(&id).map(|m| m.bounds.width), Some(50.0));
}

#[test]
fn overlapping_marks_select_the_earliest() {
    let mut e = engine();
    let first = Mark::new(MarkKind::Text(TextMark::new("A")), Bounds::new(100.0, 100.0, 200.0, 100.0));
    let second = Mark::new(MarkKind::Text(TextMark::new("B")), Bounds::new(150.0, 120.0, 200.0, 100.0));
    let first_id = first.id;
    e.add_mark(first);
    e.add_mark(second);

    e.on_pointer_down(pt(220.0, 160.0), Button::Primary, Modifiers::default());
    assert_eq!(e.selection(), Some(first_id));
}

#[test]
fn edit_mirror_undo_redo_session() {
    let mut e = engine();
    let arc = Mark::new(MarkKind::ArcLetters(ArcLetters::new("BATCH", 60.0)), Bounds::new(200.0, 200.0, 120.0, 120.0));
    let id = arc.id;
    e.add_mark(arc);
    let added = e.snapshot();

    e.mirror_selected(Some(MirrorDirection::Horizontal));
    let mirrored = e.snapshot();
    assert_ne!(mirrored, added);

    e.undo();
    assert_eq!(e.snapshot(), added);
    e.redo();
    assert_eq!(e.snapshot(), mirrored);

    let Some(MarkKind::ArcLetters(letters)) = e.mark(&id).map(|m| &m.kind) else {
        panic!("arc letters missing after redo");
    };
    assert_eq!(letters.text, "HCTAB");
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut e = engine();
    e.add_mark(Mark::new(MarkKind::Text(TextMark::new("LOT")), Bounds::new(0.0, 0.0, 60.0, 20.0)));
    e.add_mark(Mark::new(MarkKind::Barcode(Barcode::new("12", Symbology::QrCode)), Bounds::new(80.0, 0.0, 40.0, 40.0)));

    let json = serde_json::to_string(&e.snapshot()).unwrap();
    let restored: markcanvas::history::Snapshot = serde_json::from_str(&json).unwrap();

    let mut other = engine();
    other.load_marks(restored.marks().to_vec());
    assert_eq!(other.snapshot(), e.snapshot());
}

#[test]
fn config_from_json_drives_engine() {
    init_tracing();
    let config = EngineConfig::from_json(r#"{"zoom": {"wheel_max": 1.1}, "history": {"capacity": 2}}"#).unwrap();
    config.validate().unwrap();
    let mut e = Engine::new(config);
    e.set_viewport(800.0, 600.0);

    e.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 });
    assert!((e.viewport().zoom() - 1.1).abs() < EPSILON);

    for x in [0.0, 50.0, 100.0] {
        e.add_mark(Mark::new(MarkKind::Text(TextMark::new("X")), Bounds::new(x, 0.0, 30.0, 30.0)));
    }
    assert_eq!(e.history().undo_len(), 2);
}
