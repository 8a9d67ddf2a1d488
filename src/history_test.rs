use super::*;
use crate::mark::{Bounds, MarkKind};
use crate::variants::{RectangleMark, TextMark};

fn rect(x: f64) -> Mark {
    Mark::new(MarkKind::Rectangle(RectangleMark::default()), Bounds::new(x, 0.0, 10.0, 10.0))
}

fn collection_of(n: usize) -> MarkCollection {
    let mut c = MarkCollection::new();
    for i in 0..n {
        c.push(rect(f64::from(u32::try_from(i).unwrap())));
    }
    c
}

// --- Snapshot ---

#[test]
fn snapshot_is_a_deep_copy() {
    let mut c = MarkCollection::new();
    c.push(Mark::new(MarkKind::Text(TextMark::new("BEFORE")), Bounds::new(0.0, 0.0, 10.0, 10.0)));
    let snap = Snapshot::capture(&c);

    if let Some(MarkKind::Text(t)) = c.iter_mut().next().map(|m| &mut m.kind) {
        t.text = "AFTER".to_owned();
    }
    let MarkKind::Text(saved) = &snap.marks()[0].kind else { panic!("variant changed") };
    assert_eq!(saved.text, "BEFORE");
}

#[test]
fn snapshot_drops_gesture_flags() {
    let mut c = collection_of(1);
    c.iter_mut().for_each(|m| m.gesture.dragging = true);
    let snap = Snapshot::capture(&c);
    assert!(!snap.marks()[0].gesture.dragging);
    assert_eq!(snap.len(), 1);
}

#[test]
fn snapshot_serializes() {
    let snap = Snapshot::capture(&collection_of(2));
    let json = serde_json::to_string(&snap).unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}

// --- History ---

#[test]
fn undo_restores_previous_collection() {
    let mut h = History::new(20);
    let mut c = collection_of(1);
    let before = c.clone();

    h.record_before_mutation(&c);
    c.push(rect(50.0));

    assert!(h.undo(&mut c));
    assert_eq!(c, before);
    assert!(h.can_redo());
}

#[test]
fn redo_reapplies_undone_change() {
    let mut h = History::new(20);
    let mut c = collection_of(1);
    h.record_before_mutation(&c);
    c.push(rect(50.0));
    let after = c.clone();

    h.undo(&mut c);
    assert!(h.redo(&mut c));
    assert_eq!(c, after);
    assert!(h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn new_mutation_clears_redo() {
    let mut h = History::new(20);
    let mut c = collection_of(1);
    h.record_before_mutation(&c);
    c.push(rect(50.0));
    h.undo(&mut c);
    assert_eq!(h.redo_len(), 1);

    h.record_before_mutation(&c);
    assert_eq!(h.redo_len(), 0);
    assert!(!h.redo(&mut c));
}

#[test]
fn capacity_evicts_oldest() {
    let mut h = History::new(3);
    let mut c = MarkCollection::new();
    for i in 0..5 {
        h.record_before_mutation(&c);
        c.push(rect(f64::from(i)));
    }
    assert_eq!(h.undo_len(), 3);

    let mut undone = 0;
    while h.undo(&mut c) {
        undone += 1;
    }
    assert_eq!(undone, 3);
    // The two oldest snapshots (0 and 1 marks) were evicted.
    assert_eq!(c.len(), 2);
}

#[test]
fn undo_on_empty_history_is_false() {
    let mut h = History::new(5);
    let mut c = collection_of(2);
    assert!(!h.undo(&mut c));
    assert_eq!(c.len(), 2);
}

#[test]
fn zero_capacity_is_clamped() {
    assert_eq!(History::new(0).capacity(), 1);
}

#[test]
fn clear_drops_both_stacks() {
    let mut h = History::new(5);
    let mut c = collection_of(1);
    h.record_before_mutation(&c);
    c.push(rect(9.0));
    h.undo(&mut c);
    h.record_before_mutation(&c);
    h.clear();
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}
