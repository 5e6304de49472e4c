use serde_json::json;

use super::*;
use crate::doc::{DocStore, Entity, EntityId, EntityKind};

// =============================================================
// Helpers
// =============================================================

fn cap(path: &str) -> Result<String, PathError> {
    add_cap(path, 50.0, 2.0, 1e-3)
}

fn elements(d: &str) -> Vec<PathEl> {
    parse(d).unwrap().elements().to_vec()
}

fn assert_cap(input: &str, expected: &str) {
    let out = cap(input).unwrap();
    assert_eq!(elements(&out), elements(expected), "{out}");
}

fn make_entity(raw: &str, kind: EntityKind) -> Entity {
    Entity {
        id: EntityId::from(raw),
        kind,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        rotation: 0.0,
        z_index: 0,
        props: json!({}),
        version: 1,
    }
}

fn capped_store() -> DocStore {
    let mut store = DocStore::new();
    store.load_snapshot(vec![
        make_entity("note", EntityKind::Note),
        make_entity("drawn", EntityKind::Arrow),
        make_entity("undrawn", EntityKind::Arrow),
        make_entity("broken", EntityKind::Line),
    ]);
    store.set_path(&EntityId::from("drawn"), "M 0 0 L 100 0".into());
    store.set_path(&EntityId::from("broken"), "M 0 0 X 10 10".into());
    store.set_path(&EntityId::from("note"), "M 0 0 L 100 0".into());
    store
}

// =============================================================
// add_cap
// =============================================================

#[test]
fn cap_on_straight_line() {
    assert_cap("M 0 0 L 100 0", "M 0 0 L 48 0 C 48 2 50 2 50 0 C 50 2 52 2 52 0 L 100 0");
}

#[test]
fn cap_keeps_commands_around_splice() {
    assert_cap(
        "M 0 0 L 50 0 L 50 50 L 100 50",
        "M 0 0 L 50 0 L 50 22 C 47 22 47 25 50 25 C 47 25 47 28 50 28 L 50 50 L 100 50",
    );
}

#[test]
fn cap_spanning_two_segments() {
    assert_cap(
        "M 0 0 L 100 0 L 100 100",
        "M 0 0 L 96 0 C 94 2 98 2 100 0 C 98 2 98 6 100 4 L 100 100",
    );
}

#[test]
fn cap_preserves_trailing_close() {
    assert_cap(
        "M 0 0 L 100 0 L 100 100 L 0 100 Z",
        "M 0 0 L 100 0 L 100 92 C 96 88 96 96 100 100 C 96 96 88 96 92 100 L 0 100 Z",
    );
}

#[test]
fn cap_on_hairpin_uses_tangent_normal() {
    assert_cap("M 0 0 L 100 0 Z", "M 0 0 L 96 0 C 96 4 100 4 100 0 C 100 4 96 4 96 0 Z");
}

#[test]
fn cap_normalizes_relative_input() {
    assert_eq!(cap("m 0 0 l 100 0").unwrap(), cap("M 0 0 L 100 0").unwrap());
}

#[test]
fn cap_on_quadratic_splits_curve() {
    let out = elements(&cap("M 0 0 Q 50 100 100 0").unwrap());
    assert_eq!(out.len(), 5);
    assert!(matches!(out[1], PathEl::QuadTo(_, _)));
    assert!(matches!(out[2], PathEl::CurveTo(_, _, p) if p == Point::new(50.0, 50.0)));
    assert!(matches!(out[4], PathEl::QuadTo(_, p) if p == Point::new(100.0, 0.0)));
}

#[test]
fn cap_on_arc() {
    let out = elements(&cap("M 0 0 A 50 50 0 0 1 100 0").unwrap());
    assert_eq!(out.first(), Some(&PathEl::MoveTo(Point::new(0.0, 0.0))));
    assert!(out.iter().any(|el| matches!(el, PathEl::CurveTo(_, _, p) if *p == Point::new(50.0, -50.0))));
}

#[test]
fn cap_custom_window() {
    let out = add_cap("M 0 0 L 200 0", 25.0, 5.0, 1e-3).unwrap();
    assert_eq!(elements(&out), elements("M 0 0 L 40 0 C 40 10 50 10 50 0 C 50 10 60 10 60 0 L 200 0"));
}

#[test]
fn cap_rejects_unreadable_paths() {
    assert!(matches!(cap("M 0 0 X 10 10"), Err(PathError::Syntax(_))));
    assert_eq!(cap("M 0 0 L 5 5 M 9 9 L 10 10"), Err(PathError::Discontinuous));
}

#[test]
fn cap_rejects_degenerate_paths() {
    assert_eq!(cap("M 3 3"), Err(PathError::Degenerate));
    assert_eq!(cap("M 0 0 L 0.5 0"), Err(PathError::Degenerate));
}

// =============================================================
// add_caps_selection
// =============================================================

#[test]
fn caps_only_selected_connectors_with_paths() {
    let mut store = capped_store();
    store.select(["note", "drawn", "undrawn", "broken"].into_iter().map(EntityId::from).collect());
    let count = add_caps_selection(&mut store, &EngineConfig::default());
    assert_eq!(count, 1);
    assert!(store.path(&EntityId::from("drawn")).unwrap().contains('C'));
    assert_eq!(store.path(&EntityId::from("undrawn")), None);
    assert_eq!(store.path(&EntityId::from("broken")), Some("M 0 0 X 10 10"));
    assert_eq!(store.path(&EntityId::from("note")), Some("M 0 0 L 100 0"));
}

#[test]
fn caps_leave_entity_geometry_alone() {
    let mut store = capped_store();
    store.select(vec![EntityId::from("drawn")]);
    let before = store.get(&EntityId::from("drawn")).cloned();
    add_caps_selection(&mut store, &EngineConfig::default());
    assert_eq!(store.get(&EntityId::from("drawn")).cloned(), before);
}

#[test]
fn caps_with_empty_selection_do_nothing() {
    let mut store = capped_store();
    assert_eq!(add_caps_selection(&mut store, &EngineConfig::default()), 0);
    assert_eq!(store.path(&EntityId::from("drawn")), Some("M 0 0 L 100 0"));
}
