#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn make_entity(id: &str, kind: EntityKind, z: i64) -> Entity {
    Entity {
        id: EntityId::from(id),
        kind,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 80.0,
        rotation: 0.0,
        z_index: z,
        props: json!({}),
        version: 1,
    }
}

fn make_arrow(id: &str, props: serde_json::Value) -> Entity {
    Entity { props, ..make_entity(id, EntityKind::Arrow, 0) }
}

// =============================================================
// EntityKind
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (EntityKind::Note, "\"note\""),
        (EntityKind::Rect, "\"rect\""),
        (EntityKind::Ellipse, "\"ellipse\""),
        (EntityKind::Diamond, "\"diamond\""),
        (EntityKind::Star, "\"star\""),
        (EntityKind::Text, "\"text\""),
        (EntityKind::Frame, "\"frame\""),
        (EntityKind::Image, "\"image\""),
        (EntityKind::Line, "\"line\""),
        (EntityKind::Arrow, "\"arrow\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: EntityKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<EntityKind>("\"hexagon\"").is_err());
}

#[test]
fn kind_classification() {
    assert!(EntityKind::Note.is_node());
    assert!(EntityKind::Frame.is_node());
    assert!(!EntityKind::Note.is_connector());
    assert!(EntityKind::Arrow.is_connector());
    assert!(EntityKind::Line.is_connector());
    assert!(!EntityKind::Arrow.is_node());
}

// =============================================================
// EntityId
// =============================================================

#[test]
fn entity_id_is_transparent_string() {
    let id = EntityId::from("shape:a");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"shape:a\"");
    assert_eq!(id.to_string(), "shape:a");
    assert_eq!(id.as_str(), "shape:a");
}

#[test]
fn entity_id_generate_is_unique_and_prefixed() {
    let a = EntityId::generate();
    let b = EntityId::generate();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("shape:"));
}

// =============================================================
// Entity serde
// =============================================================

#[test]
fn entity_deserialize_fills_defaults() {
    let entity: Entity = serde_json::from_value(json!({
        "id": "shape:n",
        "kind": "note",
        "x": 5.0,
        "y": 6.0,
    }))
    .unwrap();
    assert_eq!(entity.position(), Point::new(5.0, 6.0));
    assert_eq!(entity.width, 0.0);
    assert_eq!(entity.props, json!({}));
    assert_eq!(entity.version, 0);
}

// =============================================================
// Props / bindings
// =============================================================

#[test]
fn props_attached_endpoints_read_as_bound() {
    let arrow = make_arrow(
        "shape:e",
        json!({
            "start": { "type": "attached", "id": "shape:a", "anchor": { "x": 0.25, "y": 0.75 } },
            "end": { "type": "attached", "id": "shape:b" },
        }),
    );
    let props = arrow.props();
    assert_eq!(props.start(), Binding::Bound { id: EntityId::from("shape:a"), anchor: Point::new(0.25, 0.75) });
    assert_eq!(props.end(), Binding::Bound { id: EntityId::from("shape:b"), anchor: Point::new(0.5, 0.5) });
    assert_eq!(arrow.bound_endpoints(), Some((EntityId::from("shape:a"), EntityId::from("shape:b"))));
}

#[test]
fn props_free_missing_and_malformed_endpoints_read_as_unbound() {
    let arrow = make_arrow(
        "shape:e",
        json!({
            "start": { "type": "free", "x": 1.0, "y": 2.0 },
            "end": { "type": "attached", "id": 42 },
        }),
    );
    assert_eq!(arrow.props().start(), Binding::Unbound);
    assert_eq!(arrow.props().end(), Binding::Unbound);
    assert_eq!(arrow.bound_endpoints(), None);

    let bare = make_arrow("shape:f", json!({}));
    assert_eq!(bare.props().start(), Binding::Unbound);

    let empty_id = make_arrow("shape:g", json!({ "start": { "type": "attached", "id": "" } }));
    assert_eq!(empty_id.props().start(), Binding::Unbound);
}

#[test]
fn props_bend_defaults_to_zero() {
    let props = json!({});
    assert_eq!(Props::new(&props).bend(), 0.0);
    let props = json!({ "bend": 12.5 });
    assert_eq!(Props::new(&props).bend(), 12.5);
}

#[test]
fn node_has_no_bound_endpoints_even_with_endpoint_props() {
    let mut note = make_entity("shape:n", EntityKind::Note, 0);
    note.props = json!({
        "start": { "type": "attached", "id": "shape:a" },
        "end": { "type": "attached", "id": "shape:b" },
    });
    assert_eq!(note.bound_endpoints(), None);
}

#[test]
fn attached_endpoint_round_trips_through_props() {
    let value = attached_endpoint(&EntityId::from("shape:a"), Point::new(0.5, 0.5));
    let props = json!({ "start": value });
    assert_eq!(
        Props::new(&props).start(),
        Binding::Bound { id: EntityId::from("shape:a"), anchor: Point::new(0.5, 0.5) }
    );
    assert_eq!(Props::new(&props).start().id(), Some(&EntityId::from("shape:a")));
    assert_eq!(Binding::Unbound.id(), None);
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn store_preserves_insertion_order() {
    let mut store = DocStore::new();
    for id in ["shape:c", "shape:a", "shape:b"] {
        store.insert(make_entity(id, EntityKind::Note, 0));
    }
    let ids: Vec<&str> = store.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["shape:c", "shape:a", "shape:b"]);
}

#[test]
fn store_replace_keeps_position() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:a", EntityKind::Note, 0));
    store.insert(make_entity("shape:b", EntityKind::Note, 0));
    let mut replacement = make_entity("shape:a", EntityKind::Rect, 0);
    replacement.x = 9.0;
    store.insert(replacement);
    assert_eq!(store.len(), 2);
    let first = store.iter().next().unwrap();
    assert_eq!(first.kind, EntityKind::Rect);
    assert_eq!(first.x, 9.0);
}

#[test]
fn store_remove_cleans_selection_and_paths() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:a", EntityKind::Arrow, 0));
    store.insert(make_entity("shape:b", EntityKind::Note, 0));
    store.select(vec![EntityId::from("shape:a"), EntityId::from("shape:b")]);
    assert!(store.set_path(&EntityId::from("shape:a"), "M0 0 L1 1".into()));

    let removed = store.remove(&EntityId::from("shape:a"));
    assert!(removed.is_some());
    assert_eq!(store.selected_ids(), &[EntityId::from("shape:b")]);
    assert_eq!(store.path(&EntityId::from("shape:a")), None);
    assert!(store.remove(&EntityId::from("shape:a")).is_none());
}

#[test]
fn store_select_drops_unknown_and_duplicates() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:a", EntityKind::Note, 0));
    store.select(vec![EntityId::from("shape:a"), EntityId::from("shape:zz"), EntityId::from("shape:a")]);
    assert_eq!(store.selected_ids(), &[EntityId::from("shape:a")]);
}

#[test]
fn store_set_path_requires_entity() {
    let mut store = DocStore::new();
    assert!(!store.set_path(&EntityId::from("shape:a"), "M0 0".into()));
}

#[test]
fn store_load_snapshot_replaces_everything() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:old", EntityKind::Note, 0));
    store.select(vec![EntityId::from("shape:old")]);
    store.load_snapshot(vec![make_entity("shape:new", EntityKind::Note, 0)]);
    assert_eq!(store.len(), 1);
    assert!(store.get(&EntityId::from("shape:old")).is_none());
    assert!(store.selected_ids().is_empty());
    assert!(!store.is_empty());
}

// =============================================================
// apply_partial
// =============================================================

#[test]
fn apply_partial_updates_present_fields_only() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:a", EntityKind::Note, 0));
    let id = EntityId::from("shape:a");
    assert!(store.apply_partial(&id, &PartialEntity::position(10.0, 20.0)));
    let entity = store.get(&id).unwrap();
    assert_eq!(entity.position(), Point::new(10.0, 20.0));
    assert_eq!(entity.width, 100.0);
    assert_eq!(entity.version, 1);
}

#[test]
fn apply_partial_merges_and_deletes_props() {
    let mut store = DocStore::new();
    let mut entity = make_entity("shape:a", EntityKind::Arrow, 0);
    entity.props = json!({ "bend": 5.0, "text": "x" });
    store.insert(entity);
    let id = EntityId::from("shape:a");
    let partial = PartialEntity { props: Some(json!({ "bend": 50.0, "text": null })), ..Default::default() };
    assert!(store.apply_partial(&id, &partial));
    assert_eq!(store.get(&id).unwrap().props, json!({ "bend": 50.0 }));
}

#[test]
fn apply_partial_rejects_non_object_props_without_touching_entity() {
    let mut store = DocStore::new();
    store.insert(make_entity("shape:a", EntityKind::Note, 0));
    let id = EntityId::from("shape:a");
    let partial = PartialEntity { x: Some(99.0), props: Some(json!(3)), ..Default::default() };
    assert!(!store.apply_partial(&id, &partial));
    assert_eq!(store.get(&id).unwrap().x, 0.0);
}

#[test]
fn apply_partial_unknown_entity_returns_false() {
    let mut store = DocStore::new();
    assert!(!store.apply_partial(&EntityId::from("shape:nope"), &PartialEntity::position(1.0, 1.0)));
}

#[test]
fn partial_serializes_only_present_fields() {
    let json = serde_json::to_value(PartialEntity::position(1.0, 2.0)).unwrap();
    assert_eq!(json, json!({ "x": 1.0, "y": 2.0 }));
}
