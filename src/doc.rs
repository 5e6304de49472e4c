//! Document model: scene entities, their properties, and the in-memory store.
//!
//! This module defines the data types that describe what is on the canvas
//! (`Entity`, `EntityKind`), a sparse-update type for incremental edits
//! (`PartialEntity`), a typed accessor for the open-ended `props` JSON bag
//! (`Props`), and `DocStore`, an in-memory host that owns entities, the
//! current selection, and the rendered connector paths.
//!
//! Connector endpoints are kept in `props.start` / `props.end`. An endpoint is
//! either attached to another entity (`{"type":"attached","id":..,"anchor":..}`)
//! or free-floating (`{"type":"free","x":..,"y":..}`). Anything else reads as
//! unbound.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;

/// Stable, unique identifier for a scene entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh `shape:<uuid>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("shape:{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// The kind of a scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Sticky note.
    Note,
    /// Axis-aligned rectangle.
    Rect,
    /// Ellipse inscribed within the bounding box.
    Ellipse,
    /// Diamond with vertices at bounding-box edge midpoints.
    Diamond,
    /// Five-point star inscribed within the bounding box.
    Star,
    /// Free text block.
    Text,
    /// Frame grouping other shapes.
    Frame,
    /// Raster image.
    Image,
    /// Straight or bent line between two endpoints stored in `props`.
    Line,
    /// Directed arrow between two endpoints stored in `props`.
    Arrow,
}

impl EntityKind {
    /// Whether this kind is a connector (line, arrow).
    #[must_use]
    pub fn is_connector(self) -> bool {
        matches!(self, Self::Line | Self::Arrow)
    }

    /// Whether this kind is a node that connectors can bind to.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_connector()
    }
}

/// An entity as held by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity. Minted when a document omits it.
    #[serde(default = "EntityId::generate")]
    pub id: EntityId,
    /// Shape or connector type.
    pub kind: EntityKind,
    /// Document-space x of the entity's origin.
    pub x: f64,
    /// Document-space y of the entity's origin.
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z_index: i64,
    /// Open-ended per-kind properties (text, endpoints, bend, etc.).
    #[serde(default = "empty_props")]
    pub props: serde_json::Value,
    /// Monotonically increasing edit counter.
    #[serde(default)]
    pub version: i64,
}

fn empty_props() -> serde_json::Value {
    serde_json::json!({})
}

impl Entity {
    /// Document-space position of the entity.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Typed view over `props`.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.props)
    }

    /// Both bound endpoint ids of a connector, in `(from, to)` order.
    ///
    /// `None` for node-like entities and for connectors with a free end.
    #[must_use]
    pub fn bound_endpoints(&self) -> Option<(EntityId, EntityId)> {
        if !self.kind.is_connector() {
            return None;
        }
        let props = self.props();
        match (props.start(), props.end()) {
            (Binding::Bound { id: from, .. }, Binding::Bound { id: to, .. }) => Some((from, to)),
            _ => None,
        }
    }
}

/// Sparse update for an entity. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Props keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl PartialEntity {
    /// A position-only update.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Whether the props part, if any, can be merged into an object.
    #[must_use]
    pub fn props_mergeable(&self) -> bool {
        self.props.as_ref().is_none_or(serde_json::Value::is_object)
    }
}

/// One end of a connector.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Attached to another entity at a normalized anchor inside its bounds.
    Bound { id: EntityId, anchor: Point },
    /// Free-floating or missing.
    Unbound,
}

impl Binding {
    /// The bound entity id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Self::Bound { id, .. } => Some(id),
            Self::Unbound => None,
        }
    }
}

/// Props value for an endpoint attached to `id` at the given normalized anchor.
#[must_use]
pub fn attached_endpoint(id: &EntityId, anchor: Point) -> serde_json::Value {
    serde_json::json!({
        "type": "attached",
        "id": id,
        "anchor": { "x": anchor.x, "y": anchor.y },
    })
}

/// Typed access to common props fields from an `Entity.props` JSON value.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Connector start (`from`) endpoint.
    #[must_use]
    pub fn start(&self) -> Binding {
        self.binding("start")
    }

    /// Connector end (`to`) endpoint.
    #[must_use]
    pub fn end(&self) -> Binding {
        self.binding("end")
    }

    /// Connector curvature. Defaults to `0.0` when absent.
    #[must_use]
    pub fn bend(&self) -> f64 {
        self.value
            .get("bend")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0)
    }

    fn binding(&self, key: &str) -> Binding {
        let Some(end) = self.value.get(key) else {
            return Binding::Unbound;
        };
        if end.get("type").and_then(serde_json::Value::as_str) != Some("attached") {
            return Binding::Unbound;
        }
        let Some(id) = end.get("id").and_then(serde_json::Value::as_str) else {
            return Binding::Unbound;
        };
        if id.is_empty() {
            return Binding::Unbound;
        }
        let anchor = end.get("anchor");
        let coord = |axis: &str| {
            anchor
                .and_then(|a| a.get(axis))
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.5)
        };
        Binding::Bound { id: EntityId::new(id), anchor: Point::new(coord("x"), coord("y")) }
    }
}

/// In-memory host: entities in insertion order, the selection, and the
/// rendered connector paths.
#[derive(Debug, Default)]
pub struct DocStore {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    selection: Vec<EntityId>,
    rendered_paths: HashMap<EntityId, String>,
}

impl DocStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity. Replacing keeps its original list position.
    pub fn insert(&mut self, entity: Entity) {
        if !self.entities.contains_key(&entity.id) {
            self.order.push(entity.id.clone());
        }
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Remove an entity, dropping it from the selection and the rendered paths.
    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        self.order.retain(|other| other != id);
        self.selection.retain(|other| other != id);
        self.rendered_paths.remove(id);
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Apply a partial update to an existing entity. Returns false if the
    /// entity doesn't exist or the props patch is not an object; nothing is
    /// changed in either case.
    pub fn apply_partial(&mut self, id: &EntityId, partial: &PartialEntity) -> bool {
        if !partial.props_mergeable() {
            return false;
        }
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            entity.x = x;
        }
        if let Some(y) = partial.y {
            entity.y = y;
        }
        if let Some(w) = partial.width {
            entity.width = w;
        }
        if let Some(h) = partial.height {
            entity.height = h;
        }
        if let Some(r) = partial.rotation {
            entity.rotation = r;
        }
        if let Some(z) = partial.z_index {
            entity.z_index = z;
        }
        if let Some(v) = partial.version {
            entity.version = v;
        }
        if let Some(incoming) = partial.props.as_ref().and_then(serde_json::Value::as_object) {
            if !entity.props.is_object() {
                entity.props = empty_props();
            }
            if let Some(existing) = entity.props.as_object_mut() {
                for (k, v) in incoming {
                    if v.is_null() {
                        existing.remove(k);
                    } else {
                        existing.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        true
    }

    /// Replace all entities with a full snapshot. Clears selection and paths.
    pub fn load_snapshot(&mut self, entities: Vec<Entity>) {
        self.entities.clear();
        self.order.clear();
        self.selection.clear();
        self.rendered_paths.clear();
        for entity in entities {
            self.insert(entity);
        }
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// The current selection, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[EntityId] {
        &self.selection
    }

    /// Replace the selection. Unknown ids and duplicates are dropped.
    pub fn select(&mut self, ids: Vec<EntityId>) {
        let mut selection: Vec<EntityId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.entities.contains_key(&id) && !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.selection = selection;
    }

    /// Rendered path data of a connector, if the renderer has produced one.
    #[must_use]
    pub fn path(&self, id: &EntityId) -> Option<&str> {
        self.rendered_paths.get(id).map(String::as_str)
    }

    /// Record rendered path data for an existing entity. Returns false otherwise.
    pub fn set_path(&mut self, id: &EntityId, path: String) -> bool {
        if !self.entities.contains_key(id) {
            return false;
        }
        self.rendered_paths.insert(id.clone(), path);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
