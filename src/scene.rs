//! Host boundary: the read/write view the engine has over a live scene.
//!
//! The host owns entities, selection and rendering. The engine only ever
//! touches them through [`SceneAccessor`], reading a fresh snapshot at the
//! start of each operation and writing back one batch at the end.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};

use crate::doc::{DocStore, Entity, EntityId, PartialEntity};

/// Errors surfaced by a host when a write cannot be applied.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    /// A patch names an entity the host doesn't have.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// A patch carries a props value that is not a JSON object.
    #[error("props patch for {0} is not an object")]
    InvalidProps(EntityId),
}

/// One entry of a batched update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPatch {
    pub id: EntityId,
    pub fields: PartialEntity,
}

impl EntityPatch {
    #[must_use]
    pub fn new(id: EntityId, fields: PartialEntity) -> Self {
        Self { id, fields }
    }
}

/// Read/write view over the host's live entity set.
pub trait SceneAccessor {
    /// Snapshot of every entity, in the host's list order.
    fn list_entities(&self) -> Vec<Entity>;

    fn entity(&self, id: &EntityId) -> Option<Entity>;

    /// Apply a batch of patches. Either every patch applies or none does.
    ///
    /// # Errors
    ///
    /// Returns the first reason the batch was rejected; the scene is unchanged.
    fn update_entities(&mut self, patches: Vec<EntityPatch>) -> Result<(), SceneError>;

    fn selection(&self) -> Vec<EntityId>;

    fn set_selection(&mut self, ids: Vec<EntityId>);

    /// Rendered path data of a connector, when the renderer has produced one.
    fn rendered_path(&self, id: &EntityId) -> Option<String>;

    fn set_rendered_path(&mut self, id: &EntityId, path: String);
}

impl SceneAccessor for DocStore {
    fn list_entities(&self) -> Vec<Entity> {
        self.iter().cloned().collect()
    }

    fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.get(id).cloned()
    }

    fn update_entities(&mut self, patches: Vec<EntityPatch>) -> Result<(), SceneError> {
        for patch in &patches {
            if self.get(&patch.id).is_none() {
                return Err(SceneError::UnknownEntity(patch.id.clone()));
            }
            if !patch.fields.props_mergeable() {
                return Err(SceneError::InvalidProps(patch.id.clone()));
            }
        }
        for patch in &patches {
            self.apply_partial(&patch.id, &patch.fields);
        }
        Ok(())
    }

    fn selection(&self) -> Vec<EntityId> {
        self.selected_ids().to_vec()
    }

    fn set_selection(&mut self, ids: Vec<EntityId>) {
        self.select(ids);
    }

    fn rendered_path(&self, id: &EntityId) -> Option<String> {
        self.path(id).map(str::to_owned)
    }

    fn set_rendered_path(&mut self, id: &EntityId, path: String) {
        if !self.set_path(id, path) {
            tracing::debug!(%id, "rendered path for unknown entity ignored");
        }
    }
}

/// The single selected entity, if exactly one node-like entity is selected.
#[must_use]
pub fn single_selected_node(host: &impl SceneAccessor) -> Option<Entity> {
    let selection = host.selection();
    let [id] = selection.as_slice() else {
        return None;
    };
    host.entity(id).filter(|entity| entity.kind.is_node())
}
