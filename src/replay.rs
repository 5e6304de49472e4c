//! Scripted replay: a scene document plus a command script, run through the
//! poll loop against an in-memory host.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::doc::{DocStore, Entity, EntityId};
use crate::engine::EngineCore;
use crate::scene::SceneAccessor;
use crate::scheduler::{Command, LoopStats, run_poll_loop};

/// Input document for a replay run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayScene {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub selection: Vec<EntityId>,
    #[serde(default)]
    pub rendered_paths: HashMap<EntityId, String>,
    #[serde(default)]
    pub script: Vec<Command>,
}

/// Scene state after a replay run.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub entities: Vec<Entity>,
    pub selection: Vec<EntityId>,
    pub rendered_paths: BTreeMap<EntityId, String>,
    pub stats: LoopStats,
}

impl ReplayScene {
    /// Build the in-memory host. Paths for unknown entities are dropped.
    #[must_use]
    pub fn to_store(&self) -> DocStore {
        let mut store = DocStore::new();
        store.load_snapshot(self.entities.clone());
        for (id, path) in &self.rendered_paths {
            if !store.set_path(id, path.clone()) {
                warn!(%id, "rendered path for unknown entity dropped");
            }
        }
        store.select(self.selection.clone());
        store
    }
}

/// Load `scene`, queue its script, let the poll loop run for `duration`, then
/// shut it down and report the final scene.
pub async fn replay(core: &mut EngineCore, scene: ReplayScene, duration: Duration) -> ReplayOutcome {
    let mut store = scene.to_store();
    let (tx, rx) = mpsc::channel(scene.script.len() + 1);

    let driver = async move {
        for command in scene.script {
            if tx.send(command).await.is_err() {
                return;
            }
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => {
                if tx.send(Command::Shutdown).await.is_err() {
                    debug!("poll loop stopped before shutdown was sent");
                }
            }
            // Scripted shutdown already stopped the loop.
            () = tx.closed() => {}
        }
    };
    let (stats, ()) = tokio::join!(run_poll_loop(core, &mut store, rx), driver);

    let rendered_paths = store
        .iter()
        .filter_map(|e| Some((e.id.clone(), store.path(&e.id)?.to_owned())))
        .collect();
    ReplayOutcome {
        entities: store.list_entities(),
        selection: store.selection(),
        rendered_paths,
        stats,
    }
}
