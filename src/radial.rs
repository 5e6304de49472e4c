//! Radial controller: joystick rotation of a pivot's neighbors.
//!
//! DESIGN
//! ======
//! While the stick is released, every poll tick rescans the scene for the
//! shapes connected to the single selected node (the pivot) and caches them
//! with their positions and their angle from the pivot. When a gesture starts
//! that cache is frozen into a [`RadialSession`], and every sample rotates the
//! frozen positions around the pivot by the negated stick angle. Rotation is
//! always applied to the snapshot, never to the previous result, so returning
//! the stick to an earlier angle returns the shapes to where they were.
//!
//! The idle rescan is suppressed while a gesture is in progress; otherwise it
//! would re-snapshot positions the gesture itself just wrote.

#[cfg(test)]
#[path = "radial_test.rs"]
mod radial_test;

use tracing::{debug, warn};

use crate::doc::{Entity, EntityId, PartialEntity};
use crate::geom::{Point, calculate_degree, direction_degree, rotate_point};
use crate::graph::build_graph;
use crate::input::{GestureStatus, InputSample};
use crate::scene::{EntityPatch, SceneAccessor, single_selected_node};

/// A shape connected to the pivot, as seen at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedEntity {
    pub id: EntityId,
    pub position: Point,
    /// Compass angle from the pivot to this shape, for display.
    pub deg_from_center: f64,
}

/// The shapes connected to one pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedSet {
    pub pivot: EntityId,
    pub entities: Vec<RelatedEntity>,
}

/// State held for the lifetime of one gesture once a pivot is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialSession {
    pub pivot: EntityId,
    /// Positions frozen when the session was bound.
    pub related: Vec<RelatedEntity>,
    /// Stick angle of the most recent applied sample.
    pub last_angle: Option<f64>,
}

/// Gesture state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RadialState {
    /// Stick released; the idle scan runs.
    #[default]
    Idle,
    /// Stick held. `session` is bound once a single node is selected.
    Moving { session: Option<RadialSession> },
}

/// Scan `entities` for shapes connected to `pivot` in either direction.
///
/// Each related shape appears once even when several connectors join it to
/// the pivot.
#[must_use]
pub fn related_set(entities: &[Entity], pivot: &Entity) -> RelatedSet {
    let graph = build_graph(entities);
    let related = graph
        .neighbors(&pivot.id)
        .into_iter()
        .filter_map(|id| entities.iter().find(|e| e.id == id))
        .filter_map(|entity| {
            let deg_from_center = calculate_degree(pivot.x, pivot.y, entity.x, entity.y)?;
            Some(RelatedEntity { id: entity.id.clone(), position: entity.position(), deg_from_center })
        })
        .collect();
    RelatedSet { pivot: pivot.id.clone(), entities: related }
}

/// Position patches that rotate each related snapshot around `pivot`.
#[must_use]
pub fn rotation_patches(pivot: Point, angle_deg: f64, related: &[RelatedEntity]) -> Vec<EntityPatch> {
    related
        .iter()
        .map(|r| {
            let p = rotate_point(pivot, angle_deg, r.position);
            EntityPatch::new(r.id.clone(), PartialEntity::position(p.x, p.y))
        })
        .collect()
}

/// Drives rotation from joystick samples and keeps the idle related-set cache.
#[derive(Debug, Default)]
pub struct RadialController {
    state: RadialState,
    related: Option<RelatedSet>,
}

impl RadialController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &RadialState {
        &self.state
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, RadialState::Idle)
    }

    /// The related set from the most recent idle scan.
    #[must_use]
    pub fn related(&self) -> Option<&RelatedSet> {
        self.related.as_ref()
    }

    /// Idle scan, run once per poll tick. Does nothing mid-gesture.
    pub fn refresh_related(&mut self, host: &impl SceneAccessor) {
        if !self.is_idle() {
            return;
        }
        self.related = single_selected_node(host).map(|pivot| related_set(&host.list_entities(), &pivot));
    }

    /// Drop any in-flight gesture without moving anything.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("radial gesture cancelled");
        }
        self.state = RadialState::Idle;
    }

    /// Handle one joystick sample. Returns how many shapes were repositioned.
    ///
    /// `start` binds the session without writing; only `move` rotates.
    pub fn on_sample(&mut self, host: &mut impl SceneAccessor, sample: InputSample) -> usize {
        if sample.status == GestureStatus::Stop {
            self.cancel();
            return 0;
        }
        if self.is_idle() {
            self.state = RadialState::Moving { session: None };
        }

        let Some(pivot) = single_selected_node(host) else {
            return 0;
        };
        let Some(session) = self.bind_session(&*host, &pivot) else {
            return 0;
        };
        if sample.status == GestureStatus::Start {
            return 0;
        }
        let Some(angle) = sample.offset().and_then(|(x, y)| direction_degree(x, y)) else {
            debug!(?sample, "joystick sample without a usable direction skipped");
            return 0;
        };

        let live: Vec<RelatedEntity> = session
            .related
            .iter()
            .filter(|r| host.entity(&r.id).is_some())
            .cloned()
            .collect();
        let patches = rotation_patches(pivot.position(), -angle, &live);
        let moved = patches.len();
        if moved == 0 {
            session.last_angle = Some(angle);
            return 0;
        }
        match host.update_entities(patches) {
            Ok(()) => {
                session.last_angle = Some(angle);
                moved
            }
            Err(e) => {
                warn!(error = %e, pivot = %pivot.id, "radial rotation batch rejected");
                0
            }
        }
    }

    /// The session for `pivot`, frozen from the idle cache or a fresh scan.
    /// A changed pivot rebinds.
    fn bind_session(&mut self, host: &impl SceneAccessor, pivot: &Entity) -> Option<&mut RadialSession> {
        let cached = self.related.as_ref().filter(|set| set.pivot == pivot.id);
        let RadialState::Moving { session } = &mut self.state else {
            return None;
        };
        if session.as_ref().is_none_or(|s| s.pivot != pivot.id) {
            let related = match cached {
                Some(set) => set.entities.clone(),
                None => related_set(&host.list_entities(), pivot).entities,
            };
            debug!(pivot = %pivot.id, related = related.len(), "radial session bound");
            *session = Some(RadialSession { pivot: pivot.id.clone(), related, last_angle: None });
        }
        session.as_mut()
    }
}
