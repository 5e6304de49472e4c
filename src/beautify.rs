//! Curve beautifier: fan out connectors that would otherwise overlap.
//!
//! Connectors are ranked by the squared vertical distance between the two
//! shapes they join, and bends are handed out in that order:
//! `bend = scale * index / count`. Connectors between shapes at a similar
//! height therefore stay the flattest. Both ends are re-anchored to the
//! middle of their shape so the fan radiates from a common point.

#[cfg(test)]
#[path = "beautify_test.rs"]
mod beautify_test;

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::consts::MIDPOINT_ANCHOR;
use crate::doc::{Entity, EntityId, PartialEntity, attached_endpoint};
use crate::geom::Point;
use crate::scene::{EntityPatch, SceneAccessor};

/// Squared vertical displacement between two positions; `0.0` if either is
/// unknown or the result is not finite.
#[must_use]
pub fn vertical_spread(a: Option<Point>, b: Option<Point>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    let dis = (a.y - b.y).powi(2);
    if dis.is_finite() { dis } else { 0.0 }
}

/// Compute bend and anchor patches for a set of connectors.
///
/// Only connectors bound at both ends take part. `positions` maps entity ids
/// to their current document positions. Fewer than two qualifying connectors
/// produce no patches.
#[must_use]
pub fn beautify(connectors: &[Entity], positions: &HashMap<EntityId, Point>, bend_scale: f64) -> Vec<EntityPatch> {
    let mut ranked: Vec<(&Entity, EntityId, EntityId, f64)> = connectors
        .iter()
        .filter_map(|connector| {
            let (from, to) = connector.bound_endpoints()?;
            let dis = vertical_spread(positions.get(&from).copied(), positions.get(&to).copied());
            Some((connector, from, to, dis))
        })
        .collect();
    if ranked.len() < 2 {
        return Vec::new();
    }
    // Stable: equal spreads keep selection order.
    ranked.sort_by(|a, b| a.3.total_cmp(&b.3));

    #[allow(clippy::cast_precision_loss)]
    let count = ranked.len() as f64;
    let anchor = Point::new(MIDPOINT_ANCHOR, MIDPOINT_ANCHOR);
    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (connector, from, to, _))| {
            #[allow(clippy::cast_precision_loss)]
            let bend = bend_scale * index as f64 / count;
            let props = serde_json::json!({
                "bend": bend,
                "start": attached_endpoint(&from, anchor),
                "end": attached_endpoint(&to, anchor),
            });
            EntityPatch::new(connector.id.clone(), PartialEntity { props: Some(props), ..Default::default() })
        })
        .collect()
}

/// Beautify the connectors in the host's current selection as one batch.
/// Returns how many connectors were updated.
pub fn beautify_selection(host: &mut impl SceneAccessor, bend_scale: f64) -> usize {
    let entities = host.list_entities();
    let selection = host.selection();
    let connectors: Vec<Entity> = selection
        .iter()
        .filter_map(|id| entities.iter().find(|e| &e.id == id))
        .filter(|e| e.kind.is_connector())
        .cloned()
        .collect();
    let positions: HashMap<EntityId, Point> = entities.iter().map(|e| (e.id.clone(), e.position())).collect();

    let patches = beautify(&connectors, &positions, bend_scale);
    if patches.is_empty() {
        debug!(selected = selection.len(), "beautify skipped: fewer than two bound connectors");
        return 0;
    }
    let count = patches.len();
    match host.update_entities(patches) {
        Ok(()) => {
            info!(count, "connector curves beautified");
            count
        }
        Err(e) => {
            warn!(error = %e, "beautify batch rejected");
            0
        }
    }
}
