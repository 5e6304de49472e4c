//! Binding graph: nodes are shape ids, edges are connectors bound at both ends.
//!
//! The graph is a value derived from one snapshot of the scene. It holds no
//! references into the host and is rebuilt for every query, so entities the
//! host adds, moves or deletes between ticks can never leave it stale.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use std::collections::{HashMap, HashSet};

use crate::doc::{Entity, EntityId};

/// A directed edge induced by one connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The connector entity carrying this edge.
    pub connector: EntityId,
    pub from: EntityId,
    pub to: EntityId,
}

/// Directed graph of node ids and connector edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingGraph {
    nodes: Vec<EntityId>,
    edges: Vec<Edge>,
    outgoing: HashMap<EntityId, Vec<usize>>,
}

/// Build the binding graph from a full entity snapshot.
///
/// Node-like entities become nodes. Each connector whose two endpoints are
/// bound to nodes present in `entities` becomes one `from → to` edge; all
/// other connectors are skipped. Edge order follows connector order in the
/// input.
#[must_use]
pub fn build_graph(entities: &[Entity]) -> BindingGraph {
    let nodes: Vec<EntityId> = entities
        .iter()
        .filter(|e| e.kind.is_node())
        .map(|e| e.id.clone())
        .collect();
    let present: HashSet<&EntityId> = nodes.iter().collect();

    let mut graph = BindingGraph { nodes: nodes.clone(), ..Default::default() };
    for connector in entities.iter().filter(|e| e.kind.is_connector()) {
        let Some((from, to)) = connector.bound_endpoints() else {
            continue;
        };
        if !present.contains(&from) || !present.contains(&to) {
            continue;
        }
        let index = graph.edges.len();
        graph.outgoing.entry(from.clone()).or_default().push(index);
        graph.edges.push(Edge { connector: connector.id.clone(), from, to });
    }
    graph
}

impl BindingGraph {
    /// Node ids in snapshot order.
    #[must_use]
    pub fn nodes(&self) -> &[EntityId] {
        &self.nodes
    }

    /// All edges in connector order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `id`, in connector order.
    pub fn outgoing<'a>(&'a self, id: &EntityId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.edges.get(index))
    }

    /// Ids connected to `id` by an edge in either direction, excluding `id`
    /// itself, deduplicated, in first-seen connector order.
    #[must_use]
    pub fn neighbors(&self, id: &EntityId) -> Vec<EntityId> {
        let mut seen: HashSet<&EntityId> = HashSet::new();
        let mut out = Vec::new();
        for edge in &self.edges {
            let other = if &edge.from == id {
                &edge.to
            } else if &edge.to == id {
                &edge.from
            } else {
                continue;
            };
            if other != id && seen.insert(other) {
                out.push(other.clone());
            }
        }
        out
    }
}

/// Depth-first, pre-order walk along outgoing edges starting at `root`.
///
/// Every reachable node is listed once, at its first visit; cycles and
/// diamonds are cut by the visited set. `root` is always the first element.
/// Uses an explicit stack, so depth is not bounded by the call stack.
#[must_use]
pub fn reachable_from(graph: &BindingGraph, root: &EntityId) -> Vec<EntityId> {
    let mut visited: HashSet<EntityId> = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        // Reverse so the first outgoing edge is explored first.
        let next: Vec<EntityId> = graph.outgoing(&id).map(|edge| edge.to.clone()).collect();
        stack.extend(next.into_iter().rev().filter(|to| !visited.contains(to)));
        order.push(id);
    }
    order
}
