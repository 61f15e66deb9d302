//! Relation graph of an authorization model.
//!
//! Nodes are interned by label and receive dense ids in creation order.
//! Edges are kept in insertion order and numbered by a per-graph sequence
//! counter. An edge is identified by `(from, to, context)`: adding the same
//! triple twice is a no-op and does not consume a sequence number. Whether a
//! step `from -> to` is computed is tracked separately and merged across every
//! edge offered for it, duplicates included.
//!
//! ```text
//! AuthorizationModel ──build_graph──▶ Graph ──classify──▶ CycleReport
//!                                       │
//!                                       └──pruned──▶ Graph ──render──▶ DOT
//! ```

mod builder;
mod cycles;
mod dot;

#[cfg(test)]
mod graph_proptest;

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

pub use builder::{build_graph, GraphBuilder};
pub use cycles::{classify, Cycle, CycleKind, CycleReport};
pub use dot::render;

/// Dense node identifier, assigned in creation order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labelled node (`document`, `user:*`, `document#viewer`, ` user[with c]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
}

/// A directed edge. Edges point from the source of grantees to the relation
/// that receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Position in insertion order, starting at 1.
    pub sequence: u32,
    /// Tupleset indirection the edge travels through, e.g. `(document#parent)`.
    pub context: Option<String>,
    /// The target relation is defined purely in terms of the source relation.
    pub computed: bool,
}

type EdgeKey = (NodeId, NodeId, Option<String>);

/// An interned, append-only relation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
    edges: Vec<Edge>,
    edge_keys: HashSet<EdgeKey>,
    computed_steps: HashSet<(NodeId, NodeId)>,
    next_sequence: u32,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
            computed_steps: HashSet::new(),
            next_sequence: 1,
        }
    }

    /// Returns the id for `label`, creating the node if it does not exist yet.
    pub fn add_or_get_node(&mut self, label: &str) -> NodeId {
        if let Some(id) = self.ids.get(label) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            label: label.to_string(),
        });
        self.ids.insert(label.to_string(), id);
        id
    }

    /// Adds an edge unless one with the same `(from, to, context)` exists.
    ///
    /// Returns the sequence number of the new edge, or `None` for a duplicate.
    /// A computed duplicate still marks the step `from -> to` as computed.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        context: Option<String>,
        computed: bool,
    ) -> Option<u32> {
        if computed {
            self.computed_steps.insert((from, to));
        }
        let key = (from, to, context);
        if self.edge_keys.contains(&key) {
            debug!(from = %from, to = %to, context = ?key.2, "skipping duplicate edge");
            return None;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        debug!(from = %from, to = %to, context = ?key.2, computed, sequence, "added edge");

        self.edges.push(Edge {
            from,
            to,
            sequence,
            context: key.2.clone(),
            computed,
        });
        self.edge_keys.insert(key);
        Some(sequence)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in sequence order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks up a node by id.
    ///
    /// Ids are dense in an unpruned graph; after pruning they may have gaps.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        match self.nodes.get(id.0) {
            Some(node) if node.id == id => Some(node),
            _ => self
                .nodes
                .binary_search_by_key(&id, |n| n.id)
                .ok()
                .map(|idx| &self.nodes[idx]),
        }
    }

    /// True when any edge offered for `from -> to` was computed.
    pub fn is_computed_step(&self, from: NodeId, to: NodeId) -> bool {
        self.computed_steps.contains(&(from, to))
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    /// Returns a copy of the graph without nodes that have no incident edge.
    ///
    /// Node ids and edge sequence numbers are preserved.
    pub fn pruned(&self) -> Graph {
        let connected: HashSet<NodeId> = self
            .edges
            .iter()
            .flat_map(|e| [e.from, e.to])
            .collect();

        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| connected.contains(&n.id))
            .cloned()
            .collect();
        let ids = nodes.iter().map(|n| (n.label.clone(), n.id)).collect();

        debug!(
            removed = self.nodes.len() - nodes.len(),
            remaining = nodes.len(),
            "pruned isolated nodes"
        );

        Graph {
            nodes,
            ids,
            edges: self.edges.clone(),
            edge_keys: self.edge_keys.clone(),
            computed_steps: self.computed_steps.clone(),
            next_sequence: self.next_sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_are_interned_by_label() {
        let mut graph = Graph::new();
        let user = graph.add_or_get_node("user");
        let viewer = graph.add_or_get_node("document#viewer");

        assert_eq!(user, NodeId(0));
        assert_eq!(viewer, NodeId(1));
        assert_eq!(graph.add_or_get_node("user"), user);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node_id("document#viewer"), Some(viewer));
        assert_eq!(graph.label(user), Some("user"));
    }

    #[test]
    fn test_duplicate_edges_consume_no_sequence() {
        let mut graph = Graph::new();
        let a = graph.add_or_get_node("a");
        let b = graph.add_or_get_node("b");

        assert_eq!(graph.add_edge(a, b, None, false), Some(1));
        assert_eq!(graph.add_edge(a, b, None, true), None);
        assert_eq!(
            graph.add_edge(a, b, Some("(doc#parent)".to_string()), false),
            Some(2)
        );
        assert_eq!(graph.add_edge(b, a, None, true), Some(3));

        let sequences: Vec<u32> = graph.edges().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert!(!graph.edges()[0].computed);
    }

    #[test]
    fn test_computed_duplicate_marks_step() {
        let mut graph = Graph::new();
        let a = graph.add_or_get_node("a");
        let b = graph.add_or_get_node("b");

        graph.add_edge(a, b, None, false);
        assert!(!graph.is_computed_step(a, b));

        assert_eq!(graph.add_edge(a, b, None, true), None);
        assert!(graph.is_computed_step(a, b));
        assert!(!graph.is_computed_step(b, a));
        assert!(!graph.edges()[0].computed);
        assert!(graph.pruned().is_computed_step(a, b));
    }

    #[test]
    fn test_pruned_keeps_ids_and_edges() {
        let mut graph = Graph::new();
        let lonely = graph.add_or_get_node("lonely");
        let a = graph.add_or_get_node("a");
        let b = graph.add_or_get_node("b");
        graph.add_edge(a, b, None, false);

        let pruned = graph.pruned();
        assert_eq!(pruned.node_count(), 2);
        assert_eq!(pruned.node_id("lonely"), None);
        assert!(pruned.node(lonely).is_none());
        assert_eq!(pruned.node_id("a"), Some(a));
        assert_eq!(pruned.label(b), Some("b"));
        assert_eq!(pruned.edges(), graph.edges());

        // The source graph is untouched.
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_self_loop_keeps_node() {
        let mut graph = Graph::new();
        let x = graph.add_or_get_node("x");
        graph.add_or_get_node("y");
        graph.add_edge(x, x, None, true);

        let pruned = graph.pruned();
        assert_eq!(pruned.nodes(), &[Node { id: x, label: "x".to_string() }]);
    }
}
