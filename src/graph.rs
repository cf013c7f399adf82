use std::collections::HashMap;

use log::warn;
use petgraph::stable_graph::{EdgeIndex, EdgeReference, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, IntoNodeReferences};
use petgraph::{Directed, Direction};

use crate::elements::{Edge, Node, NodeKind};
use crate::error::BuildError;

type StableGraphType = StableGraph<Node, Edge, Directed>;

/// Wrapper around [`petgraph::stable_graph::StableGraph`] holding the full
/// music-taste graph.
///
/// The node and edge set is constructed once per dataset load and is
/// structurally immutable afterwards; only position, velocity and pin fields
/// change during simulation. Nodes are indexed by id and hierarchical
/// ancestors are precomputed so per-tick lookups stay near-constant.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    g: StableGraphType,
    by_id: HashMap<String, NodeIndex>,

    /// Genre nodes in first-appearance order. The order is part of the crate
    /// contract: it fixes ring slots in hierarchical mode and the clustering
    /// pass iterates it as-is.
    genre_order: Vec<NodeIndex>,

    /// Nearest typed ancestor per node: artist for a track or album, genre
    /// for an artist.
    anchors: HashMap<NodeIndex, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, rejecting duplicate ids.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex, BuildError> {
        if self.by_id.contains_key(node.id()) {
            return Err(BuildError::DuplicateId(node.id().to_string()));
        }

        let id = node.id().to_string();
        let kind = node.kind();
        let idx = self.g.add_node(node);
        self.by_id.insert(id, idx);
        if kind == NodeKind::Genre {
            self.genre_order.push(idx);
        }
        Ok(idx)
    }

    /// Adds an edge between two existing nodes addressed by id. A relation
    /// referencing an unknown id is dropped with a warning, not an error, so
    /// partial graphs still build.
    pub fn try_add_edge(&mut self, source: &str, target: &str, edge: Edge) -> Option<EdgeIndex> {
        let (Some(&s), Some(&t)) = (self.by_id.get(source), self.by_id.get(target)) else {
            warn!(
                "dropping {:?} relation {source} -> {target}: unknown endpoint",
                edge.kind()
            );
            return None;
        };
        Some(self.g.add_edge(s, t, edge))
    }

    /// Adds an edge between two nodes already resolved to indices.
    pub(crate) fn add_edge_between(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        edge: Edge,
    ) -> EdgeIndex {
        self.g.add_edge(source, target, edge)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.g.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.g.node_weight_mut(idx)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index(id).and_then(|idx| self.node(idx))
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.g.edge_weight(idx)
    }

    pub fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.g.edge_endpoints(idx)
    }

    /// Provides iterator over all nodes and their indices.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.g.node_references()
    }

    /// Provides iterator over all edges and their indices.
    pub fn edges_iter(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.g.edge_references().map(|e| (e.id(), e.weight()))
    }

    pub fn edges_directed(
        &self,
        idx: NodeIndex,
        dir: Direction,
    ) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.g.edges_directed(idx, dir)
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn genre_order(&self) -> &[NodeIndex] {
        &self.genre_order
    }

    pub(crate) fn set_anchor(&mut self, node: NodeIndex, ancestor: NodeIndex) {
        self.anchors.insert(node, ancestor);
    }

    /// Nearest typed ancestor used by the hierarchical anchor force.
    pub fn anchor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.anchors.get(&node).copied()
    }

    pub fn g(&self) -> &StableGraphType {
        &self.g
    }

    pub fn g_mut(&mut self) -> &mut StableGraphType {
        &mut self.g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::RelationKind;

    #[test]
    fn duplicate_node_id_is_rejected() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let err = g.add_node(Node::new("a", "A again", NodeKind::Artist));
        assert_eq!(err, Err(BuildError::DuplicateId("a".into())));
    }

    #[test]
    fn unknown_endpoint_relation_is_dropped_not_fatal() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let e = g.try_add_edge("a", "missing", Edge::new(RelationKind::ArtistTrack));
        assert!(e.is_none());
        assert_eq!(g.edge_count(), 0);

        // Every surviving edge resolves to nodes in the same graph.
        for (idx, _) in g.edges_iter() {
            assert!(g.edge_endpoints(idx).is_some());
        }
    }

    #[test]
    fn genre_order_follows_insertion() {
        let mut g = Graph::new();
        let rock = g.add_node(Node::new("rock", "Rock", NodeKind::Genre)).unwrap();
        g.add_node(Node::new("a", "A", NodeKind::Artist)).unwrap();
        let jazz = g.add_node(Node::new("jazz", "Jazz", NodeKind::Genre)).unwrap();
        assert_eq!(g.genre_order(), &[rock, jazz]);
    }
}
