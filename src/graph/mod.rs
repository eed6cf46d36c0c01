//! Table-level lineage graph.
//!
//! A [`LineageGraph`] is built once per analysis run from validated mapping
//! records and is read-only afterwards. Nodes are tables, keyed by their
//! cleaned identifier; edges are [`Connection`]s in discovery order.
//!
//! Node order and connection order are the order in which the builder first
//! saw them, so every renderer and exporter produces deterministic output.

mod builder;
mod types;

pub use builder::{build_graph, GraphBuilder};
pub use types::{Connection, Endpoint, GraphMetadata, Node, TransformationSummary};

use std::collections::{HashMap, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

/// Lineage graph: tables, connections, transformation summaries and metadata.
#[derive(Debug, Clone)]
pub struct LineageGraph {
    graph: DiGraph<Node, Connection>,
    node_index: HashMap<String, NodeIndex>,
    transformations: Vec<TransformationSummary>,
    metadata: GraphMetadata,
}

impl LineageGraph {
    pub(crate) fn new(metadata: GraphMetadata) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            transformations: Vec::new(),
            metadata,
        }
    }

    /// Get or create the node for a table.
    pub(crate) fn upsert_node(&mut self, table: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(table) {
            idx
        } else {
            let idx = self.graph.add_node(Node::new(table));
            self.node_index.insert(table.to_string(), idx);
            idx
        }
    }

    pub(crate) fn add_column(&mut self, idx: NodeIndex, column: &str) {
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.add_column(column);
        }
    }

    pub(crate) fn push_connection(&mut self, from: NodeIndex, to: NodeIndex, conn: Connection) {
        self.graph.add_edge(from, to, conn);
    }

    pub(crate) fn push_transformation(&mut self, summary: TransformationSummary) {
        self.transformations.push(summary);
    }

    /// Nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Connections in discovery order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights()
    }

    pub fn transformations(&self) -> &[TransformationSummary] {
        &self.transformations
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn node(&self, table: &str) -> Option<&Node> {
        self.node_index
            .get(table)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Discovery-order position of a table's node.
    pub fn position(&self, table: &str) -> Option<usize> {
        self.node_index.get(table).map(|idx| idx.index())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every table that transitively feeds `table`, in discovery order.
    pub fn upstream(&self, table: &str) -> Vec<&str> {
        self.reachable(table, Direction::Incoming)
    }

    /// Every table transitively fed by `table`, in discovery order.
    pub fn downstream(&self, table: &str) -> Vec<&str> {
        self.reachable(table, Direction::Outgoing)
    }

    fn reachable(&self, table: &str, direction: Direction) -> Vec<&str> {
        let Some(&start) = self.node_index.get(table) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.graph.node_count()];
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for neighbor in self.graph.neighbors_directed(idx, direction) {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        // A self-loop or cycle back to the start is not lineage of itself.
        visited[start.index()] = false;
        self.graph
            .node_indices()
            .filter(|idx| visited[idx.index()])
            .filter_map(|idx| self.graph.node_weight(idx).map(Node::name))
            .collect()
    }
}
