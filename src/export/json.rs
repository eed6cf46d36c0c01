//! `lineage_graph.json` document.

use serde::Serialize;

use crate::graph::{Connection, GraphMetadata, LineageGraph, TransformationSummary};

#[derive(Debug, Clone, Serialize)]
pub struct LineageDocument<'a> {
    pub metadata: &'a GraphMetadata,
    pub nodes: Vec<NodeDoc<'a>>,
    pub connections: Vec<&'a Connection>,
    pub transformations: &'a [TransformationSummary],
    pub graph: GraphInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDoc<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub columns: Vec<ColumnDoc<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDoc<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphInfo {
    pub directed: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<'a> LineageDocument<'a> {
    pub fn from_graph(graph: &'a LineageGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeDoc {
                id: node.id.as_str(),
                name: node.name(),
                kind: "table",
                columns: node
                    .columns
                    .iter()
                    .map(|name| ColumnDoc {
                        name: name.as_str(),
                        kind: "column",
                    })
                    .collect(),
            })
            .collect();

        Self {
            metadata: graph.metadata(),
            nodes,
            connections: graph.connections().collect(),
            transformations: graph.transformations(),
            graph: GraphInfo {
                directed: true,
                kind: "data_lineage",
            },
        }
    }
}

/// Pretty-printed (two-space indented) lineage JSON.
pub fn lineage_json(graph: &LineageGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&LineageDocument::from_graph(graph))
}
