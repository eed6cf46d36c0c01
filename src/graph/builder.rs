//! Folding validated mapping records into a [`LineageGraph`].

use crate::model::MappingRecord;

use super::{Connection, Endpoint, GraphMetadata, LineageGraph, TransformationSummary};

/// Incremental graph builder.
///
/// Connections are appended unconditionally, one per record. Table-level
/// deduplication is an exporter concern.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: LineageGraph,
}

impl GraphBuilder {
    pub fn new(metadata: GraphMetadata) -> Self {
        Self {
            graph: LineageGraph::new(metadata),
        }
    }

    /// Fold one record into the graph.
    pub fn add_record(&mut self, record: &MappingRecord) -> &mut Self {
        let source = self.graph.upsert_node(&record.source_table);
        let target = self.graph.upsert_node(&record.target_table);

        self.graph.add_column(source, &record.source_column);
        self.graph.add_column(target, &record.target_column);
        for column in &record.columns {
            self.graph.add_column(source, &column.source_column);
            self.graph.add_column(target, &column.target_column);
        }

        let transformation = record.transformation_text().to_string();
        if !transformation.is_empty() {
            self.graph.push_transformation(TransformationSummary {
                source: record.qualified_source(),
                target: record.qualified_target(),
                logic: transformation.clone(),
            });
        }

        self.graph.push_connection(
            source,
            target,
            Connection {
                source: Endpoint::new(&record.source_table, &record.source_column),
                target: Endpoint::new(&record.target_table, &record.target_column),
                transformation,
            },
        );
        self
    }

    pub fn build(self) -> LineageGraph {
        self.graph
    }
}

/// Build a graph from records in order.
pub fn build_graph(records: &[MappingRecord], metadata: GraphMetadata) -> LineageGraph {
    let mut builder = GraphBuilder::new(metadata);
    for record in records {
        builder.add_record(record);
    }
    let graph = builder.build();
    tracing::debug!(
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        transformations = graph.transformations().len(),
        "built lineage graph"
    );
    graph
}
