//! Integration tests for the lineage graph builder.

use std::collections::BTreeSet;

use sql_lineage::graph::{build_graph, GraphBuilder, GraphMetadata};
use sql_lineage::model::MappingRecord;

fn records() -> Vec<MappingRecord> {
    vec![
        MappingRecord::new("raw.orders", "stage.orders").with_columns("id", "order_id"),
        MappingRecord::new("raw.orders", "stage.orders").with_columns("amt", "amount"),
        MappingRecord::new("raw.customers", "stage.orders").with_logic("lookup"),
        MappingRecord::new("stage.orders", "mart.sales"),
        MappingRecord::new("stage.orders", "mart.sales"),
    ]
}

#[test]
fn test_nodes_equal_union_of_tables() {
    let input = records();
    let graph = build_graph(&input, GraphMetadata::default());

    let expected: BTreeSet<_> = input
        .iter()
        .flat_map(|r| [r.source_table.as_str(), r.target_table.as_str()])
        .collect();
    let actual: BTreeSet<_> = graph.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_connection_count_equals_record_count() {
    let input = records();
    let graph = build_graph(&input, GraphMetadata::default());
    assert_eq!(graph.connection_count(), input.len());

    let order: Vec<_> = graph
        .connections()
        .map(|c| (c.source.table.as_str(), c.source.column.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("raw.orders", "id"),
            ("raw.orders", "amt"),
            ("raw.customers", ""),
            ("stage.orders", ""),
            ("stage.orders", ""),
        ]
    );
}

#[test]
fn test_same_input_same_graph() {
    let a = build_graph(&records(), GraphMetadata::default());
    let b = build_graph(&records(), GraphMetadata::default());

    let nodes_a: Vec<_> = a.nodes().cloned().collect();
    let nodes_b: Vec<_> = b.nodes().cloned().collect();
    assert_eq!(nodes_a, nodes_b);

    let conns_a: Vec<_> = a.connections().cloned().collect();
    let conns_b: Vec<_> = b.connections().cloned().collect();
    assert_eq!(conns_a, conns_b);
    assert_eq!(a.transformations(), b.transformations());
}

#[test]
fn test_incremental_builder() {
    let mut builder = GraphBuilder::new(GraphMetadata::new("t0", "sql"));
    builder
        .add_record(&MappingRecord::new("a", "b"))
        .add_record(&MappingRecord::new("b", "c"));
    let graph = builder.build();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.metadata().generated_at, "t0");
    assert_eq!(graph.upstream("c"), vec!["a", "b"]);
}

#[test]
fn test_node_columns() {
    let graph = build_graph(&records(), GraphMetadata::default());
    let columns: Vec<_> = graph
        .node("stage.orders")
        .unwrap()
        .columns
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(columns, vec!["amount", "order_id"]);
    assert!(graph.node("mart.sales").unwrap().columns.is_empty());
}
