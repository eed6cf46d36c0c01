//! Integration tests for the diagram renderers.

use sql_lineage::graph::{build_graph, GraphMetadata, LineageGraph};
use sql_lineage::model::MappingRecord;
use sql_lineage::render::{drawio, render, DiagramFormat};

fn sample_graph() -> LineageGraph {
    build_graph(
        &[
            MappingRecord::new("raw.orders", "stage.orders").with_logic("CAST(amt AS DECIMAL)"),
            MappingRecord::new("raw.customers", "stage.orders"),
            MappingRecord::new("stage.orders", "mart.sales").with_logic("SUM(amount)"),
            MappingRecord::new("stage.orders", "mart.sales"),
            MappingRecord::new("ref.regions", "mart.sales"),
        ],
        GraphMetadata::new("2025-03-01T08:00:00Z", "INSERT INTO ..."),
    )
}

#[test]
fn test_mermaid_declaration_counts() {
    let out = render(&sample_graph(), DiagramFormat::Mermaid);
    assert!(out.starts_with("graph TD\n"));
    assert_eq!(out.lines().filter(|l| l.contains("[\"")).count(), 5);
    assert_eq!(out.lines().filter(|l| l.contains("-->")).count(), 5);
    assert!(out.contains("    stage_orders -->|SUM(amount)| mart_sales\n"));
    assert!(out.contains("    raw_customers --> stage_orders\n"));
}

#[test]
fn test_graphviz_declaration_counts() {
    let out = render(&sample_graph(), DiagramFormat::Graphviz);
    assert!(out.starts_with("digraph DataLineage {\n"));
    assert!(out.ends_with("}\n"));
    assert_eq!(out.lines().filter(|l| l.contains(" [label=") && !l.contains("->")).count(), 5);
    assert_eq!(out.lines().filter(|l| l.contains(" -> ")).count(), 5);
}

#[test]
fn test_drawio_declaration_counts() {
    let out = render(&sample_graph(), DiagramFormat::Drawio);
    assert_eq!(out.matches("vertex=\"1\"").count(), 5);
    assert_eq!(out.matches("edge=\"1\"").count(), 5);
    assert!(out.contains("modified=\"2025-03-01T08:00:00Z\""));
    assert!(out.contains("source=\"node_1\" target=\"node_3\""));
}

#[test]
fn test_drawio_grid() {
    assert_eq!(drawio::grid_position(0), (50, 50));
    assert_eq!(drawio::grid_position(2), (550, 50));
    assert_eq!(drawio::grid_position(3), (50, 200));
    assert_eq!(drawio::grid_position(7), (300, 350));

    let out = render(&sample_graph(), DiagramFormat::Drawio);
    assert!(out.contains("<mxGeometry x=\"300\" y=\"200\" width=\"200\" height=\"80\""));
}

#[test]
fn test_renderers_are_deterministic() {
    for format in DiagramFormat::ALL {
        let a = render(&sample_graph(), format);
        let b = render(&sample_graph(), format);
        assert_eq!(a, b, "{} output differs between runs", format);
    }
}

#[test]
fn test_empty_graph_renders_skeleton() {
    let graph = build_graph(&[], GraphMetadata::default());
    assert_eq!(render(&graph, DiagramFormat::Mermaid), "graph TD\n");
    let dot = render(&graph, DiagramFormat::Graphviz);
    assert!(!dot.contains("->"));
    let xml = render(&graph, DiagramFormat::Drawio);
    assert!(xml.contains("<mxCell id=\"1\" parent=\"0\"/>"));
    assert!(!xml.contains("node_0"));
}
