//! Mermaid flowchart output.

use crate::graph::LineageGraph;

use super::sanitize_id;

/// Render `graph TD` with one node statement per table and one edge per connection.
pub fn render(graph: &LineageGraph) -> String {
    let mut out = String::from("graph TD\n");

    for node in graph.nodes() {
        out.push_str(&format!(
            "    {}[\"{}\"]\n",
            sanitize_id(&node.id),
            escape_label(node.name())
        ));
    }

    for conn in graph.connections() {
        let source = sanitize_id(&conn.source.table);
        let target = sanitize_id(&conn.target.table);
        if conn.transformation.is_empty() {
            out.push_str(&format!("    {} --> {}\n", source, target));
        } else {
            out.push_str(&format!(
                "    {} -->|{}| {}\n",
                source,
                escape_edge_label(&conn.transformation),
                target
            ));
        }
    }

    out
}

fn escape_label(s: &str) -> String {
    s.replace('"', "#quot;")
}

fn escape_edge_label(s: &str) -> String {
    escape_label(s).replace('|', "#124;").replace('\n', " ")
}
