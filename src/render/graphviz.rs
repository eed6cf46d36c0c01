//! Graphviz DOT output.

use crate::graph::LineageGraph;

use super::sanitize_id;

/// Render a left-to-right `digraph` with boxed nodes.
pub fn render(graph: &LineageGraph) -> String {
    let mut out = String::from("digraph DataLineage {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=filled, fillcolor=lightblue];\n");

    for node in graph.nodes() {
        out.push_str(&format!(
            "    \"{}\" [label=\"{}\"];\n",
            sanitize_id(&node.id),
            escape(node.name())
        ));
    }

    for conn in graph.connections() {
        let source = sanitize_id(&conn.source.table);
        let target = sanitize_id(&conn.target.table);
        if conn.transformation.is_empty() {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", source, target));
        } else {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                source,
                target,
                escape(&conn.transformation)
            ));
        }
    }

    out.push_str("}\n");
    out
}

/// Escape text for a double-quoted DOT string.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            c => result.push(c),
        }
    }
    result
}
