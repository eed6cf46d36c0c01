//! diagrams.net (draw.io) XML output.
//!
//! Nodes are laid out on a fixed grid of three columns. Shape and edge cell
//! ids are positional (`node_<i>`, `edge_<i>`). The document's `modified`
//! attribute is the graph's generation timestamp.

use crate::graph::LineageGraph;

const COLUMNS: usize = 3;
const ORIGIN: usize = 50;
const COLUMN_SPACING: usize = 250;
const ROW_SPACING: usize = 150;
const CELL_WIDTH: usize = 200;
const CELL_HEIGHT: usize = 80;

const NODE_STYLE: &str = "rounded=1;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;";
const EDGE_STYLE: &str =
    "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;";

/// Top-left corner of the `index`-th node.
pub fn grid_position(index: usize) -> (usize, usize) {
    let x = ORIGIN + (index % COLUMNS) * COLUMN_SPACING;
    let y = ORIGIN + (index / COLUMNS) * ROW_SPACING;
    (x, y)
}

pub fn render(graph: &LineageGraph) -> String {
    let metadata = graph.metadata();
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<mxfile host=\"app.diagrams.net\" modified=\"{}\" agent=\"{}\" version=\"{}\">\n",
        escape_xml(&metadata.generated_at),
        escape_xml(&metadata.tool),
        escape_xml(&metadata.version)
    ));
    out.push_str("  <diagram name=\"Data Lineage\" id=\"lineage\">\n");
    out.push_str(
        "    <mxGraphModel dx=\"1422\" dy=\"794\" grid=\"1\" gridSize=\"10\" guides=\"1\" \
         tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" \
         pageWidth=\"827\" pageHeight=\"1169\" math=\"0\" shadow=\"0\">\n",
    );
    out.push_str("      <root>\n");
    out.push_str("        <mxCell id=\"0\"/>\n");
    out.push_str("        <mxCell id=\"1\" parent=\"0\"/>\n");

    for (i, node) in graph.nodes().enumerate() {
        let (x, y) = grid_position(i);
        out.push_str(&format!(
            "        <mxCell id=\"node_{}\" value=\"{}\" style=\"{}\" vertex=\"1\" parent=\"1\">\n",
            i,
            escape_xml(node.name()),
            NODE_STYLE
        ));
        out.push_str(&format!(
            "          <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n",
            x, y, CELL_WIDTH, CELL_HEIGHT
        ));
        out.push_str("        </mxCell>\n");
    }

    for (i, conn) in graph.connections().enumerate() {
        // Every connection endpoint is a node; 0 is never reached in practice.
        let source = graph.position(&conn.source.table).unwrap_or(0);
        let target = graph.position(&conn.target.table).unwrap_or(0);
        out.push_str(&format!(
            "        <mxCell id=\"edge_{}\" value=\"{}\" style=\"{}\" edge=\"1\" parent=\"1\" \
             source=\"node_{}\" target=\"node_{}\">\n",
            i,
            escape_xml(&conn.transformation),
            EDGE_STYLE,
            source,
            target
        ));
        out.push_str("          <mxGeometry relative=\"1\" as=\"geometry\"/>\n");
        out.push_str("        </mxCell>\n");
    }

    out.push_str("      </root>\n");
    out.push_str("    </mxGraphModel>\n");
    out.push_str("  </diagram>\n");
    out.push_str("</mxfile>\n");
    out
}

/// Escape text for an XML attribute value.
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            '\n' => result.push_str("&#10;"),
            c => result.push(c),
        }
    }
    result
}
