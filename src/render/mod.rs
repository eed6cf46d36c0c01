//! Diagram renderers.
//!
//! Three independent renderers consume the same [`LineageGraph`]:
//!
//! | Format | File | Renderer |
//! |---|---|---|
//! | [`DiagramFormat::Mermaid`] | `data_lineage.mmd` | [`mermaid::render`] |
//! | [`DiagramFormat::Graphviz`] | `data_lineage.dot` | [`graphviz::render`] |
//! | [`DiagramFormat::Drawio`] | `data_lineage.drawio` | [`drawio::render`] |
//!
//! Each is a pure function of the graph: identical graphs produce identical
//! bytes. Each emits exactly one node declaration per node and one edge
//! declaration per connection.

pub mod drawio;
pub mod graphviz;
pub mod mermaid;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::LineageGraph;

/// Diagram output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Drawio,
    Mermaid,
    Graphviz,
}

impl DiagramFormat {
    pub const ALL: [DiagramFormat; 3] = [
        DiagramFormat::Drawio,
        DiagramFormat::Mermaid,
        DiagramFormat::Graphviz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramFormat::Drawio => "drawio",
            DiagramFormat::Mermaid => "mermaid",
            DiagramFormat::Graphviz => "graphviz",
        }
    }

    /// Well-known output file name for this format.
    pub fn file_name(&self) -> &'static str {
        match self {
            DiagramFormat::Drawio => "data_lineage.drawio",
            DiagramFormat::Mermaid => "data_lineage.mmd",
            DiagramFormat::Graphviz => "data_lineage.dot",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DiagramFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "unknown diagram format '{}' (expected drawio, mermaid or graphviz)",
                    s
                )
            })
    }
}

/// Render a graph in the given format.
pub fn render(graph: &LineageGraph, format: DiagramFormat) -> String {
    match format {
        DiagramFormat::Drawio => drawio::render(graph),
        DiagramFormat::Mermaid => mermaid::render(graph),
        DiagramFormat::Graphviz => graphviz::render(graph),
    }
}

/// Identifier safe for Mermaid and DOT: `.` and `-` become `_`.
pub fn sanitize_id(table: &str) -> String {
    table.replace(['.', '-'], "_")
}
