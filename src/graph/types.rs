//! Value types held by a [`LineageGraph`](super::LineageGraph).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A table-level vertex. The key is the cleaned table identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub columns: BTreeSet<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: BTreeSet::new(),
        }
    }

    /// Display name; identical to the key.
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Add a column name if non-empty. Returns true if it was new.
    pub fn add_column(&mut self, column: &str) -> bool {
        !column.is_empty() && self.columns.insert(column.to_string())
    }
}

/// One side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub table: String,
    /// Empty for table-level lineage.
    pub column: String,
}

impl Endpoint {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// A directed lineage edge with its transformation text (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: Endpoint,
    pub target: Endpoint,
    pub transformation: String,
}

/// `source → target → logic`, with qualified `table.column` names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationSummary {
    pub source: String,
    pub target: String,
    pub logic: String,
}

/// Provenance of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub generated_at: String,
    pub source_sql: String,
    pub tool: String,
    pub version: String,
}

impl GraphMetadata {
    pub const DEFAULT_TOOL: &'static str = "SQL Lineage Analyzer";
    pub const DEFAULT_VERSION: &'static str = "1.0";

    pub fn new(generated_at: impl Into<String>, source_sql: impl Into<String>) -> Self {
        Self {
            generated_at: generated_at.into(),
            source_sql: source_sql.into(),
            tool: Self::DEFAULT_TOOL.to_string(),
            version: Self::DEFAULT_VERSION.to_string(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool = tool.into();
        self.version = version.into();
        self
    }
}

impl Default for GraphMetadata {
    fn default() -> Self {
        Self::new("", "")
    }
}
