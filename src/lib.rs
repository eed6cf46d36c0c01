//! # sql-lineage
//!
//! Table and column lineage from SQL text, rendered as CSV, JSON and diagrams.
//!
//! ## Architecture
//!
//! Lineage proposals come from one of two oracles: the local heuristic
//! extractor, or an external model's JSON answer. Both are untrusted and pass
//! through the same validator:
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │  SQL text            │      │  Oracle answer       │
//! └──────────────────────┘      └──────────────────────┘
//!            │ [extract]                   │ [oracle]
//!            ▼                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │          Raw mapping entries (arbitrary JSON)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Validated MappingRecords                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [graph]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    LineageGraph                          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render, export]
//! ┌─────────────────────────────────────────────────────────┐
//! │  object_lineage.csv  column_lineage.csv                  │
//! │  lineage_graph.json  data_lineage.{drawio,mmd,dot}       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod export;
pub mod extract;
pub mod graph;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod oracle;
pub mod pipeline;
pub mod render;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{PipelineConfig, Settings};
    pub use crate::extract::{analyze, extract_mappings, summarize, LineageSummary};
    pub use crate::graph::{build_graph, Connection, GraphMetadata, LineageGraph, Node};
    pub use crate::model::{MappingRecord, TransformationType};
    pub use crate::normalize::{normalize, Normalized};
    pub use crate::pipeline::{
        analyze_oracle_response, analyze_sql, run_batch, PipelineError, RunReport,
    };
    pub use crate::render::{render, DiagramFormat};
}

pub use graph::LineageGraph;
pub use model::{MappingRecord, TransformationType};
pub use render::DiagramFormat;
