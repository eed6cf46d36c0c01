//! Artifact exporters.
//!
//! Writes the tabular and JSON views of a run, plus the selected diagram, to
//! well-known file names in an output directory. Existing files are
//! overwritten (last write wins).
//!
//! An empty mapping set writes nothing and is not an error.

pub mod csv;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::LineageGraph;
use crate::model::MappingRecord;
use crate::render::{self, DiagramFormat};

pub const OBJECT_LINEAGE_FILE: &str = "object_lineage.csv";
pub const COLUMN_LINEAGE_FILE: &str = "column_lineage.csv";
pub const LINEAGE_JSON_FILE: &str = "lineage_graph.json";
pub const ORACLE_DIAGRAM_FILE: &str = "data_flow.drawio";

/// Errors that can occur while writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize lineage JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// What an export pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No mappings were available; nothing was written.
    NoMappings,
    /// Paths of the files written, in write order.
    Written(Vec<PathBuf>),
}

impl ExportOutcome {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            ExportOutcome::NoMappings => &[],
            ExportOutcome::Written(paths) => paths,
        }
    }
}

/// Write object CSV, column CSV, lineage JSON and the diagram for `format`.
pub fn write_artifacts(
    dir: &Path,
    records: &[MappingRecord],
    graph: &LineageGraph,
    format: DiagramFormat,
) -> ExportResult<ExportOutcome> {
    if records.is_empty() {
        tracing::warn!("no mappings available, skipping artifact export");
        return Ok(ExportOutcome::NoMappings);
    }

    let json = json::lineage_json(graph)?;
    let files = [
        (OBJECT_LINEAGE_FILE, csv::object_lineage_csv(records)),
        (COLUMN_LINEAGE_FILE, csv::column_lineage_csv(records)),
        (LINEAGE_JSON_FILE, json),
        (format.file_name(), render::render(graph, format)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        written.push(write_file(dir, name, &contents)?);
    }
    Ok(ExportOutcome::Written(written))
}

/// Write `contents` to `dir/name`, replacing any existing file.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> ExportResult<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(path)
}
