//! End-to-end lineage runs.
//!
//! ```text
//! SQL text ──→ Extractor ─┐
//!                         ├→ Normalizer → Graph Builder → {Renderers, Exporters} → files
//! Oracle answer ──────────┘
//! ```
//!
//! Each run is synchronous and independent. Runs that share an output
//! directory overwrite each other's artifacts.
//!
//! # Example
//!
//! ```ignore
//! use sql_lineage::config::PipelineConfig;
//! use sql_lineage::pipeline::analyze_sql;
//! use sql_lineage::render::DiagramFormat;
//!
//! let config = PipelineConfig::new("./out").with_format(DiagramFormat::Mermaid);
//! let report = analyze_sql("INSERT INTO mart.t SELECT a FROM raw.s", &config)?;
//! println!("{} of {} mappings kept", report.cleaned_count, report.original_count);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::export::{self, ExportError, ExportOutcome, ORACLE_DIAGRAM_FILE};
use crate::extract::{self, excerpt, RawMapping};
use crate::graph::{build_graph, GraphMetadata, LineageGraph};
use crate::model::MappingRecord;
use crate::normalize::{self, DroppedEntry};
use crate::oracle::{self, OracleError};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that fail a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    #[error("Output path is not a directory: {0}")]
    OutputDirNotDirectory(PathBuf),

    #[error("Output directory is not writable: {0}")]
    OutputDirReadOnly(PathBuf),

    #[error("Failed to read SQL file {path}: {source}")]
    ReadSql {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ============================================================================
// Result Types
// ============================================================================

/// The in-memory products of a run, before anything is written.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Validated records in input order.
    pub records: Vec<MappingRecord>,
    pub original_count: usize,
    pub dropped: Vec<DroppedEntry>,
    pub graph: LineageGraph,
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub original_count: usize,
    pub cleaned_count: usize,
    pub export: ExportOutcome,
    /// Diagram supplied by an oracle, written verbatim.
    pub oracle_diagram: Option<PathBuf>,
}

impl RunReport {
    /// All files written by the run.
    pub fn artifacts(&self) -> Vec<&Path> {
        self.export
            .paths()
            .iter()
            .chain(self.oracle_diagram.iter())
            .map(PathBuf::as_path)
            .collect()
    }

    /// Some entries were dropped or no mappings survived.
    pub fn has_warnings(&self) -> bool {
        self.cleaned_count < self.original_count || self.export == ExportOutcome::NoMappings
    }
}

// ============================================================================
// Pure Stages
// ============================================================================

/// Normalize entries and build the graph. Performs no IO.
pub fn analyze_entries<I>(
    entries: I,
    sql: &str,
    config: &PipelineConfig,
    generated_at: &str,
) -> Analysis
where
    I: IntoIterator<Item = Value>,
{
    let normalized = normalize::normalize(entries);
    let metadata = GraphMetadata::new(generated_at, excerpt(sql, config.excerpt_chars))
        .with_tool(&config.tool, &config.version);
    let graph = build_graph(&normalized.records, metadata);

    Analysis {
        original_count: normalized.original_count,
        dropped: normalized.dropped,
        records: normalized.records,
        graph,
    }
}

/// Run the heuristic extractor over `sql` and analyze its output.
pub fn extract_analysis(sql: &str, config: &PipelineConfig, generated_at: &str) -> Analysis {
    let entries: Vec<Value> = extract::extract_mappings(sql)
        .iter()
        .map(RawMapping::to_entry)
        .collect();
    analyze_entries(entries, sql, config, generated_at)
}

// ============================================================================
// Runs
// ============================================================================

/// Heuristic run: extract, normalize, build, write artifacts.
pub fn analyze_sql(sql: &str, config: &PipelineConfig) -> PipelineResult<RunReport> {
    check_output_dir(&config.output_dir)?;
    let analysis = extract_analysis(sql, config, &timestamp());
    write_analysis(&analysis, config, None)
}

/// Oracle run: parse the oracle's answer about `sql` and write artifacts.
///
/// An unparseable answer fails the run with the raw text preserved.
pub fn analyze_oracle_response(
    response: &str,
    sql: &str,
    config: &PipelineConfig,
) -> PipelineResult<RunReport> {
    check_output_dir(&config.output_dir)?;
    let parsed = oracle::parse_response(response)?;
    let analysis = analyze_entries(parsed.mappings, sql, config, &timestamp());
    write_analysis(&analysis, config, parsed.diagram.as_deref())
}

/// Heuristic run over a SQL file.
pub fn run_file(path: &Path, config: &PipelineConfig) -> PipelineResult<RunReport> {
    let sql = read_sql(path)?;
    tracing::info!(file = %path.display(), "analyzing SQL file");
    analyze_sql(&sql, config)
}

/// Result of one file in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: PipelineResult<RunReport>,
}

/// Run files one at a time into the same output directory.
///
/// The directory is checked once up front; an unusable directory fails the
/// whole batch. Per-file failures are reported and the batch moves on.
pub fn run_batch<P: AsRef<Path>>(
    paths: &[P],
    config: &PipelineConfig,
) -> PipelineResult<Vec<BatchItem>> {
    check_output_dir(&config.output_dir)?;

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let result = run_file(path, config);
        if let Err(e) = &result {
            tracing::error!(file = %path.display(), error = %e, "skipping file");
        }
        items.push(BatchItem {
            path: path.to_path_buf(),
            result,
        });
    }
    Ok(items)
}

/// Read a SQL file.
pub fn read_sql(path: &Path) -> PipelineResult<String> {
    fs::read_to_string(path).map_err(|source| PipelineError::ReadSql {
        path: path.to_path_buf(),
        source,
    })
}

/// Verify the output directory exists and is writable.
pub fn check_output_dir(dir: &Path) -> PipelineResult<()> {
    let metadata =
        fs::metadata(dir).map_err(|_| PipelineError::OutputDirMissing(dir.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(PipelineError::OutputDirNotDirectory(dir.to_path_buf()));
    }
    if metadata.permissions().readonly() {
        return Err(PipelineError::OutputDirReadOnly(dir.to_path_buf()));
    }
    Ok(())
}

fn write_analysis(
    analysis: &Analysis,
    config: &PipelineConfig,
    oracle_diagram: Option<&str>,
) -> PipelineResult<RunReport> {
    let export = export::write_artifacts(
        &config.output_dir,
        &analysis.records,
        &analysis.graph,
        config.format,
    )?;

    let oracle_diagram = match oracle_diagram {
        Some(xml) => Some(export::write_file(&config.output_dir, ORACLE_DIAGRAM_FILE, xml)?),
        None => None,
    };

    Ok(RunReport {
        original_count: analysis.original_count,
        cleaned_count: analysis.records.len(),
        export,
        oracle_diagram,
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
