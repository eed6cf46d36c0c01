//! Heuristic SQL pattern extractor.
//!
//! Produces raw lineage mappings from SQL text using lexical patterns only.
//! There is no parse tree: the text is upper-cased, stripped of comments and
//! scanned for table identifiers after `FROM`, `JOIN`, `INSERT INTO`,
//! `CREATE TABLE` and (as a fallback) `INTO`.
//!
//! ```text
//! SQL text → preprocess → table scan ─┐
//!                       → SELECT span → column scan ─┴→ source × target mappings
//! ```
//!
//! Extraction never fails. Statements without a `SELECT ... FROM` span yield
//! no mappings.

mod patterns;
mod summary;

pub use patterns::preprocess;
pub use summary::{summarize, LineageSummary};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::model::{
    clean_table_name, ColumnMapping, MappingRecord, TransformationType, UNKNOWN_TARGET,
};

use patterns::{
    captures, has_keyword, COLUMN_TOKEN, CREATE_TARGET, FROM_TABLE, INSERT_TARGET, INTO_TARGET,
    JOIN_TABLE, SELECT_SPAN,
};

/// Maximum number of raw column tokens taken from the select list.
pub const MAX_COLUMN_TOKENS: usize = 20;

/// Tokens that are never treated as column names.
const CONTROL_KEYWORDS: &[&str] = &[
    "AS", "FROM", "SELECT", "WHERE", "GROUP", "ORDER", "BY", "HAVING",
];

/// Length of the SQL excerpt kept in reports.
pub const EXCERPT_CHARS: usize = 500;

/// A raw mapping as discovered in the SQL text, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMapping {
    pub source_table: String,
    pub target_table: String,
    pub transformation_type: TransformationType,
    pub columns: Vec<ExtractedColumn>,
}

/// A column pair from the select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedColumn {
    pub source_column: String,
    pub target_column: String,
    pub data_type: &'static str,
}

impl RawMapping {
    /// Keyed-record form consumed by the normalizer.
    pub fn to_entry(&self) -> Value {
        // Plain strings and a unit enum; serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Convert directly into a mapping record, bypassing the normalizer.
    pub fn to_record(&self) -> MappingRecord {
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnMapping::new(&c.source_column, &c.target_column))
            .collect();
        MappingRecord::new(&self.source_table, &self.target_table)
            .with_type(self.transformation_type)
            .with_column_list(columns)
    }
}

/// Extract raw mappings from a statement or statement batch.
///
/// Every discovered source table is paired with every discovered target
/// table; each pair carries the full column list and the statement's
/// transformation type.
pub fn extract_mappings(sql: &str) -> Vec<RawMapping> {
    let sql = preprocess(sql);

    let Some(select_list) = SELECT_SPAN.captures(&sql).and_then(|cap| cap.get(1)) else {
        tracing::debug!("no SELECT ... FROM span found");
        return Vec::new();
    };
    let columns = extract_columns(select_list.as_str());

    let mut sources = captures(&FROM_TABLE, &sql);
    sources.extend(captures(&JOIN_TABLE, &sql));

    let mut targets = captures(&INSERT_TARGET, &sql);
    targets.extend(captures(&CREATE_TARGET, &sql));
    if targets.is_empty() && has_keyword(&sql, "INTO") {
        let into = INTO_TARGET.captures(&sql).and_then(|cap| cap.get(1));
        targets.extend(into.map(|m| m.as_str().to_string()));
    }
    if targets.is_empty() {
        targets.push(UNKNOWN_TARGET.to_string());
    }

    let transformation_type = infer_transformation_type(&sql);

    let mut mappings = Vec::with_capacity(sources.len() * targets.len());
    for source in &sources {
        for target in &targets {
            mappings.push(RawMapping {
                source_table: clean_table_name(source),
                target_table: clean_table_name(target),
                transformation_type,
                columns: columns.clone(),
            });
        }
    }

    tracing::debug!(
        sources = sources.len(),
        targets = targets.len(),
        columns = columns.len(),
        "extracted raw mappings"
    );
    mappings
}

fn extract_columns(select_list: &str) -> Vec<ExtractedColumn> {
    COLUMN_TOKEN
        .captures_iter(select_list)
        .take(MAX_COLUMN_TOKENS)
        .filter(|cap| !CONTROL_KEYWORDS.contains(&&cap[0]))
        .map(|cap| {
            // `qualifier.name` keeps only `name`
            let source = cap.get(2).or_else(|| cap.get(1)).map_or("", |m| m.as_str());
            let target = cap.get(3).map_or(source, |m| m.as_str());
            ExtractedColumn {
                source_column: source.to_string(),
                target_column: target.to_string(),
                data_type: "UNKNOWN",
            }
        })
        .collect()
}

/// Classify a preprocessed statement by the keywords it contains.
pub fn infer_transformation_type(sql: &str) -> TransformationType {
    let select = has_keyword(sql, "SELECT");
    if has_keyword(sql, "INSERT") && select {
        TransformationType::InsertSelect
    } else if has_keyword(sql, "CREATE") && select {
        TransformationType::CreateAsSelect
    } else if has_keyword(sql, "UPDATE") {
        TransformationType::Update
    } else if has_keyword(sql, "DELETE") {
        TransformationType::Delete
    } else if has_keyword(sql, "MERGE") {
        TransformationType::Merge
    } else {
        TransformationType::Select
    }
}

/// Standalone extraction report: the raw mappings plus a summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub analysis_timestamp: String,
    pub sql_content: String,
    pub mappings: Vec<RawMapping>,
    pub summary: LineageSummary,
}

/// Run the extractor and wrap its output in a report.
pub fn analyze(sql: &str) -> ExtractionReport {
    let mappings = extract_mappings(sql);
    let records: Vec<MappingRecord> = mappings.iter().map(RawMapping::to_record).collect();
    ExtractionReport {
        analysis_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        sql_content: excerpt(sql, EXCERPT_CHARS),
        summary: summarize(&records),
        mappings,
    }
}

/// First `max_chars` characters of `text`, with `...` appended when truncated.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
