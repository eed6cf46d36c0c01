//! Mapping normalizer and validator.
//!
//! The single trust boundary of the pipeline. Entries from the heuristic
//! extractor and from an external oracle arrive here as arbitrary JSON and
//! leave as validated [`MappingRecord`]s:
//!
//! - keyed records have each field resolved through an ordered list of alias
//!   keys (see [`keys`]);
//! - a bare string containing `.` is promoted to a minimal record;
//! - anything else is dropped with a warning.
//!
//! Normalization never fails; it only shrinks the input.

pub mod keys;

use serde_json::{Map, Value};

use crate::model::{
    clean_table_name, ColumnMapping, MappingRecord, TransformationType, UNKNOWN_COLUMN,
    UNKNOWN_SOURCE, UNKNOWN_TARGET,
};

use keys::{
    FieldKeys, COLUMNS, SOURCE_COLUMN, SOURCE_TABLE, TARGET_COLUMN, TARGET_TABLE,
    TRANSFORMATION_LOGIC, TRANSFORMATION_TYPE,
};

/// Why an entry was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// A bare string without a `.` separator.
    UnqualifiedString(String),
    /// Neither a keyed record nor a string.
    UnsupportedShape(&'static str),
    /// A keyed record with no resolvable source or target table.
    MissingTables,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::UnqualifiedString(s) => {
                write!(f, "bare identifier '{}' is not schema-qualified", s)
            }
            DropReason::UnsupportedShape(kind) => write!(f, "unsupported entry shape: {}", kind),
            DropReason::MissingTables => write!(f, "no source or target table"),
        }
    }
}

/// A dropped entry with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEntry {
    pub index: usize,
    pub reason: DropReason,
}

/// Output of a normalization pass.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<MappingRecord>,
    pub original_count: usize,
    pub dropped: Vec<DroppedEntry>,
}

impl Normalized {
    pub fn cleaned_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalize an ordered sequence of arbitrary entries, preserving order.
pub fn normalize<I>(entries: I) -> Normalized
where
    I: IntoIterator<Item = Value>,
{
    let mut out = Normalized::default();

    for (index, entry) in entries.into_iter().enumerate() {
        out.original_count += 1;
        match normalize_entry(&entry) {
            Ok(record) => out.records.push(record),
            Err(reason) => {
                tracing::warn!(index, entry = %entry, %reason, "dropping mapping entry");
                out.dropped.push(DroppedEntry { index, reason });
            }
        }
    }

    tracing::info!(
        original = out.original_count,
        cleaned = out.cleaned_count(),
        "normalized mapping entries"
    );
    out
}

/// Normalize a single entry.
pub fn normalize_entry(entry: &Value) -> Result<MappingRecord, DropReason> {
    match entry {
        Value::Object(record) => normalize_record(record),
        Value::String(s) => promote_identifier(s),
        Value::Null => Err(DropReason::UnsupportedShape("null")),
        Value::Bool(_) => Err(DropReason::UnsupportedShape("boolean")),
        Value::Number(_) => Err(DropReason::UnsupportedShape("number")),
        Value::Array(_) => Err(DropReason::UnsupportedShape("array")),
    }
}

fn promote_identifier(s: &str) -> Result<MappingRecord, DropReason> {
    let name = clean_table_name(s);
    if !name.contains('.') || name.split('.').all(|part| part.trim().is_empty()) {
        return Err(DropReason::UnqualifiedString(s.to_string()));
    }
    Ok(MappingRecord::new(name, UNKNOWN_TARGET).with_columns(UNKNOWN_COLUMN, UNKNOWN_COLUMN))
}

fn normalize_record(record: &Map<String, Value>) -> Result<MappingRecord, DropReason> {
    // Delimiter-only values such as `[]` clean to nothing and count as missing
    let table = |keys: &FieldKeys| {
        keys.resolve_text(record)
            .map(|t| clean_table_name(&t))
            .filter(|t| !t.is_empty())
    };

    let (source_table, target_table) = match (table(&SOURCE_TABLE), table(&TARGET_TABLE)) {
        (None, None) => return Err(DropReason::MissingTables),
        (Some(source), None) => {
            tracing::warn!(source = %source, "mapping has no target table, using placeholder");
            (source, UNKNOWN_TARGET.to_string())
        }
        (None, Some(target)) => {
            tracing::warn!(target = %target, "mapping has no source table, using placeholder");
            (UNKNOWN_SOURCE.to_string(), target)
        }
        (Some(source), Some(target)) => (source, target),
    };

    let transformation_type = TRANSFORMATION_TYPE
        .resolve_text(record)
        .map(|t| TransformationType::from_loose(&t))
        .unwrap_or_default();

    Ok(MappingRecord {
        source_table,
        source_column: SOURCE_COLUMN.resolve_text(record).unwrap_or_default(),
        target_table,
        target_column: TARGET_COLUMN.resolve_text(record).unwrap_or_default(),
        transformation_type,
        transformation_logic: TRANSFORMATION_LOGIC.resolve_text(record).unwrap_or_default(),
        columns: resolve_columns(record),
    })
}

/// Column pairs from a nested `columns` list; malformed items are skipped.
fn resolve_columns(record: &Map<String, Value>) -> Vec<ColumnMapping> {
    let Some(Value::Array(items)) = COLUMNS.lookup(record) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(column) => {
                let source = SOURCE_COLUMN.resolve_text(column);
                let target = TARGET_COLUMN.resolve_text(column);
                match (source, target) {
                    (Some(s), Some(t)) => Some(ColumnMapping::new(s, t)),
                    (Some(s), None) => Some(ColumnMapping::new(s.clone(), s)),
                    (None, Some(t)) => Some(ColumnMapping::new(t.clone(), t)),
                    (None, None) => None,
                }
            }
            Value::String(name) if !name.trim().is_empty() => {
                Some(ColumnMapping::new(name.trim(), name.trim()))
            }
            _ => None,
        })
        .collect()
}
