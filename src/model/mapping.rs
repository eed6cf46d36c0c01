//! Mapping records: the unit of lineage data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target placeholder used when a statement has no discoverable target.
pub const UNKNOWN_TARGET: &str = "UNKNOWN_TARGET";

/// Source placeholder used when a record only names its target.
pub const UNKNOWN_SOURCE: &str = "UNKNOWN_SOURCE";

/// Column placeholder for records promoted from bare identifiers.
pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";

/// Coarse classification of the SQL operation that produced a mapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationType {
    InsertSelect,
    CreateAsSelect,
    Update,
    Delete,
    Merge,
    Select,
    #[default]
    Unknown,
}

impl TransformationType {
    /// All variants in declaration order.
    pub const ALL: [TransformationType; 7] = [
        TransformationType::InsertSelect,
        TransformationType::CreateAsSelect,
        TransformationType::Update,
        TransformationType::Delete,
        TransformationType::Merge,
        TransformationType::Select,
        TransformationType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationType::InsertSelect => "INSERT_SELECT",
            TransformationType::CreateAsSelect => "CREATE_AS_SELECT",
            TransformationType::Update => "UPDATE",
            TransformationType::Delete => "DELETE",
            TransformationType::Merge => "MERGE",
            TransformationType::Select => "SELECT",
            TransformationType::Unknown => "UNKNOWN",
        }
    }

    /// Lenient conversion used for untrusted input; unrecognised text maps to `Unknown`.
    pub fn from_loose(s: &str) -> Self {
        s.parse().unwrap_or(TransformationType::Unknown)
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        TransformationType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown transformation type: {}", s))
    }
}

/// A single column pair carried by a statement-level mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target_column: String,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_column: source.into(),
            target_column: target.into(),
        }
    }
}

/// One source→target relationship for a single SQL statement.
///
/// A validated record always has non-empty `source_table` and `target_table`.
/// Empty column strings mean "table-level only".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub transformation_type: TransformationType,
    pub transformation_logic: String,
    /// Column pairs observed for the whole statement (heuristic extractor output).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnMapping>,
}

impl MappingRecord {
    /// Create a table-level record with no column or transformation detail.
    pub fn new(source_table: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: String::new(),
            target_table: target_table.into(),
            target_column: String::new(),
            transformation_type: TransformationType::Unknown,
            transformation_logic: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns(
        mut self,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        self.source_column = source_column.into();
        self.target_column = target_column.into();
        self
    }

    pub fn with_type(mut self, transformation_type: TransformationType) -> Self {
        self.transformation_type = transformation_type;
        self
    }

    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.transformation_logic = logic.into();
        self
    }

    pub fn with_column_list(mut self, columns: Vec<ColumnMapping>) -> Self {
        self.columns = columns;
        self
    }

    /// Text attached to the connection built from this record.
    ///
    /// Explicit logic wins; otherwise the transformation type name, unless unknown.
    pub fn transformation_text(&self) -> &str {
        if !self.transformation_logic.is_empty() {
            &self.transformation_logic
        } else if self.transformation_type != TransformationType::Unknown {
            self.transformation_type.as_str()
        } else {
            ""
        }
    }

    /// `table.column`, or the bare table name when the column is empty.
    pub fn qualified_source(&self) -> String {
        qualify(&self.source_table, &self.source_column)
    }

    pub fn qualified_target(&self) -> String {
        qualify(&self.target_table, &self.target_column)
    }
}

fn qualify(table: &str, column: &str) -> String {
    if column.is_empty() {
        table.to_string()
    } else {
        format!("{}.{}", table, column)
    }
}

/// Strip identifier delimiters (backticks, double quotes, brackets) and whitespace.
pub fn clean_table_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '`' | '"' | '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}
