//! Ordered alias keys for each logical mapping field.

use serde_json::{Map, Value};

/// A logical field and the key names accepted for it, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub field: &'static str,
    pub candidates: &'static [&'static str],
}

pub const SOURCE_TABLE: FieldKeys = FieldKeys {
    field: "source_table",
    candidates: &["source_table", "source", "from_table"],
};

pub const SOURCE_COLUMN: FieldKeys = FieldKeys {
    field: "source_column",
    candidates: &["source_column", "source_col", "from_column"],
};

pub const TARGET_TABLE: FieldKeys = FieldKeys {
    field: "target_table",
    candidates: &["target_table", "target", "to_table"],
};

pub const TARGET_COLUMN: FieldKeys = FieldKeys {
    field: "target_column",
    candidates: &["target_column", "target_col", "to_column"],
};

pub const TRANSFORMATION_LOGIC: FieldKeys = FieldKeys {
    field: "transformation_logic",
    candidates: &["transformation", "transformation_logic", "logic", "description"],
};

pub const TRANSFORMATION_TYPE: FieldKeys = FieldKeys {
    field: "transformation_type",
    candidates: &["transformation_type", "operation", "type"],
};

pub const COLUMNS: FieldKeys = FieldKeys {
    field: "columns",
    candidates: &["columns", "column_mappings"],
};

impl FieldKeys {
    /// The first candidate key present with a non-null value.
    pub fn lookup<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null())
    }

    /// Resolve to text. Scalars are stringified; empty text and structured
    /// values count as missing.
    pub fn resolve_text(&self, record: &Map<String, Value>) -> Option<String> {
        let text = match self.lookup(record)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                tracing::warn!(field = self.field, value = %other, "ignoring non-scalar field value");
                return None;
            }
        };
        (!text.is_empty()).then_some(text)
    }
}
