//! Object-level and column-level lineage CSV.
//!
//! Rows end with `\r\n`; a field containing a comma, quote or line break is
//! quoted with inner quotes doubled.

use std::collections::HashSet;

use crate::model::MappingRecord;

pub const OBJECT_HEADER: [&str; 2] = ["source_table", "target_table"];

pub const COLUMN_HEADER: [&str; 4] = [
    "source_table",
    "source_column",
    "target_table",
    "target_column",
];

/// Placeholder for fields that resolve to empty.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Distinct `(source_table, target_table)` pairs in first-seen order.
pub fn object_rows(records: &[MappingRecord]) -> Vec<(&str, &str)> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| (r.source_table.as_str(), r.target_table.as_str()))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// One row per record, empty fields replaced by [`UNKNOWN_FIELD`].
pub fn column_rows(records: &[MappingRecord]) -> Vec<[&str; 4]> {
    records
        .iter()
        .map(|r| {
            [
                or_unknown(&r.source_table),
                or_unknown(&r.source_column),
                or_unknown(&r.target_table),
                or_unknown(&r.target_column),
            ]
        })
        .collect()
}

pub fn object_lineage_csv(records: &[MappingRecord]) -> String {
    let mut out = String::new();
    write_row(&mut out, &OBJECT_HEADER);
    for (source, target) in object_rows(records) {
        write_row(&mut out, &[source, target]);
    }
    out
}

pub fn column_lineage_csv(records: &[MappingRecord]) -> String {
    let mut out = String::new();
    write_row(&mut out, &COLUMN_HEADER);
    for row in column_rows(records) {
        write_row(&mut out, &row);
    }
    out
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() {
        UNKNOWN_FIELD
    } else {
        s
    }
}

fn write_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

/// Quote a CSV field when needed.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
