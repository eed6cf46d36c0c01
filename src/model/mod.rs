//! Core lineage data types.
//!
//! A [`MappingRecord`] is the unit of lineage data: one source→target
//! relationship reported for a single SQL statement, either by the heuristic
//! extractor or by an external oracle.

mod mapping;

pub use mapping::{
    clean_table_name, ColumnMapping, MappingRecord, TransformationType, UNKNOWN_COLUMN,
    UNKNOWN_SOURCE, UNKNOWN_TARGET,
};
