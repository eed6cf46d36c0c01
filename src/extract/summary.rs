//! Aggregate statistics over a set of mappings.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{MappingRecord, TransformationType};

/// Summary of a mapping set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineageSummary {
    pub total_mappings: usize,
    pub source_tables: Vec<String>,
    pub target_tables: Vec<String>,
    pub transformation_types: BTreeMap<TransformationType, usize>,
    pub total_columns: usize,
}

/// Summarise mappings: distinct tables (sorted), per-type counts and column totals.
pub fn summarize(records: &[MappingRecord]) -> LineageSummary {
    let mut sources = BTreeSet::new();
    let mut targets = BTreeSet::new();
    let mut types = BTreeMap::new();
    let mut total_columns = 0;

    for record in records {
        sources.insert(record.source_table.clone());
        targets.insert(record.target_table.clone());
        *types.entry(record.transformation_type).or_insert(0) += 1;
        total_columns += record.columns.len();
    }

    LineageSummary {
        total_mappings: records.len(),
        source_tables: sources.into_iter().collect(),
        target_tables: targets.into_iter().collect(),
        transformation_types: types,
        total_columns,
    }
}
