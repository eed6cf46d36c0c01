//! Integration tests for the mapping normalizer.

use serde_json::{json, Value};
use sql_lineage::extract::extract_mappings;
use sql_lineage::model::{TransformationType, UNKNOWN_COLUMN, UNKNOWN_TARGET};
use sql_lineage::normalize::{normalize, DropReason};

#[test]
fn test_alternate_key_resolution() {
    let out = normalize(vec![json!({"from_table": "a.b", "to_table": "c.d"})]);
    assert_eq!(out.cleaned_count(), 1);
    assert_eq!(out.records[0].source_table, "a.b");
    assert_eq!(out.records[0].target_table, "c.d");
}

#[test]
fn test_non_record_shapes_always_dropped() {
    let junk = vec![json!(null), json!(1.5), json!(false), json!([["a.b"]]), json!("plain")];
    for entry in junk {
        let input = vec![json!({"source": "s", "target": "t"}), entry.clone()];
        let out = normalize(input);
        assert_eq!(out.original_count, 2);
        assert_eq!(out.cleaned_count(), 1, "entry {} should be dropped", entry);
    }
}

#[test]
fn test_dotted_strings_always_promoted() {
    for name in ["a.b", "db.schema.table", "x.y-z", "[dbo].[t]"] {
        let out = normalize(vec![Value::String(name.to_string())]);
        assert_eq!(out.cleaned_count(), 1, "{} should be promoted", name);
        let record = &out.records[0];
        assert!(!record.source_table.is_empty());
        assert_eq!(record.target_table, UNKNOWN_TARGET);
        assert_eq!(record.source_column, UNKNOWN_COLUMN);
    }
}

#[test]
fn test_drop_reasons_are_reported() {
    let out = normalize(vec![json!("orders"), json!({"logic": "x"}), json!(7)]);
    let reasons: Vec<_> = out.dropped.iter().map(|d| d.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            DropReason::UnqualifiedString("orders".to_string()),
            DropReason::MissingTables,
            DropReason::UnsupportedShape("number"),
        ]
    );
    assert!(out.is_empty());
}

#[test]
fn test_extractor_output_round_trips_through_normalizer() {
    let sql = "INSERT INTO mart.t SELECT s.a AS b FROM raw.s";
    let entries: Vec<Value> = extract_mappings(sql).iter().map(|m| m.to_entry()).collect();
    let out = normalize(entries);

    assert_eq!(out.cleaned_count(), 1);
    let record = &out.records[0];
    assert_eq!(record.source_table, "RAW.S");
    assert_eq!(record.target_table, "MART.T");
    assert_eq!(record.transformation_type, TransformationType::InsertSelect);
    assert_eq!(record.columns.len(), 1);
    assert_eq!(record.columns[0].source_column, "A");
    assert_eq!(record.columns[0].target_column, "B");
    assert_eq!(record.source_column, "");
}

#[test]
fn test_oracle_style_records() {
    let out = normalize(vec![
        json!({
            "source_table": "CRM.CUSTOMERS",
            "source_column": "EMAIL",
            "target_table": "DW.DIM_CUSTOMER",
            "target_column": "EMAIL_ADDRESS",
            "transformation": "LOWER(EMAIL)"
        }),
        json!({"source": "CRM.ORDERS", "target": "DW.FACT_ORDERS", "description": null}),
    ]);
    assert_eq!(out.cleaned_count(), 2);
    assert_eq!(out.records[0].transformation_logic, "LOWER(EMAIL)");
    assert_eq!(out.records[1].transformation_logic, "");
}
