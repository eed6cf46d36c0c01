//! End-to-end runs against a temporary output directory.

use std::fs;
use std::path::Path;

use serde_json::Value;
use sql_lineage::config::PipelineConfig;
use sql_lineage::export::{
    ExportOutcome, COLUMN_LINEAGE_FILE, LINEAGE_JSON_FILE, OBJECT_LINEAGE_FILE,
    ORACLE_DIAGRAM_FILE,
};
use sql_lineage::pipeline::{analyze_oracle_response, analyze_sql, run_batch, PipelineError};
use sql_lineage::render::DiagramFormat;
use tempfile::TempDir;

const SALES_SQL: &str = "INSERT INTO target_schema.sales_summary \
    SELECT c.customer_id, SUM(o.amount) AS total_sales \
    FROM source_schema.customers c \
    JOIN source_schema.orders o ON c.customer_id = o.customer_id";

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_sql_run_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());

    let report = analyze_sql(SALES_SQL, &config).unwrap();
    assert_eq!(report.original_count, 2);
    assert_eq!(report.cleaned_count, 2);
    assert_eq!(report.artifacts().len(), 4);
    assert!(!report.has_warnings());

    let objects = read(dir.path(), OBJECT_LINEAGE_FILE);
    assert_eq!(
        objects,
        "source_table,target_table\r\n\
         SOURCE_SCHEMA.CUSTOMERS,TARGET_SCHEMA.SALES_SUMMARY\r\n\
         SOURCE_SCHEMA.ORDERS,TARGET_SCHEMA.SALES_SUMMARY\r\n"
    );

    let columns = read(dir.path(), COLUMN_LINEAGE_FILE);
    assert_eq!(columns.lines().count(), 3);
    assert!(columns.contains("SOURCE_SCHEMA.CUSTOMERS,Unknown,TARGET_SCHEMA.SALES_SUMMARY,Unknown"));

    let json: Value = serde_json::from_str(&read(dir.path(), LINEAGE_JSON_FILE)).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["connections"].as_array().unwrap().len(), 2);
    assert_eq!(json["graph"]["directed"], true);

    assert!(dir.path().join("data_lineage.drawio").exists());
}

#[test]
fn test_object_rows_are_distinct_pairs() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());
    let response = r#"[
        {"source": "a.x", "target": "b.y", "source_column": "c1", "target_column": "c1"},
        {"source": "a.x", "target": "b.y", "source_column": "c2", "target_column": "c2"},
        {"source": "a.z", "target": "b.y"},
        {"source": "a.x", "target": "b.y"}
    ]"#;

    analyze_oracle_response(response, "", &config).unwrap();

    let objects = read(dir.path(), OBJECT_LINEAGE_FILE);
    assert_eq!(objects, "source_table,target_table\r\na.x,b.y\r\na.z,b.y\r\n");
    let columns = read(dir.path(), COLUMN_LINEAGE_FILE);
    assert_eq!(columns.lines().count(), 5);
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let config = |dir: &TempDir| PipelineConfig::new(dir.path()).with_format(DiagramFormat::Mermaid);

    analyze_sql(SALES_SQL, &config(&first)).unwrap();
    analyze_sql(SALES_SQL, &config(&second)).unwrap();

    for name in [OBJECT_LINEAGE_FILE, COLUMN_LINEAGE_FILE, "data_lineage.mmd"] {
        assert_eq!(read(first.path(), name), read(second.path(), name), "{}", name);
    }

    let strip = |dir: &TempDir| {
        let mut json: Value = serde_json::from_str(&read(dir.path(), LINEAGE_JSON_FILE)).unwrap();
        json["metadata"]["generated_at"] = Value::Null;
        json
    };
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_no_mappings_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());

    let report = analyze_sql("UPDATE t SET a = 1", &config).unwrap();
    assert_eq!(report.export, ExportOutcome::NoMappings);
    assert!(report.has_warnings());
    assert_eq!(file_count(dir.path()), 0);

    let report = analyze_oracle_response(r#"["orders", 42]"#, "", &config).unwrap();
    assert_eq!(report.original_count, 2);
    assert_eq!(report.cleaned_count, 0);
    assert_eq!(file_count(dir.path()), 0);
}

#[test]
fn test_oracle_run_writes_supplied_diagram() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path()).with_format(DiagramFormat::Graphviz);
    let response = "Here is the lineage:\n```json\n{\
        \"mappings\": [{\"source_table\": \"crm.users\", \"target_table\": \"dw.dim_user\"}],\
        \"diagram\": \"<mxfile/>\"\
        }\n```\nDone.";

    let report = analyze_oracle_response(response, "SELECT 1", &config).unwrap();
    assert_eq!(report.cleaned_count, 1);
    assert_eq!(report.artifacts().len(), 5);
    assert_eq!(read(dir.path(), ORACLE_DIAGRAM_FILE), "<mxfile/>");
    assert!(dir.path().join("data_lineage.dot").exists());
}

#[test]
fn test_unparseable_oracle_response_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());
    let response = "I could not determine the lineage, sorry.";

    let err = analyze_oracle_response(response, "", &config).unwrap_err();
    match err {
        PipelineError::Oracle(e) => assert_eq!(e.raw(), response),
        other => panic!("expected oracle error, got {:?}", other),
    }
    assert_eq!(file_count(dir.path()), 0);
}

#[test]
fn test_missing_output_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path().join("missing"));

    let err = analyze_sql(SALES_SQL, &config).unwrap_err();
    assert!(matches!(err, PipelineError::OutputDirMissing(_)));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_batch_last_write_wins() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let first = input.path().join("first.sql");
    let second = input.path().join("second.sql");
    let missing = input.path().join("missing.sql");
    fs::write(&first, "INSERT INTO m.a SELECT x FROM r.one").unwrap();
    fs::write(&second, "INSERT INTO m.b SELECT y FROM r.two").unwrap();

    let config = PipelineConfig::new(out.path());
    let items = run_batch(&[&first, &missing, &second], &config).unwrap();

    assert_eq!(items.len(), 3);
    assert!(items[0].result.is_ok());
    assert!(matches!(items[1].result, Err(PipelineError::ReadSql { .. })));
    assert!(items[2].result.is_ok());
    assert_eq!(
        read(out.path(), OBJECT_LINEAGE_FILE),
        "source_table,target_table\r\nR.TWO,M.B\r\n"
    );
}
