//! Integration tests for the heuristic SQL extractor.

use sql_lineage::extract::{analyze, extract_mappings, RawMapping};
use sql_lineage::model::{TransformationType, UNKNOWN_TARGET};

const FACT_ORDERS_SQL: &str = r#"
    INSERT INTO sales.fact_orders
    SELECT
        c.customer_id,
        c.customer_name,
        o.order_id,
        o.order_date,
        p.product_name,
        oi.quantity,
        oi.unit_price * oi.quantity as total_amount
    FROM customers.customers c
    INNER JOIN orders.orders o ON c.customer_id = o.customer_id
    INNER JOIN orders.order_items oi ON o.order_id = oi.order_id
    INNER JOIN products.products p ON oi.product_id = p.product_id
    WHERE o.order_date >= '2024-01-01'
"#;

fn pairs(mappings: &[RawMapping]) -> Vec<(&str, &str)> {
    mappings
        .iter()
        .map(|m| (m.source_table.as_str(), m.target_table.as_str()))
        .collect()
}

// ============================================================================
// Table Discovery
// ============================================================================

#[test]
fn test_insert_select_with_joins() {
    let sql = "INSERT INTO target_schema.fact_sales SELECT c.customer_id, p.product_name \
               FROM source_schema.customers c INNER JOIN source_schema.products p ON c.id = p.id";
    let mappings = extract_mappings(sql);

    assert_eq!(
        pairs(&mappings),
        vec![
            ("SOURCE_SCHEMA.CUSTOMERS", "TARGET_SCHEMA.FACT_SALES"),
            ("SOURCE_SCHEMA.PRODUCTS", "TARGET_SCHEMA.FACT_SALES"),
        ]
    );
    assert!(mappings
        .iter()
        .all(|m| m.transformation_type == TransformationType::InsertSelect));
}

#[test]
fn test_every_source_paired_with_every_target() {
    let mappings = extract_mappings(FACT_ORDERS_SQL);
    assert_eq!(
        pairs(&mappings),
        vec![
            ("CUSTOMERS.CUSTOMERS", "SALES.FACT_ORDERS"),
            ("ORDERS.ORDERS", "SALES.FACT_ORDERS"),
            ("ORDERS.ORDER_ITEMS", "SALES.FACT_ORDERS"),
            ("PRODUCTS.PRODUCTS", "SALES.FACT_ORDERS"),
        ]
    );
}

#[test]
fn test_create_table_as_select() {
    let sql = "create table if not exists mart.daily as select d.day from stage.days d";
    let mappings = extract_mappings(sql);
    assert_eq!(pairs(&mappings), vec![("STAGE.DAYS", "MART.DAILY")]);
    assert_eq!(mappings[0].transformation_type, TransformationType::CreateAsSelect);
}

#[test]
fn test_comments_are_ignored() {
    let sql = r#"
        -- FROM commented.out
        /* JOIN also.commented
           INSERT INTO never.used */
        SELECT a FROM real.source
    "#;
    assert_eq!(
        pairs(&extract_mappings(sql)),
        vec![("REAL.SOURCE", UNKNOWN_TARGET)]
    );
}

#[test]
fn test_delimiters_are_cleaned() {
    let sql = "INSERT INTO [dw].[facts] SELECT x FROM `raw`.`events`";
    assert_eq!(pairs(&extract_mappings(sql)), vec![("RAW.EVENTS", "DW.FACTS")]);
}

#[test]
fn test_unparseable_statement_is_empty_not_error() {
    assert!(extract_mappings("DROP TABLE foo").is_empty());
    assert!(extract_mappings("SELECT 1").is_empty());
    assert!(extract_mappings(";;;").is_empty());
}

// ============================================================================
// Column Discovery
// ============================================================================

#[test]
fn test_columns_from_first_select_only() {
    let mappings = extract_mappings(FACT_ORDERS_SQL);
    let columns: Vec<_> = mappings[0]
        .columns
        .iter()
        .map(|c| (c.source_column.as_str(), c.target_column.as_str()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("CUSTOMER_ID", "CUSTOMER_ID"),
            ("CUSTOMER_NAME", "CUSTOMER_NAME"),
            ("ORDER_ID", "ORDER_ID"),
            ("ORDER_DATE", "ORDER_DATE"),
            ("PRODUCT_NAME", "PRODUCT_NAME"),
            ("QUANTITY", "QUANTITY"),
            ("UNIT_PRICE", "UNIT_PRICE"),
            ("QUANTITY", "TOTAL_AMOUNT"),
        ]
    );
    // Every mapping carries the same list
    assert!(mappings.iter().all(|m| m.columns == mappings[0].columns));
}

#[test]
fn test_nested_select_not_recursed() {
    let sql = "INSERT INTO t SELECT a FROM (SELECT b FROM inner_src) x JOIN other o ON 1=1";
    let mappings = extract_mappings(sql);
    let columns: Vec<_> = mappings[0]
        .columns
        .iter()
        .map(|c| c.source_column.as_str())
        .collect();
    assert_eq!(columns, vec!["A"]);
}

// ============================================================================
// Extraction Report
// ============================================================================

#[test]
fn test_analyze_report() {
    let report = analyze(FACT_ORDERS_SQL);

    assert_eq!(report.mappings.len(), 4);
    assert_eq!(report.summary.total_mappings, 4);
    assert_eq!(report.summary.target_tables, vec!["SALES.FACT_ORDERS"]);
    assert_eq!(report.summary.source_tables.len(), 4);
    assert_eq!(report.summary.total_columns, 32);
    assert!(report.sql_content.contains("INSERT INTO sales.fact_orders"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mappings"][0]["transformation_type"], "INSERT_SELECT");
    assert_eq!(json["mappings"][0]["columns"][0]["data_type"], "UNKNOWN");
    assert_eq!(json["summary"]["transformation_types"]["INSERT_SELECT"], 4);
}

#[test]
fn test_analyze_truncates_long_sql() {
    let sql = format!("SELECT a FROM b WHERE x IN ({})", "1, ".repeat(300));
    let report = analyze(&sql);
    assert!(report.sql_content.ends_with("..."));
    assert_eq!(report.sql_content.chars().count(), 503);
}
