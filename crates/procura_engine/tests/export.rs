use std::fs;

use procura_engine::{
    render_purchase_order, write_purchase_order, PurchaseOrder, PAGE_LINES, PAGE_WIDTH,
};
use tempfile::TempDir;

fn order() -> PurchaseOrder {
    PurchaseOrder {
        model: Some("ASUS ProArt P16".to_string()),
        quantity: 5,
        unit_price: 1299.99,
        request_id: Some("req-42".to_string()),
        vendor: "Tech Company R US".to_string(),
        ship_to: "Cendral AI".to_string(),
        issued_on: "2025-11-02".to_string(),
    }
}

#[test]
fn document_contains_header_table_and_totals() {
    let doc = render_purchase_order(&order());

    assert!(doc.starts_with("PURCHASE ORDER (PO)\nMulti-Agent Procurement System\n"));
    assert!(doc.contains("Vendor: Tech Company R US"));
    assert!(doc.contains("PO Date: 2025-11-02"));
    assert!(doc.contains("Ship To: Cendral AI"));
    assert!(doc.contains("Reference: req-42"));

    let row = doc
        .lines()
        .find(|line| line.starts_with("ASUS ProArt P16"))
        .expect("table row");
    let cells: Vec<_> = row.split_whitespace().collect();
    assert_eq!(cells, vec!["ASUS", "ProArt", "P16", "5", "$1,299.99", "$6,499.95"]);

    assert!(doc.contains("Subtotal:  $6,499.95"));
    assert!(doc.contains("Taxes (optional):  —"));
    assert!(doc.contains("Total Due:  $6,499.95"));
    assert!(doc.contains("Authorized By:"));
    assert!(doc.trim_end().ends_with("Page 1 of 1"));
}

#[test]
fn missing_model_and_reference_use_placeholders() {
    let order = PurchaseOrder {
        model: None,
        request_id: None,
        ..order()
    };
    let doc = render_purchase_order(&order);
    assert!(doc.lines().any(|line| line.starts_with("Selected Model")));
    assert!(!doc.contains("Reference:"));
}

#[test]
fn long_model_names_wrap_and_lines_fit_the_page() {
    let order = PurchaseOrder {
        model: Some("Lenovo ThinkPad P1 Gen 7 Mobile Workstation with RTX 4090 Laptop GPU".into()),
        ..order()
    };
    let doc = render_purchase_order(&order);
    for line in doc.lines() {
        assert!(line.chars().count() <= PAGE_WIDTH, "too wide: {line:?}");
    }
    assert!(doc.lines().count() <= PAGE_LINES);
    assert!(doc.contains("Mobile Workstation"));
}

#[test]
fn writes_document_and_manifest() {
    let temp = TempDir::new().unwrap();
    let summary = write_purchase_order(temp.path(), &order()).expect("export ok");

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.document_path, temp.path().join("PO-req-42.txt"));
    assert_eq!(summary.manifest_path, temp.path().join("PO-req-42.json"));

    let document = fs::read_to_string(&summary.document_path).unwrap();
    assert_eq!(document, render_purchase_order(&order()));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["model"], "ASUS ProArt P16");
    assert_eq!(manifest["quantity"], 5);
    assert_eq!(manifest["request_id"], "req-42");
    assert_eq!(manifest["document"], "PO-req-42.txt");
}

#[test]
fn request_ids_are_made_filename_safe() {
    let temp = TempDir::new().unwrap();
    let order = PurchaseOrder {
        request_id: Some("../evil id".to_string()),
        ..order()
    };
    let summary = write_purchase_order(temp.path(), &order).expect("export ok");
    assert_eq!(summary.document_path, temp.path().join("PO-___evil_id.txt"));
}
