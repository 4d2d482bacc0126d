//! Purchase order export: a fixed-layout, paginated text document plus a
//! JSON manifest next to it.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use procura_core::format_amount;
use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};

pub const PAGE_WIDTH: usize = 72;
pub const PAGE_LINES: usize = 56;
const MODEL_COLUMN: usize = 32;
const QTY_COLUMN: usize = 10;
const UNIT_COLUMN: usize = 18;
const TOTALS_INDENT: usize = 48;
const PLACEHOLDER_MODEL: &str = "Selected Model";

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub model: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub request_id: Option<String>,
    pub vendor: String,
    pub ship_to: String,
    pub issued_on: String,
}

impl PurchaseOrder {
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub document_path: PathBuf,
    pub manifest_path: PathBuf,
    pub pages: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("manifest encoding failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Render the order as pages of at most [`PAGE_LINES`] lines separated by
/// form feeds, each ending with a `Page n of m` footer.
pub fn render_purchase_order(order: &PurchaseOrder) -> String {
    let pages = paginate(&body_lines(order));
    let count = pages.len();
    let mut out = String::new();
    for (index, page) in pages.into_iter().enumerate() {
        if index > 0 {
            out.push('\u{c}');
        }
        for line in &page {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&right_align(&format!("Page {} of {}", index + 1, count)));
        out.push('\n');
    }
    out
}

/// Write `PO-<reference>.txt` and `PO-<reference>.json` into `dir`.
pub fn write_purchase_order(dir: &Path, order: &PurchaseOrder) -> Result<ExportSummary, ExportError> {
    let stem = format!("PO-{}", file_reference(order.request_id.as_deref()));
    let document = render_purchase_order(order);
    let pages = document.matches('\u{c}').count() + 1;

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let document_path = writer.write(&format!("{stem}.txt"), &document)?;

    let manifest = json!({
        "document": document_path.file_name().map(|n| n.to_string_lossy().into_owned()),
        "model": order.model.as_deref().unwrap_or(PLACEHOLDER_MODEL),
        "quantity": order.quantity,
        "unit_price": order.unit_price,
        "total": order.total(),
        "request_id": order.request_id,
        "vendor": order.vendor,
        "ship_to": order.ship_to,
        "issued_on": order.issued_on,
        "pages": pages,
    });
    let manifest_path = writer.write(
        &format!("{stem}.json"),
        &serde_json::to_string_pretty(&manifest)?,
    )?;

    Ok(ExportSummary {
        document_path,
        manifest_path,
        pages,
    })
}

fn body_lines(order: &PurchaseOrder) -> Vec<String> {
    let rule = "-".repeat(PAGE_WIDTH);
    let total = format!("${}", format_amount(order.total()));
    let mut lines = vec![
        "PURCHASE ORDER (PO)".to_string(),
        "Multi-Agent Procurement System".to_string(),
        String::new(),
        two_columns(
            &format!("Vendor: {}", order.vendor),
            &format!("PO Date: {}", order.issued_on),
        ),
        format!("Ship To: {}", order.ship_to),
    ];
    if let Some(reference) = &order.request_id {
        lines.push(format!("Reference: {reference}"));
    }
    lines.push(rule.clone());
    lines.push(String::new());
    lines.push(table_row("Model", "Qty", "Unit Price", "Total"));
    lines.push(rule);

    let model = order.model.as_deref().unwrap_or(PLACEHOLDER_MODEL);
    let wrapped = wrap(model, MODEL_COLUMN - 2);
    for (i, chunk) in wrapped.iter().enumerate() {
        if i == 0 {
            lines.push(table_row(
                chunk,
                &order.quantity.to_string(),
                &format!("${}", format_amount(order.unit_price)),
                &total,
            ));
        } else {
            lines.push(chunk.clone());
        }
    }

    lines.push(String::new());
    lines.push(String::new());
    lines.push(indent_totals(&format!("Subtotal:  {total}")));
    lines.push(indent_totals("Taxes (optional):  —"));
    lines.push(indent_totals(&format!("Total Due:  {total}")));
    lines.push(String::new());
    lines.push(String::new());
    lines.push(String::new());
    lines.push(format!(
        "Authorized By: {}     Date: {}",
        "_".repeat(20),
        "_".repeat(10)
    ));
    lines
}

fn paginate(lines: &[String]) -> Vec<Vec<String>> {
    // Two lines per page are reserved for the footer.
    let per_page = PAGE_LINES - 2;
    if lines.is_empty() {
        return vec![Vec::new()];
    }
    lines.chunks(per_page).map(<[String]>::to_vec).collect()
}

fn table_row(model: &str, qty: &str, unit: &str, total: &str) -> String {
    format!(
        "{}{}{}{}",
        pad(model, MODEL_COLUMN),
        pad(qty, QTY_COLUMN),
        pad(unit, UNIT_COLUMN),
        total
    )
}

fn two_columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = PAGE_WIDTH.saturating_sub(used).max(2);
    format!("{left}{}{right}", " ".repeat(gap))
}

fn indent_totals(text: &str) -> String {
    format!("{}{text}", " ".repeat(TOTALS_INDENT))
}

fn right_align(text: &str) -> String {
    let width = text.chars().count();
    format!("{}{text}", " ".repeat(PAGE_WIDTH.saturating_sub(width)))
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        format!("{text} ")
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn file_reference(request_id: Option<&str>) -> String {
    match request_id {
        Some(id) if !id.trim().is_empty() => id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        _ => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default()
            .to_string(),
    }
}
