use crate::{PhasePill, SessionState, WorkflowPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Written { path: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub request_id: Option<String>,
    pub quantity: u32,
    pub messages: Vec<String>,
    pub selected_model: Option<String>,
    pub scout_candidates: String,
    pub final_price: String,
    pub total_cost: String,
    pub status_label: String,
    pub phase: WorkflowPhase,
    pub pills: Vec<PhasePill>,
    pub export_enabled: bool,
    pub is_streaming: bool,
    pub last_export: Option<ExportStatus>,
    pub dirty: bool,
}

/// Format an amount the way an en-US locale does: grouped thousands, at most
/// three fraction digits, no trailing zeros.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
