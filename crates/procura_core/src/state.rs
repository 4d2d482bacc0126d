use crate::classify::classify;
use crate::phase::{PhaseTracker, WorkflowPhase};
use crate::projection::{apply, StreamProjection};
use crate::view_model::{format_amount, AppViewModel, ExportStatus};

/// Use cases the procurement service knows how to scout for.
pub const USE_CASES: &[&str] = &[
    "3d-modeling",
    "ai-ml",
    "architecture",
    "business-travel",
    "chrome-os",
    "consulting",
    "data-science",
    "design",
    "education",
    "executive-use",
    "game-development",
    "gaming",
    "light-productivity",
    "music-production",
    "office-work",
    "presentations",
    "remote-work",
    "software-development",
    "video-editing",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProcurementRequest {
    pub use_case: String,
    pub quantity: u32,
    pub max_budget_per_unit: f64,
    pub min_ram_gb: Option<u32>,
    pub min_storage_gb: Option<u32>,
    pub preferred_brand: Option<String>,
    pub prefer_performance: bool,
}

impl ProcurementRequest {
    pub fn new(use_case: impl Into<String>, quantity: u32, max_budget_per_unit: f64) -> Self {
        Self {
            use_case: use_case.into(),
            quantity,
            max_budget_per_unit,
            min_ram_gb: None,
            min_storage_gb: None,
            preferred_brand: None,
            prefer_performance: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Streaming,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    request_id: Option<String>,
    quantity: u32,
    projection: StreamProjection,
    phase: PhaseTracker,
    last_export: Option<ExportStatus>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn projection(&self) -> &StreamProjection {
        &self.projection
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase.phase()
    }

    pub fn view(&self) -> AppViewModel {
        let projection = &self.projection;
        let status_label = if projection.completed {
            "Completed"
        } else if self.request_id.is_some() {
            "In progress"
        } else {
            "—"
        };
        AppViewModel {
            session: self.session,
            request_id: self.request_id.clone(),
            quantity: self.quantity,
            messages: projection.messages.clone(),
            selected_model: projection.selected_model.clone(),
            scout_candidates: projection
                .scout_count
                .map_or_else(|| "—".to_string(), |count| count.to_string()),
            final_price: projection
                .final_price
                .map_or_else(|| "—".to_string(), |price| format!("${}", format_amount(price))),
            total_cost: projection.final_price.map_or_else(
                || "—".to_string(),
                |price| format!("${}", format_amount(price * f64::from(self.quantity))),
            ),
            status_label: status_label.to_string(),
            phase: self.phase.phase(),
            pills: crate::phase::pill_states(self.phase.phase()),
            export_enabled: self.export_ready(),
            is_streaming: self.session == SessionState::Streaming,
            last_export: self.last_export.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_submission(&mut self, quantity: u32) {
        self.session = SessionState::Submitting;
        self.request_id = None;
        self.quantity = quantity;
        self.projection = StreamProjection::new();
        self.phase.reset();
        self.last_export = None;
        self.mark_dirty();
    }

    pub(crate) fn accept_request(&mut self, request_id: String) {
        self.projection
            .push_notice(format!("Request Started: {request_id}"));
        self.request_id = Some(request_id);
        self.session = SessionState::Streaming;
        self.refresh_phase();
        self.mark_dirty();
    }

    /// Move to `Ended`, recording why in the display log.
    pub(crate) fn end_session(&mut self, notice: impl Into<String>) {
        self.projection.push_notice(notice);
        self.session = SessionState::Ended;
        self.refresh_phase();
        self.mark_dirty();
    }

    pub(crate) fn is_current_stream(&self, request_id: &str) -> bool {
        self.session == SessionState::Streaming && self.request_id.as_deref() == Some(request_id)
    }

    pub(crate) fn apply_line(&mut self, line: &str) {
        let event = classify(line);
        let projection = std::mem::take(&mut self.projection);
        self.projection = apply(projection, event);
        self.refresh_phase();
        self.mark_dirty();
    }

    pub(crate) fn export_ready(&self) -> bool {
        self.projection.completed && self.projection.final_price.is_some()
    }

    pub(crate) fn purchase_order_draft(&self) -> Option<crate::PurchaseOrderDraft> {
        if !self.projection.completed {
            return None;
        }
        let unit_price = self.projection.final_price?;
        Some(crate::PurchaseOrderDraft {
            model: self.projection.selected_model.clone(),
            quantity: self.quantity,
            unit_price,
            request_id: self.request_id.clone(),
        })
    }

    pub(crate) fn record_export(&mut self, status: ExportStatus) {
        self.last_export = Some(status);
        self.mark_dirty();
    }

    fn refresh_phase(&mut self) {
        let has_active_request = self.request_id.is_some();
        self.phase
            .observe(&self.projection.messages, has_active_request);
    }
}
