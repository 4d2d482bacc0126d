//! Procura core: stream line classification, phase inference and the pure
//! session state machine.
pub mod classify;
mod effect;
mod msg;
pub mod phase;
mod projection;
mod state;
mod update;
mod view_model;

pub use classify::{classify, ClassifiedEvent, Classifier, RuleSpec, STANDARD_RULES};
pub use effect::{Effect, PurchaseOrderDraft};
pub use msg::{Msg, StreamEndReason};
pub use phase::{
    infer_phase, infer_phase_from_lines, pill_states, PhasePill, PhaseTracker, PillState,
    WorkflowPhase,
};
pub use projection::{apply, StreamProjection};
pub use state::{AppState, ProcurementRequest, SessionState, USE_CASES};
pub use update::update;
pub use view_model::{format_amount, AppViewModel, ExportStatus};
