//! Procura engine: HTTP submission, SSE streaming, purchase order export.
mod api;
mod engine;
mod export;
mod persist;
pub mod sse;
mod types;

pub use api::{
    ApiSettings, ChannelEventSink, EventSink, ProcurementApi, ReqwestApi, DEFAULT_BASE_URL,
};
pub use engine::{EngineError, EngineHandle};
pub use export::{
    render_purchase_order, write_purchase_order, ExportError, ExportSummary, PurchaseOrder,
    PAGE_LINES, PAGE_WIDTH,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sse::{SseDecoder, SseEvent, STREAM_CLOSED_SENTINEL};
pub use types::{ApiError, EngineEvent, FailureKind, ProcurementRequest, StreamEnd};
