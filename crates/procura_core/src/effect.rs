use crate::ProcurementRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// POST the request; the engine answers with `RequestAccepted` or `RequestFailed`.
    SubmitRequest(ProcurementRequest),
    /// Open the event stream for an accepted request.
    OpenStream { request_id: String },
    /// Close the active stream. Safe to emit when nothing is open.
    CloseStream,
    ExportPurchaseOrder(PurchaseOrderDraft),
}

/// What the core knows about a purchase order; the runner adds vendor,
/// ship-to and date before handing it to the exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderDraft {
    pub model: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub request_id: Option<String>,
}
