#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User started a procurement run.
    StartClicked(crate::ProcurementRequest),
    /// The service accepted the request and assigned an id.
    RequestAccepted { request_id: String },
    /// Submission failed before a stream could be opened.
    RequestFailed { message: String },
    /// One raw line from the event stream, in arrival order.
    StreamLine { request_id: String, line: String },
    /// The event stream for `request_id` ended.
    StreamEnded {
        request_id: String,
        reason: StreamEndReason,
    },
    /// User clicked Stop (or pressed Ctrl-C).
    StopClicked,
    /// User asked for the purchase order document.
    ExportClicked,
    /// Exporter finished: written path or error text.
    ExportFinished(Result<String, String>),
    /// Render tick.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEndReason {
    /// Server sent its end-of-stream sentinel.
    ServerClosed,
    /// Connection dropped, errored, or ended without the sentinel.
    Lost { message: String },
    /// We closed it ourselves.
    Cancelled,
}
