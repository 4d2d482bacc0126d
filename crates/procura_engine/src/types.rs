use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/procure`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcurementRequest {
    pub use_case: String,
    pub quantity: u32,
    pub max_budget_per_unit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ram_gb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_storage_gb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_brand: Option<String>,
    pub prefer_performance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProcureResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RequestAccepted {
        request_id: String,
    },
    RequestFailed {
        error: ApiError,
    },
    /// One `message` event from the stream, in arrival order.
    StreamLine {
        request_id: String,
        line: String,
    },
    StreamEnded {
        request_id: String,
        end: StreamEnd,
    },
    ExportFinished {
        result: Result<crate::ExportSummary, String>,
    },
    /// Ctrl-C was pressed.
    InterruptRequested,
}

/// How a stream ended without a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server sent its end-of-stream sentinel.
    ServerClosed,
    /// The body ended without the sentinel.
    Eof,
    /// Closed from our side.
    Cancelled,
    /// Transport error mid-stream.
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    MalformedResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
