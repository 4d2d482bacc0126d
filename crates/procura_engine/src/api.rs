use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;

use crate::sse::{SseDecoder, STREAM_CLOSED_SENTINEL};
use crate::{ApiError, EngineEvent, FailureKind, ProcurementRequest, StreamEnd};

pub const DEFAULT_BASE_URL: &str = "https://pronet-0u6p.onrender.com";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to submission only; streams are long-lived.
    pub request_timeout: Duration,
    /// Give up on a stream that sends nothing for this long.
    pub stream_idle_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            stream_idle_timeout: None,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait ProcurementApi: Send + Sync {
    /// Submit a request and return the id the service assigned to it.
    async fn submit(&self, request: &ProcurementRequest) -> Result<String, ApiError>;

    /// Stream lines for `request_id` into `sink` until the server closes,
    /// the connection ends, or `cancel` fires.
    async fn stream(
        &self,
        request_id: &str,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<StreamEnd, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let mut base = self.settings.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = reqwest::Url::parse(&base)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        base.join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self, total_timeout: Option<Duration>) -> Result<reqwest::Client, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = total_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ProcurementApi for ReqwestApi {
    async fn submit(&self, request: &ProcurementRequest) -> Result<String, ApiError> {
        let url = self.endpoint("api/procure")?;
        let client = self.build_client(Some(self.settings.request_timeout))?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::MalformedResponse, err.to_string()))?;

        engine_info!(
            "Submitting procurement use_case={} quantity={} budget={}",
            request.use_case,
            request.quantity,
            request.max_budget_per_unit
        );
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: crate::types::ProcureResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::MalformedResponse, err.to_string()))?;
        if parsed.request_id.trim().is_empty() {
            return Err(ApiError::new(
                FailureKind::MalformedResponse,
                "empty request_id",
            ));
        }
        Ok(parsed.request_id)
    }

    async fn stream(
        &self,
        request_id: &str,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<StreamEnd, ApiError> {
        let url = self.endpoint(&format!("api/stream/{request_id}"))?;
        let client = self.build_client(None)?;

        let send = client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
            response = send => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        engine_info!("Stream open request_id={}", request_id);

        let mut decoder = SseDecoder::new();
        let mut body = Box::pin(response.bytes_stream());
        loop {
            let next = async {
                match self.settings.stream_idle_timeout {
                    Some(idle) => tokio::time::timeout(idle, body.next()).await.map_err(|_| {
                        ApiError::new(FailureKind::Timeout, format!("no data for {idle:?}"))
                    }),
                    None => Ok(body.next().await),
                }
            };
            let chunk = tokio::select! {
                _ = cancel.cancelled() => {
                    engine_debug!("Stream cancelled request_id={}", request_id);
                    return Ok(StreamEnd::Cancelled);
                }
                next = next => next?,
            };

            let Some(chunk) = chunk else {
                decoder.finish();
                engine_warn!("Stream ended without sentinel request_id={}", request_id);
                return Ok(StreamEnd::Eof);
            };
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => return Ok(StreamEnd::Failed(map_reqwest_error(err))),
            };

            for event in decoder.push(&chunk) {
                if !event.is_message() {
                    continue;
                }
                if event.data == STREAM_CLOSED_SENTINEL {
                    engine_info!("Stream closed by server request_id={}", request_id);
                    return Ok(StreamEnd::ServerClosed);
                }
                // Closing must stop delivery even mid-chunk.
                if cancel.is_cancelled() {
                    return Ok(StreamEnd::Cancelled);
                }
                sink.emit(EngineEvent::StreamLine {
                    request_id: request_id.to_string(),
                    line: event.data,
                });
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::MalformedResponse, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
