use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, ChannelEventSink, EventSink, ProcurementApi, ReqwestApi};
use crate::export::{write_purchase_order, PurchaseOrder};
use crate::{EngineEvent, ProcurementRequest, StreamEnd};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Submit(ProcurementRequest),
    OpenStream { request_id: String },
    CloseStream,
    Export { dir: PathBuf, order: PurchaseOrder },
    WatchInterrupt,
}

/// Runs network and file work on a background tokio runtime. Results come
/// back as [`EngineEvent`]s in the order they were produced.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        Self::with_api(Arc::new(ReqwestApi::new(settings)))
    }

    pub fn with_api(api: Arc<dyn ProcurementApi>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            // Only this thread touches the active stream, so commands are
            // applied strictly in the order they were sent.
            let mut active: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &api, command, &event_tx, &mut active);
            }
            if let Some(token) = active.take() {
                token.cancel();
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit(&self, request: ProcurementRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit(request));
    }

    /// Open the stream for `request_id`, closing any stream already open.
    pub fn open_stream(&self, request_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::OpenStream {
            request_id: request_id.into(),
        });
    }

    /// Close the active stream, if any. Idempotent.
    pub fn close_stream(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CloseStream);
    }

    pub fn export(&self, dir: PathBuf, order: PurchaseOrder) {
        let _ = self.cmd_tx.send(EngineCommand::Export { dir, order });
    }

    /// Report Ctrl-C presses as [`EngineEvent::InterruptRequested`].
    pub fn watch_interrupt(&self) {
        let _ = self.cmd_tx.send(EngineCommand::WatchInterrupt);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &Runtime,
    api: &Arc<dyn ProcurementApi>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
    active: &mut Option<CancellationToken>,
) {
    match command {
        EngineCommand::Submit(request) => {
            let api = api.clone();
            let sink = ChannelEventSink::new(event_tx.clone());
            runtime.spawn(async move {
                match api.submit(&request).await {
                    Ok(request_id) => {
                        engine_info!("Request accepted request_id={}", request_id);
                        sink.emit(EngineEvent::RequestAccepted { request_id });
                    }
                    Err(error) => {
                        engine_warn!("Request submission failed: {}", error);
                        sink.emit(EngineEvent::RequestFailed { error });
                    }
                }
            });
        }
        EngineCommand::OpenStream { request_id } => {
            if let Some(previous) = active.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            *active = Some(token.clone());

            let api = api.clone();
            let sink = ChannelEventSink::new(event_tx.clone());
            runtime.spawn(async move {
                let end = match api.stream(&request_id, &sink, token).await {
                    Ok(end) => end,
                    Err(error) => {
                        engine_warn!("Stream failed request_id={}: {}", request_id, error);
                        StreamEnd::Failed(error)
                    }
                };
                sink.emit(EngineEvent::StreamEnded { request_id, end });
            });
        }
        EngineCommand::CloseStream => {
            if let Some(token) = active.take() {
                token.cancel();
            }
        }
        EngineCommand::Export { dir, order } => {
            let sink = ChannelEventSink::new(event_tx.clone());
            runtime.spawn_blocking(move || {
                let result = write_purchase_order(&dir, &order).map_err(|err| err.to_string());
                match &result {
                    Ok(summary) => {
                        engine_info!("Purchase order written to {:?}", summary.document_path)
                    }
                    Err(err) => engine_warn!("Purchase order export failed: {}", err),
                }
                sink.emit(EngineEvent::ExportFinished { result });
            });
        }
        EngineCommand::WatchInterrupt => {
            let sink = ChannelEventSink::new(event_tx.clone());
            runtime.spawn(async move {
                loop {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        engine_warn!("Cannot listen for Ctrl-C: {}", err);
                        break;
                    }
                    sink.emit(EngineEvent::InterruptRequested);
                }
            });
        }
    }
}
