use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use engine_logging::{engine_debug, engine_info};
use procura_core::{Effect, Msg, ProcurementRequest, PurchaseOrderDraft, StreamEndReason};
use procura_engine::{EngineEvent, EngineHandle, PurchaseOrder, StreamEnd};

/// Where and under whose name purchase orders are issued.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub vendor: String,
    pub ship_to: String,
}

pub struct EffectRunner {
    engine: EngineHandle,
    export: ExportTarget,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, export: ExportTarget, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine, export };
        runner.spawn_event_loop(msg_tx);
        runner.engine.watch_interrupt();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitRequest(request) => {
                    engine_info!(
                        "SubmitRequest use_case={} quantity={}",
                        request.use_case,
                        request.quantity
                    );
                    self.engine.submit(map_request(request));
                }
                Effect::OpenStream { request_id } => {
                    engine_info!("OpenStream request_id={}", request_id);
                    self.engine.open_stream(request_id);
                }
                Effect::CloseStream => {
                    engine_info!("CloseStream");
                    self.engine.close_stream();
                }
                Effect::ExportPurchaseOrder(draft) => {
                    let order = self.purchase_order(draft);
                    engine_info!(
                        "ExportPurchaseOrder dir={:?} request_id={:?}",
                        self.export.dir,
                        order.request_id
                    );
                    self.engine.export(self.export.dir.clone(), order);
                }
            }
        }
    }

    fn purchase_order(&self, draft: PurchaseOrderDraft) -> PurchaseOrder {
        PurchaseOrder {
            model: draft.model,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            request_id: draft.request_id,
            vendor: self.export.vendor.clone(),
            ship_to: self.export.ship_to.clone(),
            issued_on: Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(50)) else {
                continue;
            };
            if msg_tx.send(map_event(event)).is_err() {
                engine_debug!("Message loop gone; stopping engine event forwarding");
                break;
            }
        });
    }
}

fn map_request(request: ProcurementRequest) -> procura_engine::ProcurementRequest {
    procura_engine::ProcurementRequest {
        use_case: request.use_case,
        quantity: request.quantity,
        max_budget_per_unit: request.max_budget_per_unit,
        min_ram_gb: request.min_ram_gb,
        min_storage_gb: request.min_storage_gb,
        preferred_brand: request.preferred_brand,
        prefer_performance: request.prefer_performance,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RequestAccepted { request_id } => Msg::RequestAccepted { request_id },
        EngineEvent::RequestFailed { error } => Msg::RequestFailed {
            message: error.to_string(),
        },
        EngineEvent::StreamLine { request_id, line } => Msg::StreamLine { request_id, line },
        EngineEvent::StreamEnded { request_id, end } => Msg::StreamEnded {
            request_id,
            reason: map_stream_end(end),
        },
        EngineEvent::ExportFinished { result } => Msg::ExportFinished(
            result.map(|summary| summary.document_path.display().to_string()),
        ),
        EngineEvent::InterruptRequested => Msg::StopClicked,
    }
}

fn map_stream_end(end: StreamEnd) -> StreamEndReason {
    match end {
        StreamEnd::ServerClosed => StreamEndReason::ServerClosed,
        StreamEnd::Cancelled => StreamEndReason::Cancelled,
        StreamEnd::Eof => StreamEndReason::Lost {
            message: "stream ended without close marker".to_string(),
        },
        StreamEnd::Failed(error) => StreamEndReason::Lost {
            message: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_maps_to_stop() {
        assert_eq!(map_event(EngineEvent::InterruptRequested), Msg::StopClicked);
    }

    #[test]
    fn stream_ends_map_to_reasons() {
        assert_eq!(map_stream_end(StreamEnd::ServerClosed), StreamEndReason::ServerClosed);
        assert_eq!(map_stream_end(StreamEnd::Cancelled), StreamEndReason::Cancelled);
        assert!(matches!(
            map_stream_end(StreamEnd::Eof),
            StreamEndReason::Lost { .. }
        ));
    }

    #[test]
    fn request_fields_are_carried_over() {
        let mut request = ProcurementRequest::new("gaming", 3, 2000.0);
        request.preferred_brand = Some("Razer".to_string());
        let wire = map_request(request);
        assert_eq!(wire.use_case, "gaming");
        assert_eq!(wire.quantity, 3);
        assert_eq!(wire.preferred_brand.as_deref(), Some("Razer"));
        assert!(wire.prefer_performance);
    }
}
