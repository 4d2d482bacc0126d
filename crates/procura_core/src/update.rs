use crate::{AppState, Effect, ExportStatus, Msg, SessionState, StreamEndReason};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked(request) => match state.session() {
            SessionState::Idle | SessionState::Ended => {
                state.begin_submission(request.quantity);
                vec![Effect::SubmitRequest(request)]
            }
            // One run at a time; the start button is disabled while busy.
            SessionState::Submitting | SessionState::Streaming => Vec::new(),
        },
        Msg::RequestAccepted { request_id } => {
            if state.session() != SessionState::Submitting {
                return (state, Vec::new());
            }
            state.accept_request(request_id.clone());
            vec![Effect::OpenStream { request_id }]
        }
        Msg::RequestFailed { message } => {
            if state.session() == SessionState::Submitting {
                state.end_session(format!("Request failed: {message}"));
            }
            Vec::new()
        }
        Msg::StreamLine { request_id, line } => {
            // Lines that race a close, or belong to an older run, are dropped
            // before they reach the classifier.
            if state.is_current_stream(&request_id) {
                state.apply_line(&line);
            }
            Vec::new()
        }
        Msg::StreamEnded { request_id, reason } => {
            if state.is_current_stream(&request_id) {
                match reason {
                    StreamEndReason::ServerClosed => state.end_session("Stream closed by server"),
                    StreamEndReason::Lost { .. } => {
                        state.end_session("Stream closed or lost connection")
                    }
                    StreamEndReason::Cancelled => {}
                }
            }
            Vec::new()
        }
        Msg::StopClicked => {
            if state.session() == SessionState::Streaming {
                state.end_session("Stream stopped by user");
                vec![Effect::CloseStream]
            } else {
                Vec::new()
            }
        }
        Msg::ExportClicked => match state.purchase_order_draft() {
            Some(draft) => vec![Effect::ExportPurchaseOrder(draft)],
            None => Vec::new(),
        },
        Msg::ExportFinished(result) => {
            let status = match result {
                Ok(path) => ExportStatus::Written { path },
                Err(message) => ExportStatus::Failed { message },
            };
            state.record_export(status);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
