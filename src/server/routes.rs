//! Push protocol endpoints.
//!
//! The terminal retries any upload that is not answered `200 OK` quickly, so
//! every handler here answers `OK` whatever happened. Processing outcomes are
//! only visible in the logs.

use super::state::AppState;
use crate::core::protocol::{PushTable, parse_attlog_body};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct PushParams {
    #[serde(rename = "SN")]
    pub sn: Option<String>,
    pub table: Option<String>,
}

/// The one response the terminal ever gets.
pub fn ack() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "OK")
}

fn params_or_default(params: Option<Query<PushParams>>) -> PushParams {
    params.map(|Query(p)| p).unwrap_or_default()
}

/// `POST /iclock/cdata`: attendance and operation log upload.
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    params: Option<Query<PushParams>>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let params = params_or_default(params);
    let serial = params.sn.as_deref();
    let table = PushTable::from_param(params.table.as_deref());

    info!(serial = serial.unwrap_or("<none>"), ?table, "data received");

    if !state.gate.check(serial) {
        return ack();
    }

    let body = match body {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "failed to read upload body");
            return ack();
        }
    };

    let text = String::from_utf8_lossy(&body);
    if text.trim().is_empty() {
        info!("empty body received");
        return ack();
    }

    debug!(body = %text, "raw upload body");

    match table {
        PushTable::AttLog => {
            let batch = parse_attlog_body(&text);
            info!(
                events = batch.events.len(),
                rejected = batch.rejected.len(),
                "ATTLOG parsed"
            );
            state.processor.dispatch_batch(batch.events);
        }
        PushTable::OperLog => {
            info!(lines = text.lines().count(), "OPERLOG received, not processed");
        }
        PushTable::Unknown(name) => {
            info!(table = %name, "unknown table type, ignored");
        }
    }

    ack()
}

/// `GET /iclock/cdata`: initial handshake. Nothing is negotiated.
pub async fn handshake_handler(
    State(state): State<Arc<AppState>>,
    params: Option<Query<PushParams>>,
) -> impl IntoResponse {
    let params = params_or_default(params);
    info!(serial = params.sn.as_deref().unwrap_or("<none>"), "device handshake");
    state.gate.check(params.sn.as_deref());
    ack()
}

/// `GET /iclock/getrequest`: command polling. No commands are ever queued.
pub async fn poll_handler(
    State(state): State<Arc<AppState>>,
    params: Option<Query<PushParams>>,
) -> impl IntoResponse {
    let params = params_or_default(params);
    debug!(serial = params.sn.as_deref().unwrap_or("<none>"), "device polling");
    state.gate.check(params.sn.as_deref());
    ack()
}

pub async fn health_handler() -> impl IntoResponse {
    ack()
}
