// HTTP request handlers for the acquisition node
use crate::application::node_service::NodeStatus;
use crate::infrastructure::snapshot_codec::{WireRecord, encode};
use crate::presentation::app_state::NodeState;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest snapshot as a wire record; 503 until the first tick completes.
pub async fn get_telemetry(State(state): State<Arc<NodeState>>) -> Result<Json<WireRecord>, StatusCode> {
    let latest = state.node.snapshots.borrow().clone();
    match latest {
        Some(snapshot) => Ok(Json(encode(&snapshot))),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

pub async fn get_status(State(state): State<Arc<NodeState>>) -> Json<NodeStatus> {
    Json(*state.node.status.borrow())
}
