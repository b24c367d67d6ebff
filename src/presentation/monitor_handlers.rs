// HTTP request handlers for the monitor (consumer side)
use crate::application::monitor_service::{MonitorCommand, MonitorView};
use crate::domain::flight::FlightMetrics;
use crate::domain::history::{HistoryHorizon, HistorySample};
use crate::domain::liveness::LivenessState;
use crate::presentation::app_state::MonitorState;
use crate::presentation::display::{format_reading, render_snapshot};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct MetricsResponse {
    pub liveness: LivenessState,
    pub average_rtt_ms: Option<f64>,
    pub last_contact: Option<String>,
    pub metrics: FlightMetrics,
    pub display: DisplayLines,
}

/// Pre-formatted strings for a dashboard that just prints them.
#[derive(Serialize)]
pub struct DisplayLines {
    pub snapshot: String,
    pub vertical_speed: String,
    pub altitude_delta: String,
    pub lift: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub window_minutes: HistoryHorizon,
    pub samples: Vec<HistorySample>,
}

#[derive(Deserialize)]
pub struct DiameterRequest {
    pub feet: f64,
}

#[derive(Deserialize)]
pub struct WindowRequest {
    pub minutes: u32,
}

fn display_lines(view: &MonitorView) -> DisplayLines {
    let lift = match (view.metrics.lift_lbf, view.metrics.would_rise) {
        (Some(lbf), Some(false)) => format!("{} (would not rise)", format_reading(Some(lbf), 1, " lbf")),
        (lbf, _) => format_reading(lbf, 1, " lbf"),
    };
    DisplayLines {
        snapshot: view
            .latest
            .as_ref()
            .map_or_else(|| "no data".to_string(), render_snapshot),
        vertical_speed: format_reading(Some(view.metrics.vertical_speed_mps), 1, " m/s"),
        altitude_delta: format_reading(view.metrics.altitude_delta_m, 1, " m"),
        lift,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_metrics(State(state): State<Arc<MonitorState>>) -> Json<MetricsResponse> {
    let view = state.monitor.view.borrow().clone();
    Json(MetricsResponse {
        liveness: view.liveness,
        average_rtt_ms: view.average_round_trip_ms,
        last_contact: view.last_contact.map(|t| t.to_rfc3339()),
        display: display_lines(&view),
        metrics: view.metrics,
    })
}

pub async fn get_history(State(state): State<Arc<MonitorState>>) -> Json<HistoryResponse> {
    let view = state.monitor.view.borrow();
    let response = HistoryResponse {
        window_minutes: view.horizon,
        samples: view.history.clone(),
    };
    Json(response)
}

async fn send(state: &MonitorState, command: MonitorCommand) -> StatusCode {
    match state.monitor.commands.send(command).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::error!("Monitor is not running: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn reset_baseline(State(state): State<Arc<MonitorState>>) -> StatusCode {
    send(&state, MonitorCommand::ResetBaseline).await
}

pub async fn set_diameter(
    State(state): State<Arc<MonitorState>>,
    Json(request): Json<DiameterRequest>,
) -> StatusCode {
    if !request.feet.is_finite() || request.feet <= 0.0 {
        return StatusCode::BAD_REQUEST;
    }
    send(&state, MonitorCommand::SetDiameter(request.feet)).await
}

pub async fn set_window(
    State(state): State<Arc<MonitorState>>,
    Json(request): Json<WindowRequest>,
) -> StatusCode {
    match HistoryHorizon::try_from(request.minutes) {
        Ok(horizon) => send(&state, MonitorCommand::SetWindow(horizon)).await,
        Err(_) => StatusCode::BAD_REQUEST,
    }
}
