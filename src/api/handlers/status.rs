//! Service health

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DashboardState;
use crate::simulation::Panel;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    /// Simulated wall-clock time of the dashboard
    pub simulated_time: DateTime<Utc>,
    pub simulated_elapsed_ms: u64,
    pub mounted_panels: Vec<Panel>,
    pub active_sessions: usize,
    pub feedback_received: usize,
}

/// GET /health
pub async fn health_check(State(state): State<DashboardState>) -> Json<HealthResponse> {
    let dashboard = state.dashboard.read().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        simulated_time: dashboard.now(),
        simulated_elapsed_ms: dashboard.elapsed_ms(),
        mounted_panels: Panel::ALL
            .into_iter()
            .filter(|&p| dashboard.is_mounted(p))
            .collect(),
        active_sessions: state.sessions.len(),
        feedback_received: state.feedback.len(),
    })
}
