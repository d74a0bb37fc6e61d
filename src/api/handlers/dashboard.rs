//! Session-protected dashboard endpoints
//!
//! Reads take the dashboard read lock and copy what they need; commands take
//! the write lock for the duration of one panel operation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::export::parse_time_range;
use super::{dashboard_body, DashboardState};
use crate::api::auth::AdminSession;
use crate::api::envelope::{ApiError, ApiResponse};
use crate::simulation::{Panel, SimEvent};
use crate::telemetry::analytics::{node_congestion, traffic_series};
use crate::types::{
    AnalyticsRow, AnalyticsSummary, EmergencyAlert, NodeCongestion, OverrideLog, OverrideRequest,
    TimeRange, TrafficNode,
};

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}

// ============================================================================
// Overview
// ============================================================================

/// A node plus the figures the overview cards derive from it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    #[serde(flatten)]
    pub node: TrafficNode,
    pub average_queue_length: u32,
    pub aqi_category: &'static str,
}

impl From<&TrafficNode> for NodeView {
    fn from(node: &TrafficNode) -> Self {
        Self {
            node: node.clone(),
            average_queue_length: node.average_queue_length(),
            aqi_category: node.aqi_category().label(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewView {
    pub simulator_enabled: bool,
    pub refreshed_at: DateTime<Utc>,
    pub refreshes: u64,
    pub simulated_time: DateTime<Utc>,
    pub nodes: Vec<NodeView>,
}

/// GET /api/dashboard/overview
pub async fn get_overview(
    _session: AdminSession,
    State(state): State<DashboardState>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.read().await;
    let panel = dashboard.overview()?;
    Ok(ApiResponse::ok(OverviewView {
        simulator_enabled: panel.simulator_enabled(),
        refreshed_at: panel.refreshed_at(),
        refreshes: panel.refreshes(),
        simulated_time: dashboard.now(),
        nodes: panel.nodes().iter().map(NodeView::from).collect(),
    }))
}

/// POST /api/dashboard/overview/simulator
pub async fn set_simulator(
    _session: AdminSession,
    State(state): State<DashboardState>,
    body: Result<Json<ToggleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let ToggleRequest { enabled } = dashboard_body(body)?;
    state.dashboard.write().await.set_simulator(enabled)?;
    Ok(ApiResponse::ok(serde_json::json!({ "simulatorEnabled": enabled })))
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsView {
    pub audio_enabled: bool,
    pub spawn_period_ms: u64,
    pub last_alert_at: Option<DateTime<Utc>>,
    pub active: Vec<EmergencyAlert>,
    pub recently_resolved: Vec<EmergencyAlert>,
}

/// GET /api/dashboard/alerts
pub async fn get_alerts(
    _session: AdminSession,
    State(state): State<DashboardState>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.read().await;
    let panel = dashboard.alerts()?;
    Ok(ApiResponse::ok(AlertsView {
        audio_enabled: panel.audio_enabled(),
        spawn_period_ms: panel.spawn_period_ms(),
        last_alert_at: panel.last_alert_at(),
        active: panel.active().cloned().collect(),
        recently_resolved: panel.recently_resolved().cloned().collect(),
    }))
}

/// POST /api/dashboard/alerts/:id/resolve
pub async fn resolve_alert(
    AdminSession(session): AdminSession,
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let (alert, _) = state.dashboard.write().await.resolve_alert(&id)?;
    info!(alert_id = %alert.id, user = %session.user.name, "Alert resolved from dashboard");
    Ok(ApiResponse::ok(alert))
}

/// POST /api/dashboard/alerts/audio
pub async fn set_audio(
    _session: AdminSession,
    State(state): State<DashboardState>,
    body: Result<Json<ToggleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let ToggleRequest { enabled } = dashboard_body(body)?;
    state.dashboard.write().await.set_audio(enabled)?;
    Ok(ApiResponse::ok(serde_json::json!({ "audioEnabled": enabled })))
}

// ============================================================================
// Overrides
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBounds {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridesView {
    pub active: Vec<OverrideLog>,
    pub history: Vec<OverrideLog>,
    pub nodes: Vec<String>,
    pub duration_bounds: DurationBounds,
}

/// GET /api/dashboard/overrides
pub async fn get_overrides(
    _session: AdminSession,
    State(state): State<DashboardState>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.read().await;
    let panel = dashboard.overrides()?;
    let settings = dashboard.settings();
    Ok(ApiResponse::ok(OverridesView {
        active: panel.active().cloned().collect(),
        history: panel.history().to_vec(),
        nodes: dashboard.node_names().to_vec(),
        duration_bounds: DurationBounds {
            min: settings.override_min_secs,
            max: settings.override_max_secs,
        },
    }))
}

/// POST /api/dashboard/overrides
pub async fn submit_override(
    AdminSession(session): AdminSession,
    State(state): State<DashboardState>,
    body: Result<Json<OverrideRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = dashboard_body(body)?;
    state.submission_latency().await;
    let (log, _) = state
        .dashboard
        .write()
        .await
        .submit_override(&request, &session.user.name)?;
    Ok(ApiResponse::ok(log))
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub time_range: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub time_range: TimeRange,
    pub series: Vec<AnalyticsRow>,
    pub node_congestion: Vec<NodeCongestion>,
    pub summary: AnalyticsSummary,
}

/// GET /api/dashboard/analytics?timeRange=24h
///
/// Without a `timeRange` the last 24 hours are shown.
pub async fn get_analytics(
    _session: AdminSession,
    State(state): State<DashboardState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, ApiError> {
    let range = match query.time_range.as_deref() {
        None => TimeRange::Day,
        raw => parse_time_range(raw)?,
    };
    let now = Utc::now();
    let (series, nodes) = state.with_rng(|rng| {
        (
            traffic_series(range, now, rng),
            node_congestion(&state.config.network.node_names, rng),
        )
    });
    let summary = AnalyticsSummary::from_rows(&series);
    Ok(ApiResponse::ok(AnalyticsView {
        time_range: range,
        series,
        node_congestion: nodes,
        summary,
    }))
}

// ============================================================================
// Feedback and panels
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackQuery {
    pub limit: Option<usize>,
}

/// Entries returned when no limit is given.
const FEEDBACK_PAGE: usize = 20;

/// GET /api/dashboard/feedback
pub async fn get_feedback(
    _session: AdminSession,
    State(state): State<DashboardState>,
    Query(query): Query<FeedbackQuery>,
) -> Response {
    ApiResponse::ok(state.feedback.recent(query.limit.unwrap_or(FEEDBACK_PAGE)))
}

fn parse_panel(raw: &str) -> Result<Panel, ApiError> {
    raw.parse().map_err(ApiError::NotFound)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelChange {
    pub panel: Panel,
    pub mounted: bool,
    pub events: Vec<SimEvent>,
}

/// POST /api/dashboard/panels/:panel/mount
pub async fn mount_panel(
    _session: AdminSession,
    State(state): State<DashboardState>,
    Path(panel): Path<String>,
) -> Result<Response, ApiError> {
    let panel = parse_panel(&panel)?;
    let events = state.dashboard.write().await.mount(panel);
    Ok(ApiResponse::ok(PanelChange {
        panel,
        mounted: true,
        events,
    }))
}

/// POST /api/dashboard/panels/:panel/unmount
pub async fn unmount_panel(
    _session: AdminSession,
    State(state): State<DashboardState>,
    Path(panel): Path<String>,
) -> Result<Response, ApiError> {
    let panel = parse_panel(&panel)?;
    let events = state.dashboard.write().await.unmount(panel);
    Ok(ApiResponse::ok(PanelChange {
        panel,
        mounted: false,
        events,
    }))
}
