//! API route definitions
//!
//! - /api/auth/login, /api/auth/logout - demo credential check
//! - /api/feedback - citizen feedback intake
//! - /api/analytics/export - CSV or JSON export
//! - /api/dashboard/* - session-protected panel endpoints
//! - /health - service health

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};
use super::middleware;

/// Public demo endpoints plus the nested dashboard API, relative to `/api`.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/auth/login", get(handlers::login_info).post(handlers::login))
        .route("/auth/logout", get(handlers::logout_info).post(handlers::logout))
        .route(
            "/feedback",
            get(handlers::feedback_info).post(handlers::submit_feedback),
        )
        .route(
            "/analytics/export",
            get(handlers::export_info).post(handlers::export_analytics),
        )
        .nest(
            "/dashboard",
            dashboard_routes().layer(axum_mw::from_fn(middleware::no_store)),
        )
        .with_state(state)
}

/// Dashboard endpoints. Every handler requires a live session.
pub fn dashboard_routes() -> Router<DashboardState> {
    Router::new()
        .route("/overview", get(handlers::get_overview))
        .route("/overview/simulator", post(handlers::set_simulator))
        .route("/alerts", get(handlers::get_alerts))
        .route("/alerts/audio", post(handlers::set_audio))
        .route("/alerts/:id/resolve", post(handlers::resolve_alert))
        .route(
            "/overrides",
            get(handlers::get_overrides).post(handlers::submit_override),
        )
        .route("/analytics", get(handlers::get_analytics))
        .route("/feedback", get(handlers::get_feedback))
        .route("/panels/:panel/mount", post(handlers::mount_panel))
        .route("/panels/:panel/unmount", post(handlers::unmount_panel))
}

/// Health endpoint at root level
pub fn health_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
