//! API route handlers
//!
//! - `auth`, `feedback`, `export`: the public demo endpoints
//! - `dashboard`: session-protected panel reads and commands
//! - `status`: service health

mod auth;
mod dashboard;
mod export;
mod feedback;
mod status;

pub use auth::*;
pub use dashboard::*;
pub use export::*;
pub use feedback::*;
pub use status::*;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use super::envelope::ApiError;
use crate::config::DashboardConfig;
use crate::simulation::Dashboard;
use crate::storage::{FeedbackStore, SessionStore};
use crate::telemetry::TelemetryGenerator;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Simulated panels, advanced by the driver task
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub sessions: Arc<SessionStore>,
    pub feedback: Arc<FeedbackStore>,
    /// Randomness for request-scoped generators (tokens, exports, analytics)
    pub rng: Arc<Mutex<StdRng>>,
    pub config: Arc<DashboardConfig>,
    pub started_at: Instant,
}

impl DashboardState {
    /// Build state with every panel mounted. A seed makes both the
    /// simulation and the request-scoped generators reproducible.
    pub fn new(config: DashboardConfig, seed: Option<u64>) -> Self {
        let mut master = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let sim_rng = StdRng::seed_from_u64(master.gen());

        let mut dashboard = Dashboard::new(
            sim_rng,
            Utc::now(),
            TelemetryGenerator::new(config.network.node_names.clone()),
            config.simulation.clone(),
        );
        dashboard.mount_all();

        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            sessions: Arc::new(SessionStore::new(config.auth.session_ttl_hours)),
            feedback: Arc::new(FeedbackStore::new(config.feedback.max_retained)),
            rng: Arc::new(Mutex::new(master)),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Run `f` with the shared request RNG.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Artificial delay applied before slow demo operations respond.
    pub async fn submission_latency(&self) {
        let delay = self.config.server.submission_latency();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Parse a demo route body as JSON whatever its `Content-Type`. Malformed
/// bodies surface as the route's static 500.
pub(crate) fn demo_body<T: DeserializeOwned>(
    body: &Bytes,
    route: &'static str,
    message: &'static str,
) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(route, error = %e, "Rejected malformed request body");
        ApiError::Internal(message)
    })
}

/// Malformed bodies on dashboard routes are a plain validation error.
pub(crate) fn dashboard_body<T>(body: Result<axum::Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|axum::Json(v)| v).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::Validation(rejection.body_text())
        }
    })
}

#[cfg(test)]
pub(crate) fn test_state() -> DashboardState {
    let mut config = DashboardConfig::default();
    config.server.submission_latency_ms = 0;
    DashboardState::new(config, Some(42))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Panel;

    #[tokio::test]
    async fn test_state_mounts_every_panel() {
        let state = test_state();
        let dashboard = state.dashboard.read().await;
        assert!(Panel::ALL.iter().all(|&p| dashboard.is_mounted(p)));
        assert_eq!(dashboard.overview().unwrap().nodes().len(), 6);
    }

    #[test]
    fn test_demo_body_ignores_content_type_and_rejects_garbage() {
        #[derive(Debug, serde::Deserialize)]
        struct Credentials {
            email: String,
        }
        let ok: Credentials = demo_body(&Bytes::from_static(br#"{"email":"a@b.c"}"#), "login", "boom").unwrap();
        assert_eq!(ok.email, "a@b.c");

        let err = demo_body::<Credentials>(&Bytes::from_static(b"{not json"), "login", "boom").unwrap_err();
        assert!(matches!(err, ApiError::Internal("boom")));
    }

    #[test]
    fn test_seeded_request_rng_is_reproducible() {
        let a: u64 = test_state().with_rng(|r| r.gen());
        let b: u64 = test_state().with_rng(|r| r.gen());
        assert_eq!(a, b);
    }
}
