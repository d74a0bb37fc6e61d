//! Login and logout

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{demo_body, DashboardState};
use crate::api::auth::extract_bearer;
use crate::api::envelope::ApiError;
use crate::config::defaults;
use crate::types::UserProfile;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
    pub expires_in: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<DashboardState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request: LoginRequest = demo_body(&body, "login", "Internal server error")?;

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::Validation("Email and password are required".to_string()));
    };

    let auth = &state.config.auth;
    if email != auth.admin_email || password != auth.admin_password {
        warn!(email = %email, "Login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = UserProfile {
        id: defaults::ADMIN_ID.to_string(),
        email,
        name: auth.admin_name.clone(),
        role: defaults::ADMIN_ROLE.to_string(),
    };
    let session = state.with_rng(|rng| state.sessions.issue(user, Utc::now(), rng));
    info!(user = %session.user.email, "Administrator logged in");

    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        user: session.user,
        expires_in: format!("{}h", auth.session_ttl_hours),
    }))
}

/// POST /api/auth/logout
///
/// Drops the presented session when there is one. Always succeeds.
pub async fn logout(State(state): State<DashboardState>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = extract_bearer(&headers) {
        state.sessions.revoke(token);
    }
    Json(json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}

/// GET /api/auth/login
pub async fn login_info() -> Json<Value> {
    Json(json!({
        "message": "Authentication API endpoint",
        "endpoints": { "POST": "/api/auth/login - Authenticate user" },
    }))
}

/// GET /api/auth/logout
pub async fn logout_info() -> Json<Value> {
    Json(json!({
        "message": "Logout API endpoint",
        "endpoints": { "POST": "/api/auth/logout - Logout user" },
    }))
}
