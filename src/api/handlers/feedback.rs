//! Citizen feedback submission

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{demo_body, DashboardState};
use crate::api::envelope::ApiError;
use crate::types::FeedbackSubmission;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAccepted {
    pub success: bool,
    pub reference_id: String,
    pub message: &'static str,
}

/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<DashboardState>,
    body: Bytes,
) -> Result<Json<FeedbackAccepted>, ApiError> {
    let submission: FeedbackSubmission = demo_body(&body, "feedback", "Internal server error")?;

    let entry = state.feedback.submit(submission, Utc::now()).map_err(|missing| {
        debug!(?missing, "Feedback rejected");
        ApiError::Validation("All fields are required".to_string())
    })?;

    Ok(Json(FeedbackAccepted {
        success: true,
        reference_id: entry.id,
        message: "Feedback submitted successfully",
    }))
}

/// GET /api/feedback
pub async fn feedback_info() -> Json<Value> {
    Json(json!({
        "message": "Feedback API endpoint",
        "endpoints": { "POST": "/api/feedback - Submit new feedback" },
    }))
}
