//! Analytics export

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use super::{demo_body, DashboardState};
use crate::api::envelope::ApiError;
use crate::export;
use crate::telemetry::analytics::export_rows;
use crate::types::{ExportFormat, TimeRange};

const EXPORT_FAILED: &str = "Failed to export analytics data";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportRequest {
    pub time_range: Option<String>,
    /// Absent or `null` exports JSON
    pub format: Option<ExportFormat>,
    pub include_nodes: Vec<String>,
}

/// Parse a `timeRange` value, rejecting anything but 24h, 7d and 30d.
pub(crate) fn parse_time_range(raw: Option<&str>) -> Result<TimeRange, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::Validation("timeRange is required".to_string()))?;
    raw.parse().map_err(|_| {
        ApiError::Validation(format!(
            "Unsupported timeRange '{raw}', expected one of 24h, 7d, 30d"
        ))
    })
}

/// POST /api/analytics/export
pub async fn export_analytics(
    State(state): State<DashboardState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ExportRequest = demo_body(&body, "analytics/export", EXPORT_FAILED)?;
    let range = parse_time_range(request.time_range.as_deref())?;
    let format = request.format.unwrap_or_default();

    let now = Utc::now();
    let rows = state.with_rng(|rng| export_rows(range, &request.include_nodes, now, rng));
    info!(time_range = %range, format = ?format, rows = rows.len(), "Analytics export");

    match format {
        ExportFormat::Csv => {
            state.submission_latency().await;
            let body = export::to_csv(&rows).map_err(|e| {
                error!(error = %e, "Export error");
                ApiError::Internal(EXPORT_FAILED)
            })?;
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export::csv_filename(range, now.date_naive())
            );
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
        ExportFormat::Json => Ok(Json(export::to_json_document(&rows, range, now)).into_response()),
    }
}

/// GET /api/analytics/export
pub async fn export_info() -> Json<Value> {
    Json(json!({
        "message": "Analytics Export API endpoint",
        "endpoints": {
            "POST": "/api/analytics/export - Export analytics data in CSV or JSON format",
        },
        "supportedFormats": ["csv", "json"],
        "supportedTimeRanges": TimeRange::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
