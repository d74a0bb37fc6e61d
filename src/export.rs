//! Analytics export formatting
//!
//! Two encodings of the same rows:
//! - CSV with a fixed header, fields quoted only when they need it
//! - a JSON document carrying the rows plus export metadata

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::types::{AnalyticsRow, TimeRange};

/// First line of every CSV export.
pub const CSV_HEADER: [&str; 6] = [
    "Timestamp",
    "Congestion Level",
    "Average Speed",
    "Vehicle Count",
    "AQI",
    "Node",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer error: {0}")]
    Buffer(String),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Timestamps as the browser renders `Date.toISOString()`.
pub fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render rows as CSV: header line, then one line per row.
pub fn to_csv(rows: &[AnalyticsRow]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            iso_millis(row.timestamp),
            row.congestion.to_string(),
            row.avg_speed.to_string(),
            row.vehicle_count.to_string(),
            row.aqi.to_string(),
            row.node.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `traffic-analytics-<range>-<YYYY-MM-DD>.csv`
pub fn csv_filename(range: TimeRange, date: NaiveDate) -> String {
    format!("traffic-analytics-{}-{}.csv", range, date.format("%Y-%m-%d"))
}

/// Row as it appears in the JSON export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub timestamp: String,
    pub congestion: u32,
    pub avg_speed: u32,
    pub vehicle_count: u32,
    pub aqi: u32,
    pub node: String,
}

impl From<&AnalyticsRow> for ExportRecord {
    fn from(row: &AnalyticsRow) -> Self {
        Self {
            timestamp: iso_millis(row.timestamp),
            congestion: row.congestion,
            avg_speed: row.avg_speed,
            vehicle_count: row.vehicle_count,
            aqi: row.aqi,
            node: row.node.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub time_range: TimeRange,
    pub record_count: usize,
    pub exported_at: String,
}

/// `{success, data, metadata}` body of a JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct JsonExport {
    pub success: bool,
    pub data: Vec<ExportRecord>,
    pub metadata: ExportMetadata,
}

pub fn to_json_document(
    rows: &[AnalyticsRow],
    range: TimeRange,
    exported_at: DateTime<Utc>,
) -> JsonExport {
    JsonExport {
        success: true,
        data: rows.iter().map(ExportRecord::from).collect(),
        metadata: ExportMetadata {
            time_range: range,
            record_count: rows.len(),
            exported_at: iso_millis(exported_at),
        },
    }
}
