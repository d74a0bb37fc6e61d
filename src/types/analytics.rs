//! Analytics series and export types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Time Range
// ============================================================================

/// Window covered by an analytics series or export.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    pub const ALL: [Self; 3] = [Self::Day, Self::Week, Self::Month];

    /// Total hours covered.
    pub const fn total_hours(self) -> u32 {
        match self {
            Self::Day => 24,
            Self::Week => 168,
            Self::Month => 720,
        }
    }

    /// Width of one bucket in hours.
    pub const fn bucket_hours(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 6,
            Self::Month => 24,
        }
    }

    /// Number of rows in a series: 24, 28 and 30.
    pub const fn bucket_count(self) -> usize {
        (self.total_hours() / self.bucket_hours()) as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            other => Err(format!("unsupported time range '{other}'")),
        }
    }
}

// ============================================================================
// Export Format
// ============================================================================

/// Requested export encoding. Anything other than `csv` falls back to JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    #[serde(other)]
    Json,
}

// ============================================================================
// Rows
// ============================================================================

/// One time bucket of aggregated traffic figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRow {
    pub timestamp: DateTime<Utc>,
    /// Congestion level in percent
    pub congestion: u32,
    /// Average speed in km/h
    pub avg_speed: u32,
    pub vehicle_count: u32,
    pub aqi: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub node: Option<String>,
}

/// Current congestion of one junction and its change versus the baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeCongestion {
    pub node: String,
    pub congestion: u32,
    /// Percentage points, -20..=20
    pub improvement: i32,
}

/// Headline figures shown above the analytics charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub avg_congestion: u32,
    pub avg_aqi: u32,
    /// Last bucket's congestion minus the first bucket's
    pub congestion_trend: i64,
}

impl AnalyticsSummary {
    pub fn from_rows(rows: &[AnalyticsRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let n = rows.len() as u64;
        let mean = |total: u64| u32::try_from((total + n / 2) / n).unwrap_or(u32::MAX);
        let congestion: u64 = rows.iter().map(|r| u64::from(r.congestion)).sum();
        let aqi: u64 = rows.iter().map(|r| u64::from(r.aqi)).sum();
        let trend = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) if rows.len() > 1 => {
                i64::from(last.congestion) - i64::from(first.congestion)
            }
            _ => 0,
        };
        Self {
            avg_congestion: mean(congestion),
            avg_aqi: mean(aqi),
            congestion_trend: trend,
        }
    }
}
