//! Mock analytics series.
//!
//! Two generators share the same bucket layout (one row per bucket, the last
//! bucket ending one bucket-width before `now`):
//! - [`traffic_series`] follows a peak-hour congestion pattern and feeds the
//!   analytics charts;
//! - [`export_rows`] draws every figure uniformly and feeds the export endpoint.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{AnalyticsRow, NodeCongestion, TimeRange};

/// Label used in the `Node` column when no junction filter was requested.
pub const ALL_NODES: &str = "All Nodes";

/// Morning and evening rush hours (inclusive, UTC).
const PEAK_HOURS: [(u32, u32); 2] = [(7, 10), (17, 20)];

/// Start timestamps of every bucket in `range`, oldest first.
pub fn bucket_starts(range: TimeRange, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let total = i64::from(range.total_hours());
    let step = i64::from(range.bucket_hours());
    (0..range.bucket_count())
        .map(|i| {
            let offset = total - step * i64::try_from(i).unwrap_or(0);
            now - Duration::hours(offset)
        })
        .collect()
}

pub fn is_peak_hour(hour: u32) -> bool {
    PEAK_HOURS.iter().any(|&(from, to)| (from..=to).contains(&hour))
}

/// Chart series with rush-hour congestion and figures derived from it.
pub fn traffic_series<R: Rng + ?Sized>(
    range: TimeRange,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<AnalyticsRow> {
    bucket_starts(range, now)
        .into_iter()
        .map(|timestamp| {
            let congestion = if is_peak_hour(timestamp.hour()) {
                70.0 + rng.gen::<f64>() * 25.0
            } else {
                30.0 + rng.gen::<f64>() * 30.0
            };
            AnalyticsRow {
                timestamp,
                congestion: round(congestion),
                avg_speed: round(60.0 - congestion * 0.4 + rng.gen::<f64>() * 10.0),
                vehicle_count: round(congestion * 2.0 + rng.gen::<f64>() * 50.0),
                aqi: round(50.0 + congestion * 0.8 + rng.gen::<f64>() * 30.0),
                node: None,
            }
        })
        .collect()
}

/// Export rows with uniform figures. The node column is drawn from
/// `include_nodes`, or is [`ALL_NODES`] when the filter is empty.
pub fn export_rows<R: Rng + ?Sized>(
    range: TimeRange,
    include_nodes: &[String],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<AnalyticsRow> {
    bucket_starts(range, now)
        .into_iter()
        .map(|timestamp| AnalyticsRow {
            timestamp,
            congestion: rng.gen_range(0..=100),
            avg_speed: rng.gen_range(20..=80),
            vehicle_count: rng.gen_range(50..=250),
            aqi: rng.gen_range(50..=200),
            node: Some(
                include_nodes
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| ALL_NODES.to_string()),
            ),
        })
        .collect()
}

/// Current congestion per junction with a -20..=20 point improvement figure.
pub fn node_congestion<R: Rng + ?Sized>(node_names: &[String], rng: &mut R) -> Vec<NodeCongestion> {
    node_names
        .iter()
        .map(|node| NodeCongestion {
            node: node.clone(),
            congestion: rng.gen_range(0..=100),
            improvement: rng.gen_range(-20..=20),
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_bucket_layout() {
        let starts = bucket_starts(TimeRange::Day, noon());
        assert_eq!(starts.len(), 24);
        assert_eq!(starts[0], noon() - Duration::hours(24));
        assert_eq!(starts[23], noon() - Duration::hours(1));

        let starts = bucket_starts(TimeRange::Week, noon());
        assert_eq!(starts.len(), 28);
        assert_eq!(starts[1] - starts[0], Duration::hours(6));
    }

    #[test]
    fn test_peak_hours_are_congested() {
        let mut rng = StdRng::seed_from_u64(5);
        for row in traffic_series(TimeRange::Day, noon(), &mut rng) {
            if is_peak_hour(row.timestamp.hour()) {
                assert!((70..=95).contains(&row.congestion), "{row:?}");
            } else {
                assert!((30..=60).contains(&row.congestion), "{row:?}");
            }
            assert!(row.node.is_none());
        }
    }

    #[test]
    fn test_export_rows_ranges_and_node_column() {
        let mut rng = StdRng::seed_from_u64(11);
        let rows = export_rows(TimeRange::Month, &[], noon(), &mut rng);
        assert_eq!(rows.len(), 30);
        for row in &rows {
            assert!(row.congestion <= 100);
            assert!((20..=80).contains(&row.avg_speed));
            assert!((50..=250).contains(&row.vehicle_count));
            assert!((50..=200).contains(&row.aqi));
            assert_eq!(row.node.as_deref(), Some(ALL_NODES));
        }

        let filter = vec!["Hebbal Flyover".to_string(), "Silk Board Junction".to_string()];
        let rows = export_rows(TimeRange::Day, &filter, noon(), &mut rng);
        assert!(rows
            .iter()
            .all(|r| filter.contains(r.node.as_ref().unwrap())));
    }

    #[test]
    fn test_node_congestion_bounds() {
        let names: Vec<String> = crate::config::defaults::NODE_NAMES
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let mut rng = StdRng::seed_from_u64(2);
        let nodes = node_congestion(&names, &mut rng);
        assert_eq!(nodes.len(), 6);
        assert!(nodes
            .iter()
            .all(|n| n.congestion <= 100 && (-20..=20).contains(&n.improvement)));
    }
}
