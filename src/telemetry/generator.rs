//! Mock junction telemetry.
//!
//! Every call produces a complete snapshot with no memory of the previous one:
//! each numeric field is an independent uniform draw and each lane's signal is
//! drawn on its own. Nothing correlates the four lanes of a junction, so a
//! snapshot can show all four approaches on green at once. That matches the
//! demo feed and is deliberately left alone.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

use crate::types::{Direction, Lane, SignalStatus, TrafficNode};

/// Vehicles waiting per lane.
pub const VEHICLE_COUNT: Range<u32> = 5..30;
/// Queue length per lane (metres).
pub const QUEUE_LENGTH: Range<u32> = 10..110;
/// Air quality index per junction.
pub const AQI: Range<u32> = 50..250;
/// Seconds left in the current phase.
pub const TIME_LEFT: Range<u32> = 10..70;

/// Produces [`TrafficNode`] snapshots for a fixed list of junctions.
#[derive(Debug, Clone)]
pub struct TelemetryGenerator {
    node_names: Vec<String>,
}

impl TelemetryGenerator {
    pub fn new(node_names: Vec<String>) -> Self {
        Self { node_names }
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    /// One full snapshot stamped with `at`.
    pub fn snapshot<R: Rng + ?Sized>(&self, rng: &mut R, at: DateTime<Utc>) -> Vec<TrafficNode> {
        self.node_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let n = index + 1;
                TrafficNode {
                    id: format!("node_{n}"),
                    name: name.clone(),
                    lanes: Direction::ALL
                        .iter()
                        .map(|&direction| random_lane(rng, n, direction))
                        .collect(),
                    aqi: rng.gen_range(AQI),
                    last_updated: at,
                }
            })
            .collect()
    }
}

fn random_lane<R: Rng + ?Sized>(rng: &mut R, node_index: usize, direction: Direction) -> Lane {
    Lane {
        id: format!("{node_index}_{}", direction.slug()),
        direction,
        vehicle_count: rng.gen_range(VEHICLE_COUNT),
        queue_length: rng.gen_range(QUEUE_LENGTH),
        signal_status: *SignalStatus::ALL.choose(rng).unwrap_or(&SignalStatus::Red),
        time_left: rng.gen_range(TIME_LEFT),
    }
}
