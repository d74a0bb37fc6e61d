//! Junction telemetry types: TrafficNode, Lane, Direction, SignalStatus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Lane Direction
// ============================================================================

/// Approach direction of a lane. Every node carries exactly one lane per variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Lane order used by every snapshot.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub const fn slug(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::North => write!(f, "North"),
            Self::South => write!(f, "South"),
            Self::East => write!(f, "East"),
            Self::West => write!(f, "West"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            other => Err(format!("unknown lane direction '{other}'")),
        }
    }
}

// ============================================================================
// Signal Status
// ============================================================================

/// Signal aspect shown to a lane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Red,
    Yellow,
    Green,
}

impl SignalStatus {
    pub const ALL: [Self; 3] = [Self::Red, Self::Yellow, Self::Green];
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Yellow => write!(f, "Yellow"),
            Self::Green => write!(f, "Green"),
        }
    }
}

impl std::str::FromStr for SignalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            other => Err(format!("unknown signal phase '{other}'")),
        }
    }
}

// ============================================================================
// Lane / Node
// ============================================================================

/// One approach lane of a junction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    /// `<node index>_<direction>`, e.g. `3_east`
    pub id: String,
    pub direction: Direction,
    pub vehicle_count: u32,
    /// Queue length in metres
    pub queue_length: u32,
    pub signal_status: SignalStatus,
    /// Seconds left in the current phase
    pub time_left: u32,
}

/// A simulated junction with four lanes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficNode {
    /// `node_<n>`, 1-based in configuration order
    pub id: String,
    pub name: String,
    pub lanes: Vec<Lane>,
    pub aqi: u32,
    pub last_updated: DateTime<Utc>,
}

impl TrafficNode {
    /// Mean queue length across the lanes, rounded to whole metres.
    pub fn average_queue_length(&self) -> u32 {
        if self.lanes.is_empty() {
            return 0;
        }
        let total: u32 = self.lanes.iter().map(|l| l.queue_length).sum();
        let count = u32::try_from(self.lanes.len()).unwrap_or(u32::MAX);
        (total + count / 2) / count
    }

    pub fn aqi_category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }

    /// True when the node carries exactly one lane per [`Direction`].
    pub fn has_complete_lanes(&self) -> bool {
        self.lanes.len() == Direction::ALL.len()
            && Direction::ALL
                .iter()
                .all(|d| self.lanes.iter().filter(|l| l.direction == *d).count() == 1)
    }
}

// ============================================================================
// Air Quality
// ============================================================================

/// Severity band of an Air Quality Index reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiCategory {
    pub const fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitive,
            151..=200 => Self::Unhealthy,
            _ => Self::VeryUnhealthy,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitive => "Unhealthy for Sensitive",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
        }
    }
}
