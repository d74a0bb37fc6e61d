//! Emergency vehicle alert types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Ambulance,
    FireTruck,
    Police,
}

impl VehicleType {
    pub const ALL: [Self; 3] = [Self::Ambulance, Self::FireTruck, Self::Police];
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambulance => write!(f, "ambulance"),
            Self::FireTruck => write!(f, "fire truck"),
            Self::Police => write!(f, "police"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

impl AlertPriority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Lifecycle of an alert. Only `Active -> Resolved` is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// An emergency vehicle approaching a junction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    /// `alert_<millis>_<5 base-36 chars>`
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub location: String,
    pub priority: AlertPriority,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    /// Seconds until the vehicle reaches the junction
    pub estimated_arrival: u32,
}

impl EmergencyAlert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    /// Move to `Resolved`. Returns false if the alert was already resolved.
    pub fn resolve(&mut self) -> bool {
        match self.status {
            AlertStatus::Active => {
                self.status = AlertStatus::Resolved;
                true
            }
            AlertStatus::Resolved => false,
        }
    }

    /// Milliseconds since the alert was raised; zero if `now` precedes it.
    pub fn age_ms(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.timestamp).num_milliseconds()).unwrap_or(0)
    }
}
