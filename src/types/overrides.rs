//! Manual signal override types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traffic::{Direction, SignalStatus};

/// Lifecycle of an override. Only `Active -> Completed` is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    Active,
    Completed,
}

/// Audit record of an administrator-issued signal command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverrideLog {
    /// `override_<millis>_<n>`, or `override_00<n>` for seeded history
    pub id: String,
    pub node: String,
    pub lane: Direction,
    /// Capitalized on the wire (`Red`), unlike lane signal status
    #[serde(with = "phase_name")]
    pub signal_phase: SignalStatus,
    /// Seconds the override holds before completing
    pub duration: u32,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub status: OverrideStatus,
}

impl OverrideLog {
    pub fn is_active(&self) -> bool {
        self.status == OverrideStatus::Active
    }

    /// Move to `Completed`. Returns false if already completed.
    pub fn complete(&mut self) -> bool {
        match self.status {
            OverrideStatus::Active => {
                self.status = OverrideStatus::Completed;
                true
            }
            OverrideStatus::Completed => false,
        }
    }
}

mod phase_name {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::SignalStatus;

    pub fn serialize<S: Serializer>(phase: &SignalStatus, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(phase)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SignalStatus, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// An override as submitted by an administrator, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(default)]
    pub signal_phase: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_is_one_way() {
        let mut log = OverrideLog {
            id: "override_1".to_string(),
            node: "MG Road Junction".to_string(),
            lane: Direction::North,
            signal_phase: SignalStatus::Green,
            duration: 45,
            timestamp: Utc::now(),
            user: "Admin User".to_string(),
            status: OverrideStatus::Active,
        };
        assert!(log.complete());
        assert!(!log.complete());
        assert!(!log.is_active());
    }

    #[test]
    fn test_log_phase_is_capitalized() {
        let log = OverrideLog {
            id: "override_1_1".to_string(),
            node: "MG Road Junction".to_string(),
            lane: Direction::West,
            signal_phase: SignalStatus::Yellow,
            duration: 20,
            timestamp: Utc::now(),
            user: "Admin User".to_string(),
            status: OverrideStatus::Active,
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["signalPhase"], "Yellow");
        assert_eq!(json["lane"], "West");
        let back: OverrideLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_request_accepts_partial_body() {
        let req: OverrideRequest = serde_json::from_str(r#"{"node":"X","signalPhase":"Red"}"#).unwrap();
        assert_eq!(req.signal_phase.as_deref(), Some("Red"));
        assert!(req.lane.is_none());
        assert!(req.duration.is_none());
    }
}
