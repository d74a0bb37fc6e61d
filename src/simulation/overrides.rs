//! Manual override panel: submission validation and the override log.

use chrono::{DateTime, Utc};

use super::SimError;
use crate::types::{Direction, OverrideLog, OverrideRequest, OverrideStatus, SignalStatus};

/// Overrides listed in the history view.
pub const HISTORY_SHOWN: usize = 5;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOverride {
    pub node: String,
    pub lane: Direction,
    pub signal_phase: SignalStatus,
    pub duration: u32,
}

/// Check an override request against the known junctions and duration bounds.
pub fn validate(
    request: &OverrideRequest,
    known_nodes: &[String],
    min_secs: u32,
    max_secs: u32,
) -> Result<ValidOverride, SimError> {
    let invalid = |msg: String| SimError::InvalidOverride(msg);

    let (Some(node), Some(lane), Some(phase), Some(duration)) = (
        required(request.node.as_deref()),
        required(request.lane.as_deref()),
        required(request.signal_phase.as_deref()),
        request.duration,
    ) else {
        return Err(invalid(
            "node, lane, signalPhase and duration are all required".to_string(),
        ));
    };

    if !known_nodes.iter().any(|n| n == node) {
        return Err(invalid(format!("unknown traffic node '{node}'")));
    }
    let lane: Direction = lane.parse().map_err(invalid)?;
    let signal_phase: SignalStatus = phase.parse().map_err(invalid)?;
    if !(min_secs..=max_secs).contains(&duration) {
        return Err(invalid(format!(
            "duration must be between {min_secs} and {max_secs} seconds, got {duration}"
        )));
    }

    Ok(ValidOverride {
        node: node.to_string(),
        lane,
        signal_phase,
        duration,
    })
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct OverridePanel {
    logs: Vec<OverrideLog>,
    issued: u64,
}

impl OverridePanel {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// A panel whose history already holds a completed override from five
    /// minutes ago and an active one from two minutes ago.
    pub(super) fn with_history(nodes: &[String], now: DateTime<Utc>) -> Self {
        let node = |i: usize| nodes.get(i).or_else(|| nodes.first()).cloned().unwrap_or_default();
        let earlier = |secs: i64| now - chrono::Duration::seconds(secs);
        Self {
            logs: vec![
                OverrideLog {
                    id: "override_002".to_string(),
                    node: node(1),
                    lane: Direction::East,
                    signal_phase: SignalStatus::Red,
                    duration: 60,
                    timestamp: earlier(120),
                    user: "Admin User".to_string(),
                    status: OverrideStatus::Active,
                },
                OverrideLog {
                    id: "override_001".to_string(),
                    node: node(0),
                    lane: Direction::North,
                    signal_phase: SignalStatus::Green,
                    duration: 45,
                    timestamp: earlier(300),
                    user: "Admin User".to_string(),
                    status: OverrideStatus::Completed,
                },
            ],
            issued: 0,
        }
    }

    /// `override_<millis>_<n>`, unique within the panel even when the clock
    /// has not moved.
    pub(super) fn next_id(&mut self, now: DateTime<Utc>) -> String {
        self.issued += 1;
        format!("override_{}_{}", now.timestamp_millis(), self.issued)
    }

    /// Every override since the panel mounted, newest first.
    pub fn logs(&self) -> &[OverrideLog] {
        &self.logs
    }

    pub fn active(&self) -> impl Iterator<Item = &OverrideLog> {
        self.logs.iter().filter(|l| l.is_active())
    }

    pub fn history(&self) -> &[OverrideLog] {
        &self.logs[..self.logs.len().min(HISTORY_SHOWN)]
    }

    pub(super) fn record(&mut self, log: OverrideLog) {
        self.logs.insert(0, log);
    }

    /// Complete the active override `id` whose duration has elapsed by `now`.
    pub(super) fn complete_due(&mut self, id: &str, now: DateTime<Utc>) -> Option<OverrideLog> {
        let log = self.logs.iter_mut().find(|l| {
            l.id == id
                && l.status == OverrideStatus::Active
                && now >= l.timestamp + chrono::Duration::seconds(i64::from(l.duration))
        })?;
        log.complete().then(|| log.clone())
    }
}
