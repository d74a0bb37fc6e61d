//! Overview panel state: the latest node snapshot and the simulator switch.

use chrono::{DateTime, Utc};

use crate::types::TrafficNode;

#[derive(Debug, Clone)]
pub struct OverviewPanel {
    nodes: Vec<TrafficNode>,
    simulator_enabled: bool,
    refreshed_at: DateTime<Utc>,
    refreshes: u64,
    discarded_ticks: u64,
}

impl OverviewPanel {
    pub(super) fn new(nodes: Vec<TrafficNode>, at: DateTime<Utc>) -> Self {
        Self {
            nodes,
            simulator_enabled: true,
            refreshed_at: at,
            refreshes: 0,
            discarded_ticks: 0,
        }
    }

    pub fn nodes(&self) -> &[TrafficNode] {
        &self.nodes
    }

    pub const fn simulator_enabled(&self) -> bool {
        self.simulator_enabled
    }

    pub const fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Ticks that replaced the node list.
    pub const fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Ticks that fired while the simulator was off.
    pub const fn discarded_ticks(&self) -> u64 {
        self.discarded_ticks
    }

    pub(super) fn set_simulator(&mut self, enabled: bool) {
        self.simulator_enabled = enabled;
    }

    /// Wholesale replacement; nothing from the previous snapshot survives.
    pub(super) fn replace(&mut self, nodes: Vec<TrafficNode>, at: DateTime<Utc>) {
        self.nodes = nodes;
        self.refreshed_at = at;
        self.refreshes += 1;
    }

    pub(super) fn record_discarded_tick(&mut self) {
        self.discarded_ticks += 1;
    }
}
