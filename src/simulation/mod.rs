//! Dashboard Simulation
//!
//! One event-driven loop replaces the independent UI timers of the demo:
//! - **Overview**: refreshes the node snapshot every 3 s while the simulator is on
//! - **Alerts**: spawns alerts on a period drawn at mount, sweeps out stale ones
//! - **Overrides**: one-shot completion timer per submitted override
//!
//! [`Dashboard::advance`] moves simulated time forward and fires every due
//! timer in order. The random source is injected, so a seed fixes the whole
//! run. Panels never share state: resolving an alert or applying an override
//! does not touch the overview's nodes.

mod alerts;
pub mod driver;
mod overrides;
mod overview;
mod scheduler;

pub use alerts::{random_alert, AlertsPanel, RECENT_RESOLVED_SHOWN};
pub use overrides::{validate as validate_override, OverridePanel, ValidOverride, HISTORY_SHOWN};
pub use overview::OverviewPanel;
pub use scheduler::{Fired, Scheduler, TimerId, TimerKind};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::telemetry::TelemetryGenerator;
use crate::types::{EmergencyAlert, OverrideLog, OverrideRequest, OverrideStatus};

// ============================================================================
// Panels, events, errors
// ============================================================================

/// A dashboard panel that owns timers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Overview,
    Alerts,
    Overrides,
}

impl Panel {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Alerts, Self::Overrides];
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "overview"),
            Self::Alerts => write!(f, "alerts"),
            Self::Overrides => write!(f, "overrides"),
        }
    }
}

impl std::str::FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Self::Overview),
            "alerts" => Ok(Self::Alerts),
            "overrides" => Ok(Self::Overrides),
            other => Err(format!("unknown panel '{other}'")),
        }
    }
}

/// Something observable that happened while the simulation advanced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    PanelMounted { panel: Panel, at: DateTime<Utc> },
    PanelUnmounted { panel: Panel, at: DateTime<Utc>, cancelled_timers: usize },
    NodesRefreshed { at: DateTime<Utc>, nodes: usize },
    SnapshotDiscarded { at: DateTime<Utc> },
    AlertRaised { alert: EmergencyAlert },
    AlertEvicted { alert_id: String, at: DateTime<Utc> },
    AudioCue { alert_id: String, location: String, at: DateTime<Utc> },
    AlertResolved { alert_id: String, at: DateTime<Utc>, manual: bool },
    OverrideActivated { log: OverrideLog },
    OverrideCompleted { override_id: String, at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("{0} panel is not mounted")]
    NotMounted(Panel),
    #[error("alert '{0}' not found")]
    AlertNotFound(String),
    #[error("{0}")]
    InvalidOverride(String),
}

// ============================================================================
// Dashboard
// ============================================================================

/// All panel state plus the scheduler that drives it.
#[derive(Debug)]
pub struct Dashboard<R: Rng = StdRng> {
    rng: R,
    epoch: DateTime<Utc>,
    scheduler: Scheduler,
    generator: TelemetryGenerator,
    settings: SimulationConfig,
    overview: Option<OverviewPanel>,
    alerts: Option<AlertsPanel>,
    overrides: Option<OverridePanel>,
}

impl<R: Rng> Dashboard<R> {
    /// A dashboard with no panels mounted. Simulated time starts at `epoch`.
    pub fn new(
        rng: R,
        epoch: DateTime<Utc>,
        generator: TelemetryGenerator,
        settings: SimulationConfig,
    ) -> Self {
        Self {
            rng,
            epoch,
            scheduler: Scheduler::new(),
            generator,
            settings,
            overview: None,
            alerts: None,
            overrides: None,
        }
    }

    /// Mount every panel, as the admin dashboard page does on load.
    pub fn mount_all(&mut self) -> Vec<SimEvent> {
        Panel::ALL.iter().flat_map(|&p| self.mount(p)).collect()
    }

    /// Current simulated wall-clock time.
    pub fn now(&self) -> DateTime<Utc> {
        self.at(self.scheduler.now_ms())
    }

    /// Simulated milliseconds since `epoch`.
    pub const fn elapsed_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    fn at(&self, ms: u64) -> DateTime<Utc> {
        i64::try_from(ms)
            .ok()
            .and_then(chrono::Duration::try_milliseconds)
            .and_then(|d| self.epoch.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn node_names(&self) -> &[String] {
        self.generator.node_names()
    }

    pub const fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    pub const fn is_mounted(&self, panel: Panel) -> bool {
        match panel {
            Panel::Overview => self.overview.is_some(),
            Panel::Alerts => self.alerts.is_some(),
            Panel::Overrides => self.overrides.is_some(),
        }
    }

    pub fn pending_timers(&self, panel: Panel) -> usize {
        self.scheduler.pending_for(panel)
    }

    /// Create a panel's state and arm its timers. Mounting an already
    /// mounted panel does nothing.
    pub fn mount(&mut self, panel: Panel) -> Vec<SimEvent> {
        if self.is_mounted(panel) {
            return Vec::new();
        }
        let now = self.now();
        let mut events = vec![SimEvent::PanelMounted { panel, at: now }];

        match panel {
            Panel::Overview => {
                let nodes = self.generator.snapshot(&mut self.rng, now);
                events.push(SimEvent::NodesRefreshed { at: now, nodes: nodes.len() });
                self.overview = Some(OverviewPanel::new(nodes, now));
                self.scheduler.every(
                    panel,
                    TimerKind::OverviewRefresh,
                    self.settings.overview_period_ms,
                );
            }
            Panel::Alerts => {
                let initial: Vec<EmergencyAlert> = (0..self.settings.initial_alerts)
                    .map(|_| random_alert(&mut self.rng, self.generator.node_names(), now))
                    .collect();
                events.extend(initial.iter().cloned().map(|alert| SimEvent::AlertRaised { alert }));

                let (lo, hi) = (self.settings.alert_spawn_min_ms, self.settings.alert_spawn_max_ms);
                let spawn_period_ms = self.rng.gen_range(lo.min(hi)..=hi.max(lo));
                debug!(spawn_period_ms, "Alerts panel spawn period drawn");

                self.alerts = Some(AlertsPanel::new(
                    initial,
                    spawn_period_ms,
                    self.settings.alert_list_cap,
                ));
                self.scheduler.every(panel, TimerKind::AlertSpawn, spawn_period_ms);
                self.scheduler
                    .every(panel, TimerKind::AlertSweep, self.settings.resolve_sweep_ms);
            }
            Panel::Overrides => {
                let panel = if self.settings.seed_override_history {
                    OverridePanel::with_history(self.generator.node_names(), now)
                } else {
                    OverridePanel::new()
                };
                for log in panel.active() {
                    let due = log.timestamp + chrono::Duration::seconds(i64::from(log.duration));
                    let remaining_ms = u64::try_from((due - now).num_milliseconds()).unwrap_or(0);
                    self.scheduler.once(
                        Panel::Overrides,
                        TimerKind::OverrideComplete {
                            override_id: log.id.clone(),
                        },
                        remaining_ms,
                    );
                }
                self.overrides = Some(panel);
            }
        }
        events
    }

    /// Cancel a panel's timers and drop its state.
    pub fn unmount(&mut self, panel: Panel) -> Vec<SimEvent> {
        if !self.is_mounted(panel) {
            return Vec::new();
        }
        let cancelled_timers = self.scheduler.cancel_owner(panel);
        match panel {
            Panel::Overview => self.overview = None,
            Panel::Alerts => self.alerts = None,
            Panel::Overrides => self.overrides = None,
        }
        vec![SimEvent::PanelUnmounted {
            panel,
            at: self.now(),
            cancelled_timers,
        }]
    }

    /// Move simulated time forward by `dt`, firing every timer that falls due.
    pub fn advance(&mut self, dt: Duration) -> Vec<SimEvent> {
        let step = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        let target = self.scheduler.now_ms().saturating_add(step);
        let mut events = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(target) {
            self.dispatch(fired, &mut events);
        }
        events
    }

    fn dispatch(&mut self, fired: Fired, events: &mut Vec<SimEvent>) {
        let at = self.at(fired.at_ms);
        match fired.kind {
            TimerKind::OverviewRefresh => {
                let Some(panel) = self.overview.as_mut() else { return };
                if panel.simulator_enabled() {
                    let nodes = self.generator.snapshot(&mut self.rng, at);
                    events.push(SimEvent::NodesRefreshed { at, nodes: nodes.len() });
                    panel.replace(nodes, at);
                } else {
                    panel.record_discarded_tick();
                    events.push(SimEvent::SnapshotDiscarded { at });
                }
            }
            TimerKind::AlertSpawn => {
                let Some(panel) = self.alerts.as_mut() else { return };
                let p = self.settings.alert_spawn_probability.clamp(0.0, 1.0);
                if !self.rng.gen_bool(p) {
                    return;
                }
                let alert = random_alert(&mut self.rng, self.generator.node_names(), at);
                info!(
                    alert_id = %alert.id,
                    vehicle = %alert.vehicle_type,
                    location = %alert.location,
                    "Emergency vehicle alert raised"
                );
                if panel.audio_enabled() && alert.priority == crate::types::AlertPriority::High {
                    info!(alert_id = %alert.id, "AUDIO ALERT: high priority emergency vehicle detected");
                    events.push(SimEvent::AudioCue {
                        alert_id: alert.id.clone(),
                        location: alert.location.clone(),
                        at,
                    });
                }
                events.push(SimEvent::AlertRaised { alert: alert.clone() });
                for evicted in panel.push(alert) {
                    events.push(SimEvent::AlertEvicted { alert_id: evicted.id, at });
                }
            }
            TimerKind::AlertSweep => {
                let Some(panel) = self.alerts.as_mut() else { return };
                for alert_id in panel.sweep(at, self.settings.resolve_after_ms) {
                    debug!(%alert_id, "Alert auto-resolved");
                    events.push(SimEvent::AlertResolved { alert_id, at, manual: false });
                }
            }
            TimerKind::OverrideComplete { override_id } => {
                let Some(panel) = self.overrides.as_mut() else { return };
                if let Some(log) = panel.complete_due(&override_id, at) {
                    info!(override_id = %log.id, node = %log.node, lane = %log.lane, "Signal override completed");
                    events.push(SimEvent::OverrideCompleted { override_id, at });
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Panel access and commands
    // ------------------------------------------------------------------------

    pub fn overview(&self) -> Result<&OverviewPanel, SimError> {
        self.overview.as_ref().ok_or(SimError::NotMounted(Panel::Overview))
    }

    pub fn alerts(&self) -> Result<&AlertsPanel, SimError> {
        self.alerts.as_ref().ok_or(SimError::NotMounted(Panel::Alerts))
    }

    pub fn overrides(&self) -> Result<&OverridePanel, SimError> {
        self.overrides.as_ref().ok_or(SimError::NotMounted(Panel::Overrides))
    }

    /// Switch the overview simulator. While off, refresh ticks still fire but
    /// the node list is left as it was.
    pub fn set_simulator(&mut self, enabled: bool) -> Result<(), SimError> {
        self.overview
            .as_mut()
            .ok_or(SimError::NotMounted(Panel::Overview))?
            .set_simulator(enabled);
        info!(enabled, "Overview simulator toggled");
        Ok(())
    }

    pub fn set_audio(&mut self, enabled: bool) -> Result<(), SimError> {
        self.alerts
            .as_mut()
            .ok_or(SimError::NotMounted(Panel::Alerts))?
            .set_audio(enabled);
        Ok(())
    }

    /// Resolve an alert on an administrator's request.
    pub fn resolve_alert(&mut self, id: &str) -> Result<(EmergencyAlert, Vec<SimEvent>), SimError> {
        let now = self.now();
        let panel = self.alerts.as_mut().ok_or(SimError::NotMounted(Panel::Alerts))?;
        let (alert, changed) = panel.resolve(id)?;
        let events = if changed {
            info!(alert_id = %alert.id, "Alert resolved manually");
            vec![SimEvent::AlertResolved {
                alert_id: alert.id.clone(),
                at: now,
                manual: true,
            }]
        } else {
            Vec::new()
        };
        Ok((alert, events))
    }

    /// Validate and apply a manual override, arming its completion timer.
    pub fn submit_override(
        &mut self,
        request: &OverrideRequest,
        user: &str,
    ) -> Result<(OverrideLog, Vec<SimEvent>), SimError> {
        let now = self.now();
        let Some(panel) = self.overrides.as_mut() else {
            return Err(SimError::NotMounted(Panel::Overrides));
        };
        let valid = validate_override(
            request,
            self.generator.node_names(),
            self.settings.override_min_secs,
            self.settings.override_max_secs,
        )?;

        let log = OverrideLog {
            id: panel.next_id(now),
            node: valid.node,
            lane: valid.lane,
            signal_phase: valid.signal_phase,
            duration: valid.duration,
            timestamp: now,
            user: user.to_string(),
            status: OverrideStatus::Active,
        };
        self.scheduler.once(
            Panel::Overrides,
            TimerKind::OverrideComplete {
                override_id: log.id.clone(),
            },
            u64::from(log.duration) * 1_000,
        );
        info!(
            override_id = %log.id,
            node = %log.node,
            lane = %log.lane,
            phase = %log.signal_phase,
            duration_secs = log.duration,
            "Signal override applied"
        );
        panel.record(log.clone());
        Ok((log.clone(), vec![SimEvent::OverrideActivated { log }]))
    }
}
