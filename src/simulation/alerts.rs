//! Alerts panel state and the emergency alert generator.
//!
//! The panel keeps at most `cap` alerts, newest first. Alerts only ever move
//! from active to resolved, either through the age sweep or an administrator.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::SimError;
use crate::telemetry::ids;
use crate::types::{AlertPriority, AlertStatus, EmergencyAlert, VehicleType};

/// Seconds until arrival for a newly raised alert.
const ESTIMATED_ARRIVAL_SECS: std::ops::Range<u32> = 30..330;

/// Resolved alerts shown under the active list.
pub const RECENT_RESOLVED_SHOWN: usize = 3;

/// A random active alert at one of `locations`, raised at `at`.
pub fn random_alert<R: Rng + ?Sized>(
    rng: &mut R,
    locations: &[String],
    at: DateTime<Utc>,
) -> EmergencyAlert {
    EmergencyAlert {
        id: ids::timestamped("alert", at, rng, 5),
        vehicle_type: *VehicleType::ALL.choose(rng).unwrap_or(&VehicleType::Ambulance),
        location: locations.choose(rng).cloned().unwrap_or_default(),
        priority: *AlertPriority::ALL.choose(rng).unwrap_or(&AlertPriority::Medium),
        timestamp: at,
        status: AlertStatus::Active,
        estimated_arrival: rng.gen_range(ESTIMATED_ARRIVAL_SECS),
    }
}

#[derive(Debug, Clone)]
pub struct AlertsPanel {
    alerts: Vec<EmergencyAlert>,
    audio_enabled: bool,
    spawn_period_ms: u64,
    cap: usize,
    last_alert_at: Option<DateTime<Utc>>,
}

impl AlertsPanel {
    pub(super) fn new(initial: Vec<EmergencyAlert>, spawn_period_ms: u64, cap: usize) -> Self {
        let cap = cap.max(1);
        let mut alerts = initial;
        alerts.truncate(cap);
        Self {
            alerts,
            audio_enabled: true,
            spawn_period_ms,
            cap,
            last_alert_at: None,
        }
    }

    /// All retained alerts, newest first.
    pub fn alerts(&self) -> &[EmergencyAlert] {
        &self.alerts
    }

    pub fn active(&self) -> impl Iterator<Item = &EmergencyAlert> {
        self.alerts.iter().filter(|a| a.is_active())
    }

    /// The most recent resolved alerts, newest first.
    pub fn recently_resolved(&self) -> impl Iterator<Item = &EmergencyAlert> {
        self.alerts
            .iter()
            .filter(|a| !a.is_active())
            .take(RECENT_RESOLVED_SHOWN)
    }

    pub const fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Spawn period drawn when the panel mounted.
    pub const fn spawn_period_ms(&self) -> u64 {
        self.spawn_period_ms
    }

    /// When the spawn timer last produced an alert.
    pub const fn last_alert_at(&self) -> Option<DateTime<Utc>> {
        self.last_alert_at
    }

    pub(super) fn set_audio(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    /// Prepend a new alert and drop anything beyond the cap. Returns the
    /// evicted alerts, oldest last.
    pub(super) fn push(&mut self, alert: EmergencyAlert) -> Vec<EmergencyAlert> {
        self.last_alert_at = Some(alert.timestamp);
        self.alerts.insert(0, alert);
        if self.alerts.len() > self.cap {
            self.alerts.split_off(self.cap)
        } else {
            Vec::new()
        }
    }

    /// Resolve every active alert strictly older than `max_age_ms`. Returns
    /// the ids that changed.
    pub(super) fn sweep(&mut self, now: DateTime<Utc>, max_age_ms: u64) -> Vec<String> {
        self.alerts
            .iter_mut()
            .filter(|a| a.is_active() && a.age_ms(now) > max_age_ms)
            .filter_map(|a| a.resolve().then(|| a.id.clone()))
            .collect()
    }

    /// Resolve one alert by id. Resolving an already-resolved alert is a
    /// no-op; the bool reports whether the status changed.
    pub(super) fn resolve(&mut self, id: &str) -> Result<(EmergencyAlert, bool), SimError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SimError::AlertNotFound(id.to_string()))?;
        let changed = alert.resolve();
        Ok((alert.clone(), changed))
    }
}
