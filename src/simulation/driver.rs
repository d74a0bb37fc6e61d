//! Wall-clock driver for a shared [`Dashboard`].
//!
//! Every `tick` of real time the driver advances the dashboard by
//! `tick * speed` of simulated time. Nothing else moves the simulated clock
//! while the server runs.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{Dashboard, SimEvent};

/// Cadence and time scale of the driver loop.
#[derive(Debug, Clone, Copy)]
pub struct DriverSettings {
    /// Real time between steps
    pub tick: Duration,
    /// Simulated seconds per real second
    pub speed: f64,
}

impl DriverSettings {
    /// Simulated time covered by one step. A non-positive or non-finite
    /// speed, or one whose step would overflow, freezes the clock.
    pub fn step(&self) -> Duration {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.tick.as_secs_f64() * self.speed).unwrap_or(Duration::ZERO)
    }
}

/// Run until `cancel_token` fires. Returns the number of steps taken.
pub async fn run(
    dashboard: Arc<RwLock<Dashboard>>,
    settings: DriverSettings,
    cancel_token: CancellationToken,
) -> u64 {
    info!(
        "[SimDriver] Task starting: tick {:?}, speed {}x",
        settings.tick, settings.speed
    );

    let step = settings.step();
    let mut interval = tokio::time::interval(settings.tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // the first tick completes immediately
    interval.tick().await;

    let mut steps = 0u64;
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("[SimDriver] Received shutdown signal after {} steps", steps);
                return steps;
            }
            _ = interval.tick() => {
                let events = dashboard.write().await.advance(step);
                steps += 1;
                for event in &events {
                    log_event(event);
                }
            }
        }
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::NodesRefreshed { nodes, .. } => debug!(nodes, "[SimDriver] Node snapshot refreshed"),
        SimEvent::SnapshotDiscarded { .. } => debug!("[SimDriver] Simulator off, tick discarded"),
        SimEvent::AlertEvicted { alert_id, .. } => debug!(%alert_id, "[SimDriver] Alert dropped past list cap"),
        // everything else is logged where it happens
        _ => {}
    }
}
