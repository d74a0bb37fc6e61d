//! Headless Dashboard Simulation
//!
//! Runs the dashboard panels for a fixed stretch of simulated time without a
//! server and prints every event as one JSON line on stdout. The mission log
//! goes to stderr. With `--seed` and `--epoch` the output is byte-for-byte
//! reproducible.
//!
//! # Usage
//! ```bash
//! ./simulation --minutes 10 --seed 7 --epoch 2025-01-01T08:00:00Z > events.jsonl
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use rand::prelude::*;
use std::io::{self, Write};
use std::time::Duration;

use rushslayer::config::DashboardConfig;
use rushslayer::simulation::{Dashboard, SimEvent};
use rushslayer::telemetry::TelemetryGenerator;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "rushslayer-simulation")]
#[command(about = "Headless run of the RUSHSLAYER dashboard panels")]
#[command(version)]
struct Args {
    /// Simulated duration in minutes
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=1440))]
    minutes: u64,

    /// Simulated milliseconds per step
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    step_ms: u64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated start time (RFC 3339); defaults to now
    #[arg(long)]
    epoch: Option<DateTime<Utc>>,

    /// Suppress mission log (only output events)
    #[arg(short, long)]
    quiet: bool,
}

fn log_mission(elapsed_ms: u64, message: &str, quiet: bool) {
    if !quiet {
        let secs = elapsed_ms / 1_000;
        eprintln!("[{:02}:{:02}:{:02}] {}", secs / 3600, (secs / 60) % 60, secs % 60, message);
    }
}

fn emit(out: &mut impl Write, events: &[SimEvent]) -> Result<()> {
    for event in events {
        serde_json::to_writer(&mut *out, event).context("Failed to encode event")?;
        writeln!(out).context("Failed to write event")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load();
    config
        .validate()
        .context("Invalid dashboard configuration")?;

    let rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let epoch = args.epoch.unwrap_or_else(Utc::now);

    let mut dashboard = Dashboard::new(
        rng,
        epoch,
        TelemetryGenerator::new(config.network.node_names.clone()),
        config.simulation.clone(),
    );

    log_mission(0, &"=".repeat(60), args.quiet);
    log_mission(0, "RUSHSLAYER DASHBOARD SIMULATION", args.quiet);
    log_mission(0, &"=".repeat(60), args.quiet);
    log_mission(0, &format!("  Junctions: {}", config.network.node_names.len()), args.quiet);
    log_mission(0, &format!("  Duration: {} min, step {} ms", args.minutes, args.step_ms), args.quiet);
    log_mission(0, &format!("  Epoch: {}", epoch.to_rfc3339()), args.quiet);
    if let Some(seed) = args.seed {
        log_mission(0, &format!("  Random seed: {seed}"), args.quiet);
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    emit(&mut out, &dashboard.mount_all())?;

    let total_ms = args.minutes * 60_000;
    let step = Duration::from_millis(args.step_ms);
    let mut alerts_raised = 0usize;
    let mut refreshes = 0usize;

    while dashboard.elapsed_ms() < total_ms {
        let events = dashboard.advance(step);
        for event in &events {
            match event {
                SimEvent::AlertRaised { alert } => {
                    alerts_raised += 1;
                    log_mission(
                        dashboard.elapsed_ms(),
                        &format!("ALERT {} {} at {}", alert.priority, alert.vehicle_type, alert.location),
                        args.quiet,
                    );
                }
                SimEvent::AlertResolved { alert_id, .. } => {
                    log_mission(dashboard.elapsed_ms(), &format!("resolved {alert_id}"), args.quiet);
                }
                SimEvent::NodesRefreshed { .. } => refreshes += 1,
                _ => {}
            }
        }
        emit(&mut out, &events)?;
    }
    out.flush().context("Failed to flush output")?;

    log_mission(dashboard.elapsed_ms(), "", args.quiet);
    log_mission(
        dashboard.elapsed_ms(),
        &format!("Done: {refreshes} overview refreshes, {alerts_raised} alerts raised"),
        args.quiet,
    );
    Ok(())
}
