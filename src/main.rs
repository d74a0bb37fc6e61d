//! RUSHSLAYER - traffic dashboard service
//!
//! Serves the demo API and drives the simulated dashboard panels in real
//! time.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address
//! cargo run --release
//!
//! # Ten simulated seconds per real second, reproducible run
//! cargo run --release -- --speed 10 --seed 7
//! ```
//!
//! # Environment Variables
//!
//! - `RUSHSLAYER_CONFIG`: Path to a TOML config file
//! - `RUSHSLAYER_SERVER_ADDR`: Bind address (overridden by `--addr`)
//! - `RUSHSLAYER_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use axum::Router;
use rushslayer::api::{create_app, DashboardState};
use rushslayer::config::{self, DashboardConfig};
use rushslayer::simulation::driver::{self, DriverSettings};
use rushslayer::simulation::Dashboard;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "rushslayer")]
#[command(about = "RUSHSLAYER traffic dashboard service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default from config: "0.0.0.0:8080")
    #[arg(short, long, env = "RUSHSLAYER_SERVER_ADDR")]
    addr: Option<String>,

    /// Simulated seconds per real second (1 = realtime, 0 = frozen clock)
    #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
    speed: f64,

    /// Seed for every random source, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

/// Fastest accepted `--speed`. Each driver step fires every timer that falls
/// due inside it, so the step has to stay small.
const MAX_SPEED: f64 = 1_000.0;

fn parse_speed(raw: &str) -> Result<f64, String> {
    let speed: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid speed '{raw}': {e}"))?;
    if (0.0..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(format!("speed must be between 0 and {MAX_SPEED}, got {raw}"))
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskName {
    HttpServer,
    SimDriver,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpServer => write!(f, "HttpServer"),
            Self::SimDriver => write!(f, "SimDriver"),
        }
    }
}

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Spawn the task that advances the dashboard clock.
fn spawn_sim_driver(
    task_set: &mut JoinSet<Result<TaskName>>,
    dashboard: Arc<RwLock<Dashboard>>,
    settings: DriverSettings,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        driver::run(dashboard, settings, cancel_token).await;
        Ok(TaskName::SimDriver)
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring...");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Supervisor: shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("Supervisor: task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("Supervisor: task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("Supervisor: task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("Supervisor: all tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // let in-flight tasks observe the cancellation and finish
    while let Some(result) = task_set.join_next().await {
        if let Ok(Ok(task_name)) = result {
            info!("Supervisor: task {} stopped", task_name);
        }
    }

    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::init(DashboardConfig::load());
    let dashboard_config = config::get();
    info!(
        nodes = dashboard_config.network.node_names.len(),
        overview_period_ms = dashboard_config.simulation.overview_period_ms,
        "Dashboard configuration loaded"
    );

    let server_addr = args
        .addr
        .unwrap_or_else(|| dashboard_config.server.addr.clone());
    let settings = DriverSettings {
        tick: dashboard_config.server.driver_tick(),
        speed: args.speed,
    };

    info!("==============================================================");
    info!("  RUSHSLAYER - Smart Traffic Management Dashboard (demo)");
    info!("==============================================================");
    if let Some(seed) = args.seed {
        info!(seed, "Deterministic run");
    }

    let state = DashboardState::new(dashboard_config.clone(), args.seed);
    let dashboard = Arc::clone(&state.dashboard);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on http://{}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());
    spawn_sim_driver(&mut task_set, dashboard, settings, cancel_token.clone());

    run_supervisor(&mut task_set, cancel_token).await
}
