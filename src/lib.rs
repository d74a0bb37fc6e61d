//! RUSHSLAYER: Traffic Dashboard Service
//!
//! Backend for the smart-traffic demo dashboard. Every data source is
//! synthetic.
//!
//! ## Architecture
//!
//! - **Telemetry**: mock junction snapshots and analytics series
//! - **Simulation**: panels driven by one deterministic timer queue
//! - **Export**: CSV and JSON analytics exports
//! - **Storage**: in-memory sessions and citizen feedback
//! - **API**: axum router for the demo endpoints and the dashboard

pub mod api;
pub mod config;
pub mod export;
pub mod simulation;
pub mod storage;
pub mod telemetry;
pub mod types;

// Re-export configuration
pub use config::DashboardConfig;

// Re-export commonly used types
pub use types::{
    Direction, EmergencyAlert, Lane, OverrideLog, SignalStatus, TimeRange, TrafficNode,
};

// Re-export the simulation entry points
pub use simulation::{Dashboard, Panel, SimError, SimEvent};
pub use telemetry::TelemetryGenerator;
