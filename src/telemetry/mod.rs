//! Mock Telemetry
//!
//! Stand-ins for a real sensor feed. All generators are pure given a random
//! source and a timestamp, so the simulation and the tests can inject both.

pub mod analytics;
mod generator;
pub mod ids;

pub use generator::{TelemetryGenerator, AQI, QUEUE_LENGTH, TIME_LEFT, VEHICLE_COUNT};
