//! Dashboard Configuration Module
//!
//! Provides the demo's tunable timings, credentials and junction list, loaded
//! from a TOML file.
//!
//! ## Loading Order
//!
//! 1. `RUSHSLAYER_CONFIG` environment variable (path to TOML file)
//! 2. `rushslayer.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(DashboardConfig::load());
//! let period = config::get().simulation.overview_period_ms;
//! ```

mod dashboard_config;
pub mod defaults;

pub use dashboard_config::*;

use std::sync::OnceLock;

/// Global dashboard configuration, initialized once at startup.
static DASHBOARD_CONFIG: OnceLock<DashboardConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// A second call is ignored with a warning.
pub fn init(config: DashboardConfig) {
    if DASHBOARD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once: ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called. A missing config is a startup bug.
#[allow(clippy::expect_used)]
pub fn get() -> &'static DashboardConfig {
    DASHBOARD_CONFIG
        .get()
        .expect("config::get() called before config::init(): this is a startup bug")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    DASHBOARD_CONFIG.get().is_some()
}
