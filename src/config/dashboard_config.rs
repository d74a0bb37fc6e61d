//! Dashboard Configuration - demo timings, credentials and network as TOML values
//!
//! Each struct implements `Default` with the values from [`super::defaults`],
//! so a missing file (or a missing section) behaves exactly like the stock demo.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$RUSHSLAYER_CONFIG` env var
/// 2. `./rushslayer.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Demo credential pair and session lifetime
    #[serde(default)]
    pub auth: AuthConfig,

    /// Junction names used by every generator
    #[serde(default)]
    pub network: NetworkConfig,

    /// Panel timer periods and lifecycle limits
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Feedback intake
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    /// 1. `$RUSHSLAYER_CONFIG` environment variable
    /// 2. `./rushslayer.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("RUSHSLAYER_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from RUSHSLAYER_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from RUSHSLAYER_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "RUSHSLAYER_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("rushslayer.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./rushslayer.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./rushslayer.toml, using defaults");
                }
            }
        }

        info!("No rushslayer.toml found: using built-in defaults");
        Self::default()
    }

    /// Parse and validate a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the full config (defaults included) to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check cross-field constraints. Collects every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let sim = &self.simulation;

        if self.network.node_names.is_empty() {
            errors.push("network.node_names must not be empty".to_string());
        }
        if self.network.node_names.iter().any(|n| n.trim().is_empty()) {
            errors.push("network.node_names must not contain blank names".to_string());
        }
        if sim.overview_period_ms == 0 {
            errors.push("simulation.overview_period_ms must be > 0".to_string());
        }
        if sim.alert_spawn_min_ms == 0 || sim.alert_spawn_min_ms > sim.alert_spawn_max_ms {
            errors.push(format!(
                "simulation.alert_spawn_min_ms ({}) must be > 0 and <= alert_spawn_max_ms ({})",
                sim.alert_spawn_min_ms, sim.alert_spawn_max_ms
            ));
        }
        if !(0.0..=1.0).contains(&sim.alert_spawn_probability) {
            errors.push(format!(
                "simulation.alert_spawn_probability ({}) must be within 0.0..=1.0",
                sim.alert_spawn_probability
            ));
        }
        if sim.alert_list_cap == 0 {
            errors.push("simulation.alert_list_cap must be > 0".to_string());
        }
        if sim.initial_alerts > sim.alert_list_cap {
            errors.push(format!(
                "simulation.initial_alerts ({}) must be <= alert_list_cap ({})",
                sim.initial_alerts, sim.alert_list_cap
            ));
        }
        if sim.resolve_sweep_ms == 0 {
            errors.push("simulation.resolve_sweep_ms must be > 0".to_string());
        }
        if sim.override_min_secs == 0 || sim.override_min_secs > sim.override_max_secs {
            errors.push(format!(
                "simulation.override_min_secs ({}) must be > 0 and <= override_max_secs ({})",
                sim.override_min_secs, sim.override_max_secs
            ));
        }
        if self.auth.session_ttl_hours == 0 {
            errors.push("auth.session_ttl_hours must be > 0".to_string());
        }
        if self.server.driver_tick_ms == 0 {
            errors.push("server.driver_tick_ms must be > 0".to_string());
        }
        if self.feedback.max_retained == 0 {
            errors.push("feedback.max_retained must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
    /// Artificial latency before override submissions and CSV exports (ms)
    pub submission_latency_ms: u64,
    /// Wall-clock cadence of the simulation driver (ms)
    pub driver_tick_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
            submission_latency_ms: defaults::SUBMISSION_LATENCY_MS,
            driver_tick_ms: defaults::DRIVER_TICK_MS,
        }
    }
}

impl ServerConfig {
    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission_latency_ms)
    }

    pub fn driver_tick(&self) -> Duration {
        Duration::from_millis(self.driver_tick_ms)
    }
}

/// The demo credential pair. Not a security boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub session_ttl_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: defaults::ADMIN_EMAIL.to_string(),
            admin_password: defaults::ADMIN_PASSWORD.to_string(),
            admin_name: defaults::ADMIN_NAME.to_string(),
            session_ttl_hours: defaults::SESSION_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub node_names: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_names: defaults::NODE_NAMES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Panel timer periods and lifecycle limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub overview_period_ms: u64,
    pub alert_spawn_min_ms: u64,
    pub alert_spawn_max_ms: u64,
    pub alert_spawn_probability: f64,
    pub alert_list_cap: usize,
    pub initial_alerts: usize,
    pub resolve_sweep_ms: u64,
    pub resolve_after_ms: u64,
    pub override_min_secs: u32,
    pub override_max_secs: u32,
    pub seed_override_history: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            overview_period_ms: defaults::OVERVIEW_PERIOD_MS,
            alert_spawn_min_ms: defaults::ALERT_SPAWN_MIN_MS,
            alert_spawn_max_ms: defaults::ALERT_SPAWN_MAX_MS,
            alert_spawn_probability: defaults::ALERT_SPAWN_PROBABILITY,
            alert_list_cap: defaults::ALERT_LIST_CAP,
            initial_alerts: defaults::INITIAL_ALERTS,
            resolve_sweep_ms: defaults::RESOLVE_SWEEP_MS,
            resolve_after_ms: defaults::RESOLVE_AFTER_MS,
            override_min_secs: defaults::OVERRIDE_MIN_SECS,
            override_max_secs: defaults::OVERRIDE_MAX_SECS,
            seed_override_history: defaults::SEED_OVERRIDE_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Submissions kept in memory (oldest dropped first)
    pub max_retained: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            max_retained: defaults::FEEDBACK_RETAINED,
        }
    }
}
