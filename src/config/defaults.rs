//! System-wide default constants.
//!
//! Centralises the demo's magic numbers. Grouped by subsystem for easy
//! discovery. Every value here can be overridden from `rushslayer.toml`
//! except the demo credential identity fields.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Artificial latency applied before override submissions and CSV exports (ms).
pub const SUBMISSION_LATENCY_MS: u64 = 1_500;

/// Wall-clock cadence at which the simulation driver advances the dashboard (ms).
pub const DRIVER_TICK_MS: u64 = 1_000;

// ============================================================================
// Authentication (demo only)
// ============================================================================

/// The single accepted login email.
pub const ADMIN_EMAIL: &str = "admin@rushslayer.com";

/// The single accepted login password. Compared in plaintext.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Display name of the demo administrator.
pub const ADMIN_NAME: &str = "Admin User";

/// Identifier of the demo administrator.
pub const ADMIN_ID: &str = "admin_001";

/// Role reported for the demo administrator.
pub const ADMIN_ROLE: &str = "administrator";

/// Session lifetime (hours).
pub const SESSION_TTL_HOURS: u32 = 24;

// ============================================================================
// Traffic network
// ============================================================================

/// Junctions reported by the mock telemetry feed.
pub const NODE_NAMES: [&str; 6] = [
    "MG Road Junction",
    "Brigade Road Signal",
    "Commercial Street Cross",
    "Koramangala 5th Block",
    "Indiranagar 100 Feet Road",
    "Whitefield Main Road",
];

// ============================================================================
// Panel timers
// ============================================================================

/// Overview panel refresh period (ms).
pub const OVERVIEW_PERIOD_MS: u64 = 3_000;

/// Lower bound of the alert spawn period (ms).
pub const ALERT_SPAWN_MIN_MS: u64 = 15_000;

/// Upper bound of the alert spawn period (ms).
pub const ALERT_SPAWN_MAX_MS: u64 = 45_000;

/// Chance that a spawn tick produces a new alert.
pub const ALERT_SPAWN_PROBABILITY: f64 = 0.3;

/// Maximum number of alerts kept by the alerts panel.
pub const ALERT_LIST_CAP: usize = 5;

/// Alerts generated when the alerts panel mounts.
pub const INITIAL_ALERTS: usize = 2;

/// Auto-resolve sweep period (ms).
pub const RESOLVE_SWEEP_MS: u64 = 10_000;

/// Alerts older than this are auto-resolved by the sweep (ms).
pub const RESOLVE_AFTER_MS: u64 = 120_000;

/// Shortest accepted manual override (seconds).
pub const OVERRIDE_MIN_SECS: u32 = 10;

/// Longest accepted manual override (seconds).
pub const OVERRIDE_MAX_SECS: u32 = 300;

/// Open the overrides panel with two earlier entries in its history.
pub const SEED_OVERRIDE_HISTORY: bool = true;

// ============================================================================
// Feedback
// ============================================================================

/// Number of feedback submissions retained in memory.
pub const FEEDBACK_RETAINED: usize = 100;
