//! Config Loading and Validation Tests
//!
//! Exercise `DashboardConfig::load_from_file` against real files on disk and
//! check that every range rule is reported.

use rushslayer::config::{ConfigError, DashboardConfig};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults_for_missing_sections() {
    let file = write_config(
        r#"
[server]
submission_latency_ms = 0

[network]
node_names = ["Silk Board", "Hebbal Flyover"]
"#,
    );
    let cfg = DashboardConfig::load_from_file(file.path()).unwrap();
    assert_eq!(cfg.server.submission_latency_ms, 0);
    assert_eq!(cfg.server.addr, "0.0.0.0:8080");
    assert_eq!(cfg.network.node_names, vec!["Silk Board", "Hebbal Flyover"]);
    assert_eq!(cfg.simulation.overview_period_ms, 3_000);
    assert_eq!(cfg.simulation.resolve_after_ms, 120_000);
}

#[test]
fn invalid_ranges_are_all_reported() {
    let file = write_config(
        r#"
[simulation]
overview_period_ms = 0
alert_spawn_min_ms = 50000
alert_spawn_max_ms = 10000
alert_list_cap = 0
"#,
    );
    match DashboardConfig::load_from_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("overview_period_ms")));
            assert!(errors.iter().any(|e| e.contains("alert_spawn_min_ms")));
            assert!(errors.iter().any(|e| e.contains("alert_list_cap")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[simulation\noverview_period_ms = ");
    assert!(matches!(
        DashboardConfig::load_from_file(file.path()),
        Err(ConfigError::Parse(_, _))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        DashboardConfig::load_from_file(&path),
        Err(ConfigError::Io(_, _))
    ));
}

#[test]
fn serialized_defaults_load_back() {
    let toml = DashboardConfig::default().to_toml().unwrap();
    let file = write_config(&toml);
    let cfg = DashboardConfig::load_from_file(file.path()).unwrap();
    assert_eq!(cfg.auth.admin_email, "admin@rushslayer.com");
    assert_eq!(cfg.network.node_names.len(), 6);
}

#[test]
fn global_config_is_set_once() {
    use rushslayer::config;

    let mut first = DashboardConfig::default();
    first.server.driver_tick_ms = 250;
    config::init(first);
    assert!(config::is_initialized());

    let mut second = DashboardConfig::default();
    second.server.driver_tick_ms = 999;
    config::init(second);
    assert_eq!(config::get().server.driver_tick_ms, 250);
}
