use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_accepts_testing_alias() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(parse_environment("testing").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CARLINK_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8003");
    assert_eq!(cfg.log_level, "trace");
    assert!(cfg.log_file.is_none());
    assert_eq!(cfg.gm_base_url, DEFAULT_GM_BASE_URL);
    assert_eq!(cfg.gm_request_timeout_secs, 10);
    assert_eq!(cfg.gm_connect_timeout_secs, 5);
    assert_eq!(cfg.gm_user_agent, "carlink/0.1 (vehicle-telemetry)");
    assert_eq!(cfg.max_body_bytes, 1_048_576);
}

#[test]
fn log_level_follows_environment_unless_overridden() {
    let mut map = HashMap::new();
    map.insert("CARLINK_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "error");

    map.insert("CARLINK_ENV", "testing");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");

    map.insert("CARLINK_LOG_LEVEL", "carlink_gm=debug,info");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "carlink_gm=debug,info");
}

#[test]
fn blank_log_file_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("CARLINK_LOG_FILE", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.log_file.is_none());

    map.insert("CARLINK_LOG_FILE", "/var/log/carlink.log");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.log_file.as_deref(),
        Some(std::path::Path::new("/var/log/carlink.log"))
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("CARLINK_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_BIND_ADDR"),
        "expected InvalidEnvVar(CARLINK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("CARLINK_GM_BASE_URL", "ftp://gm.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_GM_BASE_URL"),
        "expected InvalidEnvVar(CARLINK_GM_BASE_URL), got: {result:?}"
    );
}

#[test]
fn gm_request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("CARLINK_GM_REQUEST_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gm_request_timeout_secs, 3);
}

#[test]
fn gm_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("CARLINK_GM_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_GM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARLINK_GM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn gm_request_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CARLINK_GM_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_GM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARLINK_GM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn gm_connect_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CARLINK_GM_CONNECT_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_GM_CONNECT_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARLINK_GM_CONNECT_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_body_bytes_invalid() {
    let mut map = HashMap::new();
    map.insert("CARLINK_MAX_BODY_BYTES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARLINK_MAX_BODY_BYTES"),
        "expected InvalidEnvVar(CARLINK_MAX_BODY_BYTES), got: {result:?}"
    );
}
