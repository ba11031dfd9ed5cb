use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_GM_BASE_URL: &str = "http://gmapi.azurewebsites.net";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CARLINK_ENV", "development"))?;

    let bind_addr = or_default("CARLINK_BIND_ADDR", "0.0.0.0:8003")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CARLINK_BIND_ADDR", e.to_string()))?;

    let log_level = lookup("CARLINK_LOG_LEVEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| env.default_log_level().to_string());
    let log_file = lookup("CARLINK_LOG_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let gm_base_url = or_default("CARLINK_GM_BASE_URL", DEFAULT_GM_BASE_URL);
    if !(gm_base_url.starts_with("http://") || gm_base_url.starts_with("https://")) {
        return Err(invalid(
            "CARLINK_GM_BASE_URL",
            format!("expected an http(s) URL, got '{gm_base_url}'"),
        ));
    }

    let gm_request_timeout_secs = parse_u64("CARLINK_GM_REQUEST_TIMEOUT_SECS", "10")?;
    let gm_connect_timeout_secs = parse_u64("CARLINK_GM_CONNECT_TIMEOUT_SECS", "5")?;
    if gm_request_timeout_secs == 0 {
        return Err(invalid(
            "CARLINK_GM_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    if gm_connect_timeout_secs == 0 {
        return Err(invalid(
            "CARLINK_GM_CONNECT_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let gm_user_agent = or_default("CARLINK_GM_USER_AGENT", "carlink/0.1 (vehicle-telemetry)");

    let max_body_bytes = or_default("CARLINK_MAX_BODY_BYTES", "1048576")
        .parse::<usize>()
        .map_err(|e| invalid("CARLINK_MAX_BODY_BYTES", e.to_string()))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        log_file,
        gm_base_url,
        gm_request_timeout_secs,
        gm_connect_timeout_secs,
        gm_user_agent,
        max_body_bytes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// `testing` is accepted as an alias for `test`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" | "testing" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARLINK_ENV".to_string(),
            reason: format!(
                "unknown environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
