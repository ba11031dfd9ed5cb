use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Tracing filter used when `CARLINK_LOG_LEVEL` is not set.
    #[must_use]
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "trace",
            Environment::Test => "debug",
            Environment::Production => "error",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub gm_base_url: String,
    pub gm_request_timeout_secs: u64,
    pub gm_connect_timeout_secs: u64,
    pub gm_user_agent: String,
    pub max_body_bytes: usize,
}
