//! Shared types for the carlink workspace: domain records, the classified
//! error carried to callers, per-request logging context, and configuration.

pub mod app_config;
pub mod config;
pub mod context;
pub mod error;
pub mod vehicle;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use context::RequestContext;
pub use error::{ClassifiedError, ConfigError, ErrorKind};
pub use vehicle::{
    DoorEntry, EnergyLevels, EngineAction, EngineActionResponse, EngineActionResult,
    EngineActionStatus, EngineOutcome, Percentage, VehicleInfo,
};
