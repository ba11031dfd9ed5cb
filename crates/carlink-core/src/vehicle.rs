//! Vehicle domain records as exposed to API callers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overview of a single vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vin: String,
    pub color: String,
    /// Derived from the vendor's two-door / four-door flags.
    pub door_count: i64,
    pub drive_train: String,
}

/// Lock state of one door.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorEntry {
    /// Vendor location label, e.g. `frontLeft`.
    pub location: String,
    pub locked: bool,
}

/// Remaining energy as reported by the vendor.
///
/// The vendor reports both fields for every vehicle; in practice at most one
/// is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLevels {
    pub fuel_percent: Option<f64>,
    pub battery_percent: Option<f64>,
}

/// Fuel or battery level returned by the energy endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentage {
    pub percent: Option<f64>,
}

/// Engine verbs accepted from API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineAction {
    Start,
    Stop,
}

impl EngineAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EngineAction::Start => "START",
            EngineAction::Stop => "STOP",
        }
    }
}

impl FromStr for EngineAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(EngineAction::Start),
            "STOP" => Ok(EngineAction::Stop),
            other => Err(format!("Unsupported data type: {other}")),
        }
    }
}

impl std::fmt::Display for EngineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor-reported outcome of an engine command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineActionStatus {
    Executed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineActionResult {
    pub status: EngineActionStatus,
}

/// Outcome reported back to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineOutcome {
    Success,
    Error,
}

impl From<EngineActionStatus> for EngineOutcome {
    fn from(status: EngineActionStatus) -> Self {
        match status {
            EngineActionStatus::Executed => EngineOutcome::Success,
            EngineActionStatus::Failed => EngineOutcome::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineActionResponse {
    pub status: EngineOutcome,
}
