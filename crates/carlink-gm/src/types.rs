//! GM API wire types.
//!
//! Every response is wrapped in a `{"status": "200", "reason": "...", ...}`
//! envelope; [`Envelope`] captures that pattern generically and flattens the
//! operation-specific payload next to it.

use carlink_core::{DoorEntry, EnergyLevels, EngineActionStatus};
use serde::{Deserialize, Deserializer, Serialize};

use crate::coerce::{CoercedFields, FieldSpec, FieldType, RawRecord, TypedRecord};
use crate::error::CoercionError;

/// Request body shared by every operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmRequest<'a> {
    /// Vehicle id as a decimal string.
    pub id: String,
    pub response_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
}

impl<'a> GmRequest<'a> {
    pub const RESPONSE_TYPE: &'static str = "JSON";

    #[must_use]
    pub fn new(vehicle_id: i64, command: Option<&'a str>) -> Self {
        Self {
            id: vehicle_id.to_string(),
            response_type: Self::RESPONSE_TYPE,
            command,
        }
    }
}

/// Top-level envelope for all GM API responses.
///
/// `status` is an integer encoded as a string; anything but `"200"` means the
/// vendor rejected the request and `reason` says why. A missing `status`
/// stays empty and fails the numeric check like any other bad code.
#[derive(Debug, Deserialize)]
pub struct Envelope<P> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(flatten)]
    pub payload: P,
}

/// Payload of the flat-record endpoints (vehicle info, energy).
#[derive(Debug, Default, Deserialize)]
pub struct RecordPayload {
    #[serde(default, deserialize_with = "null_as_empty_record")]
    pub data: RawRecord,
}

fn null_as_empty_record<'de, D>(deserializer: D) -> Result<RawRecord, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawRecord>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// getSecurityStatusService
// ---------------------------------------------------------------------------

/// Payload of the door listing: `{"data": {"doors": {"type": "Array", "values": [...]}}}`.
#[derive(Debug, Default, Deserialize)]
pub struct DoorsPayload {
    #[serde(default)]
    pub data: Option<DoorsData>,
}

#[derive(Debug, Deserialize)]
pub struct DoorsData {
    pub doors: TaggedArray,
}

/// An array nested inside its own `{type, values}` envelope.
#[derive(Debug, Deserialize)]
pub struct TaggedArray {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub values: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// actionEngineService
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default, rename = "actionResult")]
    pub action_result: Option<ActionResultRaw>,
}

#[derive(Debug, Deserialize)]
pub struct ActionResultRaw {
    pub status: String,
}

/// Engine verbs in the vendor's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    StartVehicle,
    StopVehicle,
}

impl EngineCommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EngineCommand::StartVehicle => "START_VEHICLE",
            EngineCommand::StopVehicle => "STOP_VEHICLE",
        }
    }
}

/// Maps the vendor's `EXECUTED` / `FAILED` onto [`EngineActionStatus`].
///
/// # Errors
///
/// Returns [`CoercionError::UnsupportedDataType`] for any other value.
pub fn parse_action_status(status: &str) -> Result<EngineActionStatus, CoercionError> {
    match status {
        "EXECUTED" => Ok(EngineActionStatus::Executed),
        "FAILED" => Ok(EngineActionStatus::Failed),
        other => Err(CoercionError::UnsupportedDataType(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Typed records
// ---------------------------------------------------------------------------

/// Flattened `getVehicleInfoService` data, before door-count reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFlags {
    pub vin: String,
    pub color: String,
    pub is_four_door: bool,
    pub is_two_door: bool,
    pub drive_train: String,
}

impl TypedRecord for VehicleFlags {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("vin", FieldType::Text),
        FieldSpec::new("color", FieldType::Text),
        FieldSpec::new("fourDoorSedan", FieldType::Bool),
        FieldSpec::new("twoDoorCoupe", FieldType::Bool),
        FieldSpec::new("driveTrain", FieldType::Text),
    ];

    fn from_fields(mut fields: CoercedFields) -> Self {
        Self {
            vin: fields.take_text("vin"),
            color: fields.take_text("color"),
            is_four_door: fields.take_bool("fourDoorSedan"),
            is_two_door: fields.take_bool("twoDoorCoupe"),
            drive_train: fields.take_text("driveTrain"),
        }
    }
}

impl TypedRecord for DoorEntry {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("location", FieldType::Text),
        FieldSpec::new("locked", FieldType::Bool),
    ];

    fn from_fields(mut fields: CoercedFields) -> Self {
        Self {
            location: fields.take_text("location"),
            locked: fields.take_bool("locked"),
        }
    }
}

impl TypedRecord for EnergyLevels {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("tankLevel", FieldType::Float),
        FieldSpec::new("batteryLevel", FieldType::Float),
    ];

    fn from_fields(mut fields: CoercedFields) -> Self {
        Self {
            fuel_percent: fields.take_float("tankLevel"),
            battery_percent: fields.take_float("batteryLevel"),
        }
    }
}
