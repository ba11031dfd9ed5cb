use std::sync::Arc;

use carlink_core::{
    ClassifiedError, DoorEntry, EngineAction, EngineActionResponse, EngineOutcome, ErrorKind,
    Percentage, RequestContext, VehicleInfo,
};
use carlink_gm::{EngineCommand, VehicleConnector, VehicleFlags};

use crate::percent::round_percent;

/// Stateless façade over a [`VehicleConnector`].
///
/// Each operation makes at most one upstream call and never retries.
#[derive(Clone)]
pub struct VehicleService {
    connector: Arc<dyn VehicleConnector>,
}

impl VehicleService {
    #[must_use]
    pub fn new(connector: Arc<dyn VehicleConnector>) -> Self {
        Self { connector }
    }

    /// Vehicle overview with the door flags collapsed into a count.
    ///
    /// # Errors
    ///
    /// Connector failures unchanged, plus `AmbiguousDoorCount` when both door
    /// flags are set and `UndeterminedDoorCount` when neither is.
    pub async fn get_vehicle(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<VehicleInfo, ClassifiedError> {
        let flags = self.connector.get_vehicle(ctx, vehicle_id).await?;
        let door_count = door_count(&flags)?;
        Ok(VehicleInfo {
            vin: flags.vin,
            color: flags.color,
            door_count,
            drive_train: flags.drive_train,
        })
    }

    /// # Errors
    ///
    /// Connector failures unchanged.
    pub async fn get_vehicle_doors(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Vec<DoorEntry>, ClassifiedError> {
        self.connector.get_vehicle_doors(ctx, vehicle_id).await
    }

    /// # Errors
    ///
    /// Connector failures unchanged.
    pub async fn get_vehicle_fuel(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Percentage, ClassifiedError> {
        let levels = self.connector.get_energy_levels(ctx, vehicle_id).await?;
        Ok(Percentage {
            percent: levels.fuel_percent.map(round_percent),
        })
    }

    /// # Errors
    ///
    /// Connector failures unchanged.
    pub async fn get_vehicle_battery(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Percentage, ClassifiedError> {
        let levels = self.connector.get_energy_levels(ctx, vehicle_id).await?;
        Ok(Percentage {
            percent: levels.battery_percent.map(round_percent),
        })
    }

    /// Starts or stops the engine.
    ///
    /// `action` is validated before anything is sent upstream.
    ///
    /// # Errors
    ///
    /// `UnsupportedAction` (400) for anything but `START` or `STOP`, otherwise
    /// connector failures unchanged.
    pub async fn send_engine_action(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
        action: &str,
    ) -> Result<EngineActionResponse, ClassifiedError> {
        let action = action.parse::<EngineAction>().map_err(|cause| {
            ClassifiedError::bad_request(
                ErrorKind::UnsupportedAction,
                cause,
                "Unsupported engine action option",
            )
        })?;

        let command = match action {
            EngineAction::Start => EngineCommand::StartVehicle,
            EngineAction::Stop => EngineCommand::StopVehicle,
        };
        tracing::info!(
            request_id = %ctx.request_id,
            vehicle_id,
            action = %action,
            "sending engine command"
        );

        let result = self
            .connector
            .send_engine_action(ctx, vehicle_id, command)
            .await?;
        Ok(EngineActionResponse {
            status: EngineOutcome::from(result.status),
        })
    }
}

#[track_caller]
fn door_count(flags: &VehicleFlags) -> Result<i64, ClassifiedError> {
    match (flags.is_four_door, flags.is_two_door) {
        (true, true) => Err(ClassifiedError::internal(
            ErrorKind::AmbiguousDoorCount,
            "Vehicle reports both four-door sedan and two-door coupe",
            "Failed to get vehicle",
        )),
        (true, false) => Ok(4),
        (false, true) => Ok(2),
        (false, false) => Err(ClassifiedError::internal(
            ErrorKind::UndeterminedDoorCount,
            "Vehicle is neither a four-door sedan nor a two-door coupe",
            "Failed to get vehicle",
        )),
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
