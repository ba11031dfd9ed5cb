use async_trait::async_trait;
use carlink_core::{ClassifiedError, DoorEntry, EnergyLevels, EngineActionResult, RequestContext};

use crate::client::{GmClient, Operation};
use crate::types::{EngineCommand, VehicleFlags};

/// Vendor-facing capabilities the vehicle service depends on.
///
/// Errors are already classified, so callers can propagate them unchanged or
/// override the client message.
#[async_trait]
pub trait VehicleConnector: Send + Sync {
    async fn get_vehicle(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<VehicleFlags, ClassifiedError>;

    async fn get_vehicle_doors(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Vec<DoorEntry>, ClassifiedError>;

    async fn get_energy_levels(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<EnergyLevels, ClassifiedError>;

    async fn send_engine_action(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
        command: EngineCommand,
    ) -> Result<EngineActionResult, ClassifiedError>;
}

#[async_trait]
impl VehicleConnector for GmClient {
    async fn get_vehicle(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<VehicleFlags, ClassifiedError> {
        GmClient::get_vehicle(self, ctx, vehicle_id)
            .await
            .map_err(|e| e.classify(Operation::GetVehicle))
    }

    async fn get_vehicle_doors(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Vec<DoorEntry>, ClassifiedError> {
        GmClient::get_vehicle_doors(self, ctx, vehicle_id)
            .await
            .map_err(|e| e.classify(Operation::GetDoors))
    }

    async fn get_energy_levels(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<EnergyLevels, ClassifiedError> {
        GmClient::get_energy_levels(self, ctx, vehicle_id)
            .await
            .map_err(|e| e.classify(Operation::GetEnergy))
    }

    async fn send_engine_action(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
        command: EngineCommand,
    ) -> Result<EngineActionResult, ClassifiedError> {
        GmClient::send_engine_action(self, ctx, vehicle_id, command)
            .await
            .map_err(|e| e.classify(Operation::EngineAction))
    }
}
