use axum::{
    extract::{Path, State},
    Extension, Json,
};
use carlink_core::{DoorEntry, EngineActionResponse, Percentage, RequestContext, VehicleInfo};

use super::json::{EngineActionRequest, JsonBody};
use super::{parse_vehicle_id, respond, ApiError, AppState};

pub(super) async fn get_vehicle(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<VehicleInfo>, ApiError> {
    let vehicle_id = parse_vehicle_id(&ctx, &vehicle_id)?;
    respond(&ctx, state.vehicles.get_vehicle(&ctx, vehicle_id).await)
}

pub(super) async fn get_vehicle_doors(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Vec<DoorEntry>>, ApiError> {
    let vehicle_id = parse_vehicle_id(&ctx, &vehicle_id)?;
    respond(&ctx, state.vehicles.get_vehicle_doors(&ctx, vehicle_id).await)
}

pub(super) async fn get_vehicle_fuel(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Percentage>, ApiError> {
    let vehicle_id = parse_vehicle_id(&ctx, &vehicle_id)?;
    respond(&ctx, state.vehicles.get_vehicle_fuel(&ctx, vehicle_id).await)
}

pub(super) async fn get_vehicle_battery(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Percentage>, ApiError> {
    let vehicle_id = parse_vehicle_id(&ctx, &vehicle_id)?;
    respond(
        &ctx,
        state.vehicles.get_vehicle_battery(&ctx, vehicle_id).await,
    )
}

pub(super) async fn send_engine_action(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(vehicle_id): Path<String>,
    JsonBody(body): JsonBody<EngineActionRequest>,
) -> Result<Json<EngineActionResponse>, ApiError> {
    let vehicle_id = parse_vehicle_id(&ctx, &vehicle_id)?;
    respond(
        &ctx,
        state
            .vehicles
            .send_engine_action(&ctx, vehicle_id, &body.action)
            .await,
    )
}
