mod json;
mod vehicles;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use carlink_core::{ClassifiedError, ErrorKind, RequestContext};
use carlink_vehicle::VehicleService;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_context;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: VehicleService,
    pub max_body_bytes: usize,
}

/// A classified failure bound to the request it happened in.
///
/// Logging happens when the error is turned into a response, so every
/// failure is logged exactly once with the request's identifiers.
#[derive(Debug)]
pub struct ApiError {
    ctx: RequestContext,
    error: ClassifiedError,
}

/// `{"error": 1, "message": "...", "result": {"validation_error": [...]}}`
#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: u8,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ValidationResult<'a>>,
}

#[derive(Debug, Serialize)]
struct ValidationResult<'a> {
    validation_error: Vec<&'a str>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(ctx: &RequestContext, error: ClassifiedError) -> Self {
        Self {
            ctx: ctx.clone(),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self { ctx, error } = self;

        tracing::error!(
            request_id = %ctx.request_id,
            request = %ctx.request_path,
            kind = %error.kind(),
            status = error.http_status(),
            cause = %error.cause(),
            internal_message = %error.internal_message(),
            client_message = %error.client_message(),
            validation_message = error.validation_message().unwrap_or_default(),
            origin = %error.origin(),
            "request failed"
        );

        let status = StatusCode::from_u16(error.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorEnvelope {
            error: 1,
            message: error.client_message(),
            result: error.validation_message().map(|msg| ValidationResult {
                validation_error: msg.split('\n').collect(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Wraps a service result as a 200 JSON body or an [`ApiError`].
pub(super) fn respond<T: Serialize>(
    ctx: &RequestContext,
    result: Result<T, ClassifiedError>,
) -> Result<Json<T>, ApiError> {
    match result {
        Ok(value) => {
            tracing::debug!(
                request_id = %ctx.request_id,
                request = %ctx.request_path,
                status = 200,
                "request succeeded"
            );
            Ok(Json(value))
        }
        Err(error) => Err(ApiError::new(ctx, error)),
    }
}

/// Parses the `{vehicle_id}` path segment as a signed 64-bit integer.
pub(super) fn parse_vehicle_id(ctx: &RequestContext, raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|e| {
        let error = ClassifiedError::bad_request(
            ErrorKind::InvalidVehicleId,
            e,
            "Vehicle ID must be an integer",
        )
        .with_internal_message("Failed to parse vehicle ID");
        ApiError::new(ctx, error)
    })
}

pub fn build_app(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/vehicles/{vehicle_id}", get(vehicles::get_vehicle))
        .route("/vehicles/{vehicle_id}/doors", get(vehicles::get_vehicle_doors))
        .route("/vehicles/{vehicle_id}/fuel", get(vehicles::get_vehicle_fuel))
        .route(
            "/vehicles/{vehicle_id}/battery",
            get(vehicles::get_vehicle_battery),
        )
        .route(
            "/vehicles/{vehicle_id}/engine",
            post(vehicles::send_engine_action),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_context))
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}
