//! HTTP client for the GM vehicle API.
//!
//! Wraps `reqwest` with the vendor's two-level error handling: a non-200
//! transport status is one failure channel, and the string-encoded `status`
//! inside a 200 response is another. Both are checked on every call. No
//! retries are attempted; each operation is exactly one POST.

use std::time::Duration;

use carlink_core::{AppConfig, DoorEntry, EnergyLevels, EngineActionResult, RequestContext};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::coerce::coerce;
use crate::error::GmError;
use crate::types::{
    parse_action_status, ActionPayload, DoorsPayload, EngineCommand, Envelope, GmRequest,
    RecordPayload, VehicleFlags,
};

/// One upstream capability of the GM API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetVehicle,
    GetDoors,
    GetEnergy,
    EngineAction,
}

impl Operation {
    /// Path segment appended to the base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Operation::GetVehicle => "getVehicleInfoService",
            Operation::GetDoors => "getSecurityStatusService",
            Operation::GetEnergy => "getEnergyService",
            Operation::EngineAction => "actionEngineService",
        }
    }

    /// Name used in logs and internal error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetVehicle => "GetVehicle",
            Operation::GetDoors => "GetVehicleDoors",
            Operation::GetEnergy => "GetVehicleEnergyStatus",
            Operation::EngineAction => "SendVehicleEngineAction",
        }
    }

    /// Message shown to API callers when this operation fails upstream.
    #[must_use]
    pub fn client_message(self) -> &'static str {
        match self {
            Operation::GetVehicle => "Failed to get vehicle",
            Operation::GetDoors => "Failed to get vehicle doors",
            Operation::GetEnergy => "Failed to get vehicle energy status",
            Operation::EngineAction => "Failed to send engine action",
        }
    }

    pub(crate) fn description(self) -> &'static str {
        match self {
            Operation::GetVehicle => "GET vehicle",
            Operation::GetDoors => "GET vehicle doors",
            Operation::GetEnergy => "GET vehicle energy status",
            Operation::EngineAction => "POST vehicle engine action",
        }
    }
}

/// Client for the GM vehicle API.
///
/// Use [`GmClient::from_config`] for production or [`GmClient::with_base_url`] to
/// point at a mock server in tests. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct GmClient {
    client: Client,
    base_url: Url,
}

impl GmClient {
    /// Creates a client from the `CARLINK_GM_*` settings in `config`.
    ///
    /// # Errors
    ///
    /// Same as [`GmClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GmError> {
        Self::with_base_url(
            &config.gm_base_url,
            config.gm_request_timeout_secs,
            config.gm_connect_timeout_secs,
            &config.gm_user_agent,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GmError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GmError::InvalidBaseUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(GmError::Transport)?;

        // Exactly one trailing slash, so joining an operation path appends a
        // segment instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GmError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the vehicle overview (`getVehicleInfoService`).
    ///
    /// # Errors
    ///
    /// Any [`GmError`] except [`GmError::UnexpectedDataShape`].
    pub async fn get_vehicle(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<VehicleFlags, GmError> {
        let (envelope, body) = self
            .call::<RecordPayload>(ctx, Operation::GetVehicle, vehicle_id, None)
            .await?;
        coerce(envelope.payload.data).map_err(|source| GmError::Coercion { source, body })
    }

    /// Fetches the lock state of every door (`getSecurityStatusService`).
    ///
    /// The vendor nests the door list in its own `{type: "Array", values}`
    /// envelope. Every element is coerced; one bad element fails the call.
    ///
    /// # Errors
    ///
    /// - [`GmError::UnexpectedDataShape`] if `data.doors` is missing or its
    ///   `type` is not `"Array"`.
    /// - [`GmError::Coercion`] if any door fails to coerce.
    /// - Any transport or envelope [`GmError`].
    pub async fn get_vehicle_doors(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<Vec<DoorEntry>, GmError> {
        let (envelope, body) = self
            .call::<DoorsPayload>(ctx, Operation::GetDoors, vehicle_id, None)
            .await?;

        let Some(data) = envelope.payload.data else {
            return Err(GmError::UnexpectedDataShape {
                found: "missing data.doors".to_string(),
                body,
            });
        };
        if data.doors.kind != "Array" {
            return Err(GmError::UnexpectedDataShape {
                found: format!("doors tagged {:?}", data.doors.kind),
                body,
            });
        }

        let mut doors = Vec::with_capacity(data.doors.values.len());
        for raw in data.doors.values {
            match coerce::<DoorEntry>(raw) {
                Ok(door) => doors.push(door),
                Err(source) => return Err(GmError::Coercion { source, body }),
            }
        }
        Ok(doors)
    }

    /// Fetches fuel and battery levels (`getEnergyService`).
    ///
    /// # Errors
    ///
    /// Any [`GmError`] except [`GmError::UnexpectedDataShape`].
    pub async fn get_energy_levels(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
    ) -> Result<EnergyLevels, GmError> {
        let (envelope, body) = self
            .call::<RecordPayload>(ctx, Operation::GetEnergy, vehicle_id, None)
            .await?;
        coerce(envelope.payload.data).map_err(|source| GmError::Coercion { source, body })
    }

    /// Sends an engine command (`actionEngineService`).
    ///
    /// # Errors
    ///
    /// - [`GmError::UnexpectedDataShape`] if `actionResult` is missing.
    /// - [`GmError::Coercion`] wrapping `UnsupportedDataType` if the result
    ///   status is neither `EXECUTED` nor `FAILED`.
    /// - Any transport or envelope [`GmError`].
    pub async fn send_engine_action(
        &self,
        ctx: &RequestContext,
        vehicle_id: i64,
        command: EngineCommand,
    ) -> Result<EngineActionResult, GmError> {
        let (envelope, body) = self
            .call::<ActionPayload>(
                ctx,
                Operation::EngineAction,
                vehicle_id,
                Some(command.as_str()),
            )
            .await?;

        let Some(result) = envelope.payload.action_result else {
            return Err(GmError::UnexpectedDataShape {
                found: "missing actionResult".to_string(),
                body,
            });
        };
        let status = parse_action_status(&result.status)
            .map_err(|source| GmError::Coercion { source, body })?;
        Ok(EngineActionResult { status })
    }

    /// Full URL for `op`.
    fn endpoint(&self, op: Operation) -> Result<Url, GmError> {
        self.base_url
            .join(op.path())
            .map_err(|e| GmError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends one POST and validates both status layers.
    ///
    /// Returns the parsed envelope together with the raw body so callers can
    /// attach it to coercion failures.
    async fn call<P: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        op: Operation,
        vehicle_id: i64,
        command: Option<&str>,
    ) -> Result<(Envelope<P>, String), GmError> {
        let url = self.endpoint(op)?;
        tracing::debug!(
            request_id = %ctx.request_id,
            operation = op.name(),
            vehicle_id,
            url = %url,
            "calling GM API"
        );

        let response = self
            .client
            .post(url)
            .json(&GmRequest::new(vehicle_id, command))
            .send()
            .await
            .map_err(GmError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GmError::Read)?;

        if status != StatusCode::OK {
            tracing::warn!(
                request_id = %ctx.request_id,
                operation = op.name(),
                status = status.as_u16(),
                "GM API returned non-200 transport status"
            );
            return Err(GmError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<P> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(source) => return Err(GmError::MalformedEnvelope { source, body }),
        };

        let code = envelope
            .status
            .trim()
            .parse::<i64>()
            .map_err(|_| GmError::InvalidStatusCode {
                status: envelope.status.clone(),
            })?;

        if code != 200 {
            tracing::warn!(
                request_id = %ctx.request_id,
                operation = op.name(),
                status = code,
                reason = %envelope.reason,
                "GM API reported an error inside a 200 response"
            );
            return Err(GmError::UpstreamLogical {
                status: code,
                reason: envelope.reason,
            });
        }

        Ok((envelope, body))
    }
}
