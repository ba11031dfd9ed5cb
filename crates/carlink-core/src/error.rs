use std::panic::Location;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Classification of every failure a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream request could not be sent or the connection failed.
    Transport,
    /// The upstream response body could not be read.
    Read,
    /// The upstream transport status was not 200.
    UpstreamHttp,
    /// The upstream body was not a parsable status envelope.
    MalformedEnvelope,
    /// The envelope `status` was not an integer string.
    InvalidStatusCode,
    /// The envelope reported a non-200 status of its own.
    UpstreamLogical,
    UnexpectedDataShape,
    /// A tagged field could not be coerced into its declared type.
    Coercion,
    AmbiguousDoorCount,
    UndeterminedDoorCount,
    UnsupportedAction,
    InvalidVehicleId,
    InvalidRequestBody,
    UnsupportedMediaType,
    PayloadTooLarge,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport_error",
            ErrorKind::Read => "read_error",
            ErrorKind::UpstreamHttp => "upstream_http_error",
            ErrorKind::MalformedEnvelope => "malformed_envelope",
            ErrorKind::InvalidStatusCode => "invalid_status_code",
            ErrorKind::UpstreamLogical => "upstream_logical_error",
            ErrorKind::UnexpectedDataShape => "unexpected_data_shape",
            ErrorKind::Coercion => "coercion_error",
            ErrorKind::AmbiguousDoorCount => "ambiguous_door_count",
            ErrorKind::UndeterminedDoorCount => "undetermined_door_count",
            ErrorKind::UnsupportedAction => "unsupported_action",
            ErrorKind::InvalidVehicleId => "invalid_vehicle_id",
            ErrorKind::InvalidRequestBody => "invalid_request_body",
            ErrorKind::UnsupportedMediaType => "unsupported_media_type",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure ready to be reported to a caller.
///
/// Created where the failure is detected and enriched as it travels up: an
/// outer layer may replace the internal message, and the inbound layer may
/// attach a validation message. `http_status` always lies in `100..=999`;
/// anything else is clamped to 500 on construction.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {cause}")]
pub struct ClassifiedError {
    http_status: u16,
    kind: ErrorKind,
    cause: String,
    internal_message: String,
    client_message: String,
    validation_message: Option<String>,
    origin: &'static Location<'static>,
}

impl ClassifiedError {
    /// Builds an error, recording the caller's source location as its origin.
    ///
    /// The internal message starts out equal to `client_message`.
    #[track_caller]
    pub fn new(
        http_status: u16,
        kind: ErrorKind,
        cause: impl std::fmt::Display,
        client_message: impl Into<String>,
    ) -> Self {
        let client_message = client_message.into();
        Self {
            http_status: clamp_status(http_status),
            kind,
            cause: cause.to_string(),
            internal_message: client_message.clone(),
            client_message,
            validation_message: None,
            origin: Location::caller(),
        }
    }

    /// Shorthand for a 500 error.
    #[track_caller]
    pub fn internal(
        kind: ErrorKind,
        cause: impl std::fmt::Display,
        client_message: impl Into<String>,
    ) -> Self {
        Self::new(500, kind, cause, client_message)
    }

    /// Shorthand for a 400 error.
    #[track_caller]
    pub fn bad_request(
        kind: ErrorKind,
        cause: impl std::fmt::Display,
        client_message: impl Into<String>,
    ) -> Self {
        Self::new(400, kind, cause, client_message)
    }

    #[must_use]
    pub fn with_internal_message(mut self, message: impl Into<String>) -> Self {
        self.internal_message = message.into();
        self
    }

    #[must_use]
    pub fn with_client_message(mut self, message: impl Into<String>) -> Self {
        self.client_message = message.into();
        self
    }

    #[must_use]
    pub fn with_validation_message(mut self, message: impl Into<String>) -> Self {
        self.validation_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn cause(&self) -> &str {
        &self.cause
    }

    #[must_use]
    pub fn internal_message(&self) -> &str {
        &self.internal_message
    }

    #[must_use]
    pub fn client_message(&self) -> &str {
        &self.client_message
    }

    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    /// `file:line` where the error was constructed.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}:{}", self.origin.file(), self.origin.line())
    }

    /// True for the 4xx family: the caller sent something we refuse.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status)
    }
}

fn clamp_status(status: u16) -> u16 {
    if (100..=999).contains(&status) {
        status
    } else {
        500
    }
}
