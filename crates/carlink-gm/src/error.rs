use carlink_core::{ClassifiedError, ErrorKind};
use thiserror::Error;

use crate::client::Operation;
use crate::coerce::FieldType;

/// Failures while converting tagged vendor fields into typed records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// A `Boolean` field whose text is not exactly `True` or `False`.
    #[error("unparsable boolean for field '{field}': {value:?}")]
    UnparsableBoolean { field: String, value: String },

    /// A `Number` field whose text is not a number of the declared kind.
    #[error("unparsable number for field '{field}': {value:?}")]
    UnparsableNumber { field: String, value: String },

    /// A type tag outside the supported set, or an unknown enumerated value.
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// A known field whose tag contradicts the type the record declares.
    #[error("field '{field}' declared as {expected} but tagged {found}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: String,
    },
}

/// Errors returned by the GM API client.
///
/// Variants carrying `body` keep the raw upstream response for diagnostics.
#[derive(Debug, Error)]
pub enum GmError {
    /// The request could not be sent or the connection failed (includes timeouts).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    /// The vendor answered with a transport status other than 200.
    #[error("non-200 response: {status} {body}")]
    UpstreamHttp { status: u16, body: String },

    /// The body is not a parsable `{status, reason, data}` envelope.
    #[error("malformed GM envelope: {source}")]
    MalformedEnvelope {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The envelope `status` is not an integer string.
    #[error("invalid GM status code: {status:?}")]
    InvalidStatusCode { status: String },

    /// The envelope reports a failure inside a 200 transport response.
    #[error("non-200 response: {reason} Response code: {status}")]
    UpstreamLogical { status: i64, reason: String },

    /// A nested payload whose shape does not match what the operation expects.
    #[error("unexpected data shape: {found}")]
    UnexpectedDataShape { found: String, body: String },

    #[error("coercion failed: {source}")]
    Coercion {
        #[source]
        source: CoercionError,
        body: String,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GmError {
    /// Converts this error into the caller-facing classification for `op`.
    ///
    /// Every vendor-side failure is a 500; the client message names the
    /// operation, except transport failures which stay generic.
    #[must_use]
    #[track_caller]
    pub fn classify(&self, op: Operation) -> ClassifiedError {
        let name = op.name();
        let client = op.client_message();
        let verb = op.description();
        match self {
            GmError::Transport(e) => {
                ClassifiedError::internal(ErrorKind::Transport, e, "Internal Error")
                    .with_internal_message(format!("{name}: Failed to send request"))
            }
            GmError::InvalidBaseUrl { .. } => {
                ClassifiedError::internal(ErrorKind::Transport, self, "Internal Error")
                    .with_internal_message(format!("{name}: Failed to build request URL"))
            }
            GmError::Read(e) => ClassifiedError::internal(ErrorKind::Read, e, client)
                .with_internal_message(format!("{name}: Failed to read response body")),
            GmError::UpstreamHttp { status, body } => ClassifiedError::internal(
                ErrorKind::UpstreamHttp,
                format!("Failed to {verb} from GM, non-200 response: {status} {body}"),
                client,
            ),
            GmError::MalformedEnvelope { source, .. } => {
                ClassifiedError::internal(ErrorKind::MalformedEnvelope, source, client)
                    .with_internal_message(format!("{name}: Failed to unmarshal GM response"))
            }
            GmError::InvalidStatusCode { .. } => ClassifiedError::internal(
                ErrorKind::InvalidStatusCode,
                self,
                "Failed to parse status code",
            ),
            GmError::UpstreamLogical { status, reason } => ClassifiedError::internal(
                ErrorKind::UpstreamLogical,
                format!("Failed to {verb} from GM, non-200 response: {reason} Response code: {status}"),
                client,
            ),
            GmError::UnexpectedDataShape { found, body } => ClassifiedError::internal(
                ErrorKind::UnexpectedDataShape,
                format!("Incorrect data type from GM API ({found}). Response is \n{body}"),
                client,
            ),
            GmError::Coercion { source, body } => {
                ClassifiedError::internal(ErrorKind::Coercion, source, client)
                    .with_internal_message(format!(
                        "{name}: Failed to parse GM API structured data from GM response. GM response is: {body}"
                    ))
            }
        }
    }
}
