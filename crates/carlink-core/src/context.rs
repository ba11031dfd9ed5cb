use uuid::Uuid;

/// Per-request logging context.
///
/// Built once by the inbound middleware and passed by reference down through
/// the service and connector so every log line for a request carries the same
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    /// `METHOD.uri`, e.g. `GET./vehicles/1234/doors`.
    pub request_path: String,
}

impl RequestContext {
    #[must_use]
    pub fn new(request_id: impl Into<String>, method: &str, uri: &str) -> Self {
        Self {
            request_id: request_id.into(),
            request_path: format!("{method}.{uri}"),
        }
    }

    /// Context with a fresh UUIDv4 request id, for work that did not arrive
    /// over HTTP.
    #[must_use]
    pub fn detached(label: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            request_path: label.to_string(),
        }
    }
}
