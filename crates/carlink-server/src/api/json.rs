//! Strict JSON request bodies.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
};
use carlink_core::{ClassifiedError, ErrorKind, RequestContext};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;

use super::{ApiError, AppState};

/// JSON body extractor that rejects anything but one well-formed object of
/// the expected shape.
///
/// Unlike `axum::Json`, a missing `Content-Type` is accepted, and every
/// failure is reported through the standard error envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct EngineActionRequest {
    pub action: String,
}

impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::detached("json-body"));

        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            if !is_json(content_type) {
                let msg = "Content-Type header is not application/json";
                let error =
                    ClassifiedError::new(415, ErrorKind::UnsupportedMediaType, msg, msg);
                return Err(ApiError::new(&ctx, error));
            }
        }

        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) if bytes.len() <= state.max_body_bytes => bytes,
            Ok(_) => return Err(ApiError::new(&ctx, too_large(state.max_body_bytes))),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::new(&ctx, too_large(state.max_body_bytes)));
            }
            Err(rejection) => {
                let error = ClassifiedError::bad_request(
                    ErrorKind::InvalidRequestBody,
                    rejection.body_text(),
                    "Failed to read request body",
                );
                return Err(ApiError::new(&ctx, error));
            }
        };

        decode(&bytes)
            .map(JsonBody)
            .map_err(|error| ApiError::new(&ctx, error))
    }
}

fn is_json(content_type: &HeaderValue) -> bool {
    content_type
        .to_str()
        .ok()
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn too_large(limit: usize) -> ClassifiedError {
    let msg = format!(
        "Request body must not be larger than {}",
        human_size(limit)
    );
    ClassifiedError::new(413, ErrorKind::PayloadTooLarge, &msg, msg.clone())
}

fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Decodes exactly one JSON value of type `T` from `body`.
pub(super) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClassifiedError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        let msg = "Request body must not be empty";
        return Err(ClassifiedError::bad_request(
            ErrorKind::InvalidRequestBody,
            msg,
            msg,
        ));
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = T::deserialize(&mut de).map_err(|e| decode_error(&e))?;

    if de.end().is_err() {
        let msg = "Request body must only contain a single JSON object";
        return Err(ClassifiedError::bad_request(
            ErrorKind::InvalidRequestBody,
            msg,
            msg,
        ));
    }

    Ok(value)
}

fn decode_error(err: &serde_json::Error) -> ClassifiedError {
    let position = format!("line {} column {}", err.line(), err.column());
    match err.classify() {
        Category::Syntax | Category::Eof => {
            let msg = format!("Request body contains badly-formed JSON (at {position})");
            ClassifiedError::bad_request(
                ErrorKind::InvalidRequestBody,
                &msg,
                "Request body contains badly-formed JSON",
            )
            .with_internal_message(msg)
        }
        Category::Data => {
            let detail = data_error_detail(err);
            let msg = match backticked(&detail, "unknown field ") {
                Some(field) => format!("Request body contains unknown field \"{field}\""),
                None => match backticked(&detail, "missing field ") {
                    Some(field) => format!("Request body is missing field \"{field}\""),
                    None => format!("Request body contains an invalid value (at {position})"),
                },
            };
            ClassifiedError::bad_request(ErrorKind::InvalidRequestBody, &msg, &msg)
                .with_validation_message(detail)
        }
        Category::Io => ClassifiedError::internal(
            ErrorKind::Internal,
            err,
            "Request body contains badly-formed JSON",
        )
        .with_internal_message("Failed to decode JSON"),
    }
}

/// serde's message without the trailing ` at line L column C`.
fn data_error_detail(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rfind(" at line ") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}

/// Extracts `name` from messages shaped like ``{prefix}`name`...``.
fn backticked<'a>(detail: &'a str, prefix: &str) -> Option<&'a str> {
    detail
        .strip_prefix(prefix)?
        .strip_prefix('`')?
        .split('`')
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_action(body: &str) -> Result<EngineActionRequest, ClassifiedError> {
        decode(body.as_bytes())
    }

    #[test]
    fn accepts_a_single_object() {
        let req = decode_action(r#"{"action": "START"}"#).unwrap();
        assert_eq!(req.action, "START");
    }

    #[test]
    fn empty_body_is_rejected() {
        for body in ["", "   \n"] {
            let err = decode_action(body).unwrap_err();
            assert_eq!(err.http_status(), 400);
            assert_eq!(err.client_message(), "Request body must not be empty");
        }
    }

    #[test]
    fn syntax_errors_hide_position_from_client() {
        let err = decode_action(r#"{"action": "START""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequestBody);
        assert_eq!(
            err.client_message(),
            "Request body contains badly-formed JSON"
        );
        assert!(err.internal_message().contains("line 1"));

        let err = decode_action("{action: START}").unwrap_err();
        assert_eq!(
            err.client_message(),
            "Request body contains badly-formed JSON"
        );
    }

    #[test]
    fn unknown_fields_are_named() {
        let err = decode_action(r#"{"action": "START", "force": true}"#).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(
            err.client_message(),
            "Request body contains unknown field \"force\""
        );
        assert!(err
            .validation_message()
            .is_some_and(|m| m.starts_with("unknown field `force`")));
    }

    #[test]
    fn missing_and_mistyped_fields_are_rejected() {
        let err = decode_action("{}").unwrap_err();
        assert_eq!(
            err.client_message(),
            "Request body is missing field \"action\""
        );

        let err = decode_action(r#"{"action": 5}"#).unwrap_err();
        assert!(
            err.client_message()
                .starts_with("Request body contains an invalid value"),
            "got {}",
            err.client_message()
        );
    }

    #[test]
    fn trailing_data_is_rejected() {
        let err = decode_action(r#"{"action": "START"}{"action": "STOP"}"#).unwrap_err();
        assert_eq!(
            err.client_message(),
            "Request body must only contain a single JSON object"
        );
    }

    #[test]
    fn content_type_must_be_json_when_present() {
        assert!(is_json(&HeaderValue::from_static("application/json")));
        assert!(is_json(&HeaderValue::from_static(
            "application/json; charset=utf-8"
        )));
        assert!(!is_json(&HeaderValue::from_static("text/plain")));
        assert!(!is_json(&HeaderValue::from_static(
            "application/x-www-form-urlencoded"
        )));
    }

    #[test]
    fn body_limit_is_human_readable() {
        assert_eq!(human_size(1_048_576), "1MB");
        assert_eq!(human_size(65_536), "64KB");
        assert_eq!(human_size(1000), "1000 bytes");
        assert_eq!(
            too_large(1_048_576).client_message(),
            "Request body must not be larger than 1MB"
        );
    }
}
