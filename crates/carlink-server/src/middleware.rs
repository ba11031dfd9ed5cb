use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use carlink_core::RequestContext;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Axum middleware that builds the per-request [`RequestContext`].
///
/// The request id comes from the `x-request-id` header when present and is
/// a fresh `UUIDv4` otherwise. The context is:
/// - Inserted into request extensions for handlers and extractors
/// - Logged once on arrival and once on completion
/// - Echoed on the response as the `x-request-id` header
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    let method = req.method().clone();
    let uri = req.uri().clone();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_string(), |info| info.0.to_string());

    tracing::info!(
        request_id = %id,
        method = %method,
        uri = %uri,
        remote_address = %remote,
        "request received"
    );

    req.extensions_mut()
        .insert(RequestContext::new(id.clone(), method.as_str(), &uri.to_string()));

    let started = Instant::now();
    let mut res = next.run(req).await;

    tracing::info!(
        request_id = %id,
        status = res.status().as_u16(),
        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}
