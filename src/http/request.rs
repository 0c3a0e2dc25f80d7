//! Request identity and origin.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID unless the client sent one
//! - Derive the externally visible base URL for `Next-Page` links

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Issues a fresh UUID v4 for every request lacking `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID as text, for log fields.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Base URL (`scheme://host[:port]`) the client used to reach the proxy.
///
/// `public_url` wins when configured; otherwise forwarded headers, then the
/// `Host` header, then `fallback_host`.
pub fn base_url(headers: &HeaderMap, public_url: Option<&str>, fallback_host: &str) -> String {
    if let Some(public_url) = public_url {
        return public_url.trim_end_matches('/').to_string();
    }
    let scheme = header(headers, X_FORWARDED_PROTO).unwrap_or("http");
    let host = header(headers, X_FORWARDED_HOST)
        .or_else(|| header(headers, "host"))
        .unwrap_or(fallback_host);
    format!("{}://{}", scheme, host)
}
