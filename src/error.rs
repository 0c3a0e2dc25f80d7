//! Request-level error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::http::upstream::UpstreamError;
use crate::query::ParameterError;
use crate::transform::TransformError;

/// Everything that can abort a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Parameter(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(UpstreamError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(_) | ProxyError::Transform(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ProxyError::from(ParameterError::NotAnInteger {
            name: "$limit",
            value: "ten".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "parameter $limit must be a non-negative integer, got \"ten\"");

        let err = ProxyError::from(UpstreamError::Status {
            url: "https://data.cityofnewyork.us/resource/x.json".parse().unwrap(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ProxyError::from(TransformError::MissingField {
            id: "9".into(),
            field: "created_date",
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
