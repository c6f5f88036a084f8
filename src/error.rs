use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for the gong-relay service.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    // ── Caller Errors ───────────────────────────────────────────────────
    #[error("Missing authorization code")]
    MissingCode,

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Not authorized with Gong")]
    NotAuthorized,

    // ── Provider Errors ─────────────────────────────────────────────────
    /// Gong's token endpoint answered with a non-success status; carries the
    /// provider's raw response text.
    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    /// The outbound request never produced a response (connect failure,
    /// timeout, body read error).
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RelayError::MissingCode => (StatusCode::BAD_REQUEST, "missing_code"),
            RelayError::InvalidParam(_) => (StatusCode::BAD_REQUEST, "invalid_param"),
            RelayError::NotAuthorized => (StatusCode::UNAUTHORIZED, "not_authorized"),
            RelayError::ExchangeFailed(_) => (StatusCode::BAD_GATEWAY, "exchange_failed"),
            RelayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
