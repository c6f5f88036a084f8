//! Route handlers for the relay.
//!
//! All handlers receive `SharedState` via Axum state extraction. The OAuth
//! pair (`/auth`, `/callback`) drives the code exchange; the remaining
//! endpoints proxy Gong's read APIs using the stored token record and relay
//! Gong's body and status verbatim.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::RelayError;
use crate::gong::{CallId, CallWindow, Relayed};
use crate::store::TokenRecord;
use crate::SharedState;

pub fn relay_router(state: SharedState) -> Router {
    Router::new()
        // ── Health ───────────────────────────────────────────────────────
        .route("/status", get(status))
        // ── OAuth ────────────────────────────────────────────────────────
        .route("/auth", get(auth_start))
        .route("/callback", get(auth_callback))
        // ── Gong proxies ─────────────────────────────────────────────────
        .route("/calls", get(calls_list))
        .route("/calls/{call_id}", get(call_get))
        .route("/calls/{call_id}/transcript", get(call_transcript))
        .route("/users", get(users_list))
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

async fn status(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gong-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "connected": state.store.is_connected().await,
    }))
}

// =============================================================================
// OAuth Endpoints
// =============================================================================

/// GET /auth — 302 to Gong's consent page.
async fn auth_start(State(state): State<SharedState>) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.oauth.authorize_url())],
    )
}

#[derive(Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

/// GET /callback — exchange the authorization code and store the tokens.
///
/// The store is only touched after a fully successful exchange; a provider
/// rejection or an unparseable response leaves any prior record in place.
async fn auth_callback(
    State(state): State<SharedState>,
    Query(q): Query<CallbackQuery>,
) -> Result<&'static str, RelayError> {
    let code = q
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(RelayError::MissingCode)?;

    let record = state.oauth.exchange_code(code).await?;
    info!("Connected to Gong at {}", record.api_base_url);
    state.store.replace(record).await;

    Ok("Gong OAuth successful! You can now use the API.")
}

// =============================================================================
// Gong Proxy Endpoints
// =============================================================================

/// Snapshot the stored token record, or reject with 401.
async fn require_token(state: &SharedState) -> Result<TokenRecord, RelayError> {
    state.store.current().await.ok_or(RelayError::NotAuthorized)
}

#[derive(Deserialize)]
struct ListCallsQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// GET /calls — list calls in a date window.
async fn calls_list(
    State(state): State<SharedState>,
    Query(q): Query<ListCallsQuery>,
) -> Result<Relayed, RelayError> {
    let record = require_token(&state).await?;

    let start = q
        .start_date
        .ok_or_else(|| RelayError::InvalidParam("start_date is required".into()))?;
    let end = q
        .end_date
        .ok_or_else(|| RelayError::InvalidParam("end_date is required".into()))?;
    let window = CallWindow::new(&start, &end)?;

    state.api.list_calls(&record, &window).await
}

/// GET /calls/{call_id} — details of one call.
async fn call_get(
    State(state): State<SharedState>,
    Path(call_id): Path<String>,
) -> Result<Relayed, RelayError> {
    let record = require_token(&state).await?;
    let id = CallId::new(&call_id)?;
    state.api.get_call(&record, &id).await
}

/// GET /calls/{call_id}/transcript — transcript of one call.
async fn call_transcript(
    State(state): State<SharedState>,
    Path(call_id): Path<String>,
) -> Result<Relayed, RelayError> {
    let record = require_token(&state).await?;
    let id = CallId::new(&call_id)?;
    state.api.get_transcript(&record, &id).await
}

/// GET /users — list users of the connected Gong workspace.
async fn users_list(State(state): State<SharedState>) -> Result<Relayed, RelayError> {
    let record = require_token(&state).await?;
    state.api.list_users(&record).await
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, Config};

    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use base64::Engine as _;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header as mock_header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(oauth_base: &str) -> SharedState {
        Arc::new(AppState::new(Config {
            host: "127.0.0.1".into(),
            port: 0,
            client_id: "relay-client".into(),
            client_secret: "relay-secret".into(),
            redirect_uri: "https://relay.test/callback".into(),
            oauth_base_url: oauth_base.into(),
        }))
    }

    /// State already holding token "T" pointed at the given API base.
    async fn connected_state(api_base: &str) -> SharedState {
        let state = test_state("https://app.gong.io");
        state
            .store
            .replace(TokenRecord {
                access_token: "T".into(),
                refresh_token: None,
                api_base_url: api_base.into(),
            })
            .await;
        state
    }

    async fn send(state: SharedState, uri: &str) -> (StatusCode, axum::body::Bytes) {
        let resp = relay_router(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn status_reports_no_connection() {
        let (status, body) = send(test_state("https://app.gong.io"), "/status").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["service"], "gong-relay");
        assert_eq!(v["connected"], false);
    }

    #[tokio::test]
    async fn auth_redirects_to_consent_page() {
        let resp = relay_router(test_state("https://app.gong.io"))
            .oneshot(Request::get("/auth").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);

        let location = resp.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://app.gong.io/oauth2/authorize?"));
        assert!(location.contains("client_id=relay-client"));
        assert!(location.contains("&response_type=code"));
    }

    #[tokio::test]
    async fn callback_without_code_is_rejected() {
        let state = test_state("https://app.gong.io");
        let (status, _) = send(state.clone(), "/callback").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.store.current().await.is_none());
    }

    #[tokio::test]
    async fn callback_exchanges_code_and_stores_record() {
        let provider = MockServer::start().await;
        let basic = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("relay-client:relay-secret")
        );
        Mock::given(method("POST"))
            .and(path("/oauth2/generate-customer-token"))
            .and(query_param("grant_type", "authorization_code"))
            .and(query_param("code", "abc"))
            .and(query_param("client_id", "relay-client"))
            .and(query_param("redirect_uri", "https://relay.test/callback"))
            .and(mock_header("authorization", basic.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-1",
                "refresh_token": "rt-1",
                "api_base_url_for_customer": "https://company.api.gong.io",
            })))
            .expect(1)
            .mount(&provider)
            .await;

        let state = test_state(&provider.uri());
        let (status, body) = send(state.clone(), "/callback?code=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("successful"));

        let record = state.store.current().await.unwrap();
        assert_eq!(
            record,
            TokenRecord {
                access_token: "at-1".into(),
                refresh_token: Some("rt-1".into()),
                api_base_url: "https://company.api.gong.io".into(),
            }
        );
    }

    #[tokio::test]
    async fn failed_exchange_relays_provider_text_and_keeps_store() {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/generate-customer-token"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid code grant"))
            .expect(1)
            .mount(&provider)
            .await;

        let state = test_state(&provider.uri());
        let (status, body) = send(state.clone(), "/callback?code=bad").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(String::from_utf8_lossy(&body).contains("invalid code grant"));
        assert!(state.store.current().await.is_none());
    }

    #[tokio::test]
    async fn proxies_reject_without_token() {
        let state = test_state("https://app.gong.io");
        for uri in [
            "/calls?start_date=2024-01-01&end_date=2024-01-02",
            "/calls/42",
            "/calls/42/transcript",
            "/users",
        ] {
            let (status, _) = send(state.clone(), uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn get_call_relays_response_verbatim() {
        let gong = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/calls/42"))
            .and(mock_header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42"})))
            .expect(1)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;
        let (status, body) = send(state, "/calls/42").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v, json!({"id": "42"}));
    }

    #[tokio::test]
    async fn provider_error_status_is_relayed() {
        let gong = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/calls/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "call not found"})),
            )
            .expect(1)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;
        let (status, body) = send(state, "/calls/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8_lossy(&body).contains("call not found"));
    }

    #[tokio::test]
    async fn transcript_posts_call_ids() {
        let gong = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/calls/transcript"))
            .and(mock_header("authorization", "Bearer T"))
            .and(body_json(json!({"callIds": ["42"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"transcript": []})))
            .expect(1)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;
        let (status, _) = send(state, "/calls/42/transcript").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn list_calls_forwards_window() {
        let gong = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/calls"))
            .and(query_param("start_date", "2024-01-01"))
            .and(query_param("end_date", "2024-02-01"))
            .and(mock_header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"calls": []})))
            .expect(1)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;
        let (status, _) =
            send(state, "/calls?start_date=2024-01-01&end_date=2024-02-01").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn list_users_is_proxied() {
        let gong = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .and(mock_header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
            .expect(1)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;
        let (status, _) = send(state, "/users").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_window_is_rejected_before_any_outbound_call() {
        let gong = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/calls"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&gong)
            .await;

        let state = connected_state(&gong.uri()).await;

        let (status, _) =
            send(state.clone(), "/calls?start_date=yesterday&end_date=2024-02-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(state, "/calls?start_date=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_call_id_is_rejected() {
        let state = connected_state("https://company.api.gong.io").await;
        let (status, _) = send(state.clone(), "/calls/bad%20id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(state, "/calls/bad%20id/transcript").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
