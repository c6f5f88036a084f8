//! API router for gong-relay.
//!
//! Endpoints:
//! - /status                      — health check
//! - /auth, /callback             — OAuth handshake with Gong
//! - /calls, /calls/{id},
//!   /calls/{id}/transcript,
//!   /users                       — authenticated proxies to Gong's /v2 API

pub mod routes;

use crate::SharedState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::relay_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
