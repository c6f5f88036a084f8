pub mod api;
pub mod config;
pub mod error;
pub mod gong;
pub mod store;

pub use config::Config;
pub use error::RelayError;

use std::sync::Arc;

/// Shared application state passed to all API handlers.
pub struct AppState {
    pub config: Config,
    pub store: store::TokenStore,
    pub oauth: gong::GongOAuth,
    pub api: gong::GongApi,
}

impl AppState {
    /// Build the relay's components around one shared HTTP client.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let oauth = gong::GongOAuth::new(&config, http.clone());
        Self {
            config,
            store: store::TokenStore::new(),
            oauth,
            api: gong::GongApi::new(http),
        }
    }
}

pub type SharedState = Arc<AppState>;
