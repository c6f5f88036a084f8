use anyhow::{Context, Result};

/// Callback URL registered with Gong for this deployment. Overridable via
/// `REDIRECT_URI` for local runs.
pub const DEFAULT_REDIRECT_URI: &str = "https://gong-relay.onrender.com/callback";

/// Gong's OAuth host, serving both the consent page and the token endpoint.
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://app.gong.io";

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // ── Server ──────────────────────────────────────────────────────────
    pub host: String,
    pub port: u16,

    // ── Gong OAuth app credentials ──────────────────────────────────────
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL sent in both the authorization redirect and the token
    /// exchange; must match the URL registered with Gong exactly.
    pub redirect_uri: String,
    /// Base URL for Gong's OAuth endpoints.
    pub oauth_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8430".into())
                .parse()
                .context("Invalid PORT")?,

            client_id: std::env::var("GONG_CLIENT_ID")
                .context("GONG_CLIENT_ID is required (Gong OAuth app client id)")?,
            client_secret: std::env::var("GONG_CLIENT_SECRET")
                .context("GONG_CLIENT_SECRET is required (Gong OAuth app client secret)")?,
            redirect_uri: std::env::var("REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.into()),
            oauth_base_url: std::env::var("GONG_OAUTH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OAUTH_BASE_URL.into()),
        })
    }
}
