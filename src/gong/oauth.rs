use serde::Deserialize;

use crate::config::Config;
use crate::error::RelayError;
use crate::store::TokenRecord;

/// Scopes requested during authorization.
const OAUTH_SCOPES: &str = "api:calls:read api:users:read";

/// Static state parameter sent with every authorization redirect.
const OAUTH_STATE: &str = "xyz123";

/// Gong OAuth 2.0 client.
///
/// Quirks:
/// - The token endpoint is `/oauth2/generate-customer-token` and takes
///   `grant_type`, `code`, `client_id` and `redirect_uri` in the query
///   string, not as form fields.
/// - The token endpoint requires Basic auth (client_id:client_secret).
/// - The token response carries `api_base_url_for_customer`, the host all
///   subsequent data calls must target.
pub struct GongOAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    oauth_base: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GongTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    api_base_url_for_customer: String,
}

impl GongOAuth {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            oauth_base: config.oauth_base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Build the consent-page URL the caller should be redirected to.
    pub fn authorize_url(&self) -> String {
        format!(
            "{base}/oauth2/authorize?\
             client_id={client_id}\
             &response_type=code\
             &redirect_uri={redirect_uri}\
             &scope={scope}\
             &state={state}",
            base = self.oauth_base,
            client_id = urlencoding(&self.client_id),
            redirect_uri = urlencoding(&self.redirect_uri),
            scope = urlencoding(OAUTH_SCOPES),
            state = urlencoding(OAUTH_STATE),
        )
    }

    /// Exchange an authorization code for a token record.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, RelayError> {
        let resp = self
            .http
            .post(format!("{}/oauth2/generate-customer-token", self.oauth_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .query(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::ExchangeFailed(body));
        }

        let token: GongTokenResponse = resp
            .json()
            .await
            .map_err(|e| RelayError::ExchangeFailed(format!("unparseable token response: {e}")))?;

        Ok(TokenRecord {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            api_base_url: token.api_base_url_for_customer,
        })
    }
}

fn urlencoding(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
