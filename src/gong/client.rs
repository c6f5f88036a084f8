use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, NaiveDate};

use crate::error::RelayError;
use crate::store::TokenRecord;

/// A Gong API response handed back to the caller: upstream status and raw
/// body, relayed unchanged.
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Validated date window for call listing. The strings the caller supplied
/// are forwarded to Gong unchanged once they parse.
#[derive(Debug, Clone)]
pub struct CallWindow {
    start_date: String,
    end_date: String,
}

impl CallWindow {
    pub fn new(start_date: &str, end_date: &str) -> Result<Self, RelayError> {
        validate_stamp("start_date", start_date)?;
        validate_stamp("end_date", end_date)?;
        Ok(Self {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        })
    }
}

fn validate_stamp(name: &str, value: &str) -> Result<(), RelayError> {
    if DateTime::parse_from_rfc3339(value).is_ok() || value.parse::<NaiveDate>().is_ok() {
        return Ok(());
    }
    Err(RelayError::InvalidParam(format!(
        "{name} must be an RFC 3339 timestamp or YYYY-MM-DD date, got {value:?}"
    )))
}

/// Validated Gong call identifier, safe to interpolate into a path.
#[derive(Debug, Clone)]
pub struct CallId(String);

impl CallId {
    pub fn new(raw: &str) -> Result<Self, RelayError> {
        let well_formed = !raw.is_empty()
            && raw.len() <= 64
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(RelayError::InvalidParam(format!("malformed call id {raw:?}")));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only client for the Gong customer API (`/v2`), addressed at the
/// per-customer base URL stored in the token record.
pub struct GongApi {
    http: reqwest::Client,
}

impl GongApi {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET {base}/v2/calls within a date window.
    pub async fn list_calls(
        &self,
        record: &TokenRecord,
        window: &CallWindow,
    ) -> Result<Relayed, RelayError> {
        let url = format!(
            "{}/v2/calls?start_date={}&end_date={}",
            record.api_base_url,
            urlencoding(&window.start_date),
            urlencoding(&window.end_date),
        );
        self.relay(self.http.get(url).bearer_auth(&record.access_token))
            .await
    }

    /// GET {base}/v2/calls/{id}.
    pub async fn get_call(&self, record: &TokenRecord, id: &CallId) -> Result<Relayed, RelayError> {
        let url = format!("{}/v2/calls/{}", record.api_base_url, id.as_str());
        self.relay(self.http.get(url).bearer_auth(&record.access_token))
            .await
    }

    /// POST {base}/v2/calls/transcript — Gong serves transcripts through a
    /// POST endpoint taking a list of call ids.
    pub async fn get_transcript(
        &self,
        record: &TokenRecord,
        id: &CallId,
    ) -> Result<Relayed, RelayError> {
        let url = format!("{}/v2/calls/transcript", record.api_base_url);
        let payload = serde_json::json!({ "callIds": [id.as_str()] });
        self.relay(
            self.http
                .post(url)
                .bearer_auth(&record.access_token)
                .json(&payload),
        )
        .await
    }

    /// GET {base}/v2/users.
    pub async fn list_users(&self, record: &TokenRecord) -> Result<Relayed, RelayError> {
        let url = format!("{}/v2/users", record.api_base_url);
        self.relay(self.http.get(url).bearer_auth(&record.access_token))
            .await
    }

    async fn relay(&self, req: reqwest::RequestBuilder) -> Result<Relayed, RelayError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok(Relayed { status, body })
    }
}

fn urlencoding(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
