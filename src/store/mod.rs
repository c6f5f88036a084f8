//! Token store — in-memory record of the current Gong connection.
//!
//! Exactly one connection exists per process. The record is replaced
//! wholesale on every successful code exchange and is lost on restart.

use tokio::sync::RwLock;

/// Tokens and customer API base URL returned by Gong's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Per-customer API host, e.g. `https://company.api.gong.io`.
    pub api_base_url: String,
}

/// Holds the single token record behind an async lock. Readers observe
/// either no record or a fully-written one; a callback racing a proxy
/// request can never expose a half-updated record.
#[derive(Debug, Default)]
pub struct TokenStore {
    record: RwLock<Option<TokenRecord>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored record wholesale. Fields absent from the new
    /// record are gone; nothing is merged.
    pub async fn replace(&self, record: TokenRecord) {
        *self.record.write().await = Some(record);
    }

    /// Snapshot of the current record, if a code exchange has completed.
    pub async fn current(&self) -> Option<TokenRecord> {
        self.record.read().await.clone()
    }

    /// Whether an access token is currently held.
    pub async fn is_connected(&self) -> bool {
        self.record.read().await.is_some()
    }
}
