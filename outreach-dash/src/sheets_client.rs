//! Spreadsheet CSV export client
//!
//! Fetches the published CSV export of the visit sheet and tokenizes it
//! into raw rows. One request per poll; no retries here, the next poll is
//! the retry.

use std::time::Duration;

use async_trait::async_trait;
use outreach_common::feed::{parse_csv, FetchError, RowSource};
use outreach_common::visits::RawRow;

const USER_AGENT: &str = concat!("outreach-dash/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP row source for a CSV export URL
pub struct SheetsClient {
    http_client: reqwest::Client,
    export_url: String,
}

impl SheetsClient {
    pub fn new(export_url: impl Into<String>) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            export_url: export_url.into(),
        })
    }

    pub fn export_url(&self) -> &str {
        &self.export_url
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    fn source_id(&self) -> &'static str {
        "sheets-csv"
    }

    async fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        if self.export_url.trim().is_empty() {
            return Err(FetchError::Network("no feed URL configured".to_string()));
        }

        tracing::debug!(url = %self.export_url, "Fetching visit sheet export");

        let response = self
            .http_client
            .get(&self.export_url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let rows = parse_csv(&body)?;

        tracing::info!(rows = rows.len(), "Retrieved visit sheet export");

        Ok(rows)
    }
}
