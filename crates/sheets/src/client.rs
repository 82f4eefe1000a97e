//! Google Sheets v4 `values` client.

use std::time::Duration;

use async_trait::async_trait;
use orion_core::grid::{CellRange, Grid};
use reqwest::Url;
use serde::Deserialize;

use crate::auth::{ServiceAccountKey, TokenProvider};
use crate::config::SheetsConfig;
use crate::source::{GridError, GridSource};

/// Body of `GET .../values/{range}`. `values` is absent for an empty sheet.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// [`GridSource`] backed by one tab of a Google spreadsheet.
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    tokens: TokenProvider,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: String,
}

impl GoogleSheetsClient {
    /// Build a client from configuration, loading the service-account key.
    pub async fn from_config(config: &SheetsConfig) -> Result<Self, GridError> {
        let key = ServiceAccountKey::from_file(&config.credentials_path).await?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, key, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        key: ServiceAccountKey,
        config: &SheetsConfig,
    ) -> Self {
        Self {
            tokens: TokenProvider::new(client.clone(), key),
            client,
            api_base: config.api_base.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
        }
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` with each segment encoded.
    fn values_url(&self, range: &str) -> Result<Url, GridError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| GridError::Decode(format!("Invalid API base {}: {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|_| {
                GridError::Decode(format!("API base cannot be a base: {}", self.api_base))
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GridError::Api`] carrying
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GridError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GridError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Render a cell value the way the sheet displays it.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl GridSource for GoogleSheetsClient {
    async fn fetch_grid(&self) -> Result<Grid, GridError> {
        let token = self.tokens.access_token().await?;
        let mut url = self.values_url(&self.sheet_name)?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let body: ValueRange = Self::ensure_success(response).await?.json().await?;

        let rows: Vec<Vec<String>> = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        tracing::debug!(
            sheet = %self.sheet_name,
            rows = rows.len(),
            "Fetched sheet grid",
        );
        Ok(Grid::new(rows))
    }

    async fn write_cell(&self, range: &CellRange, value: &str) -> Result<(), GridError> {
        let token = self.tokens.access_token().await?;
        let a1 = range.to_string();
        let mut url = self.values_url(&a1)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = serde_json::json!({
            "range": a1,
            "majorDimension": "ROWS",
            "values": [[value]],
        });

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        tracing::debug!(range = %a1, value, "Wrote sheet cell");
        Ok(())
    }
}
