/// Google Sheets connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet id from the document URL.
    pub spreadsheet_id: String,
    /// Tab holding the crew grid.
    pub sheet_name: String,
    /// Path to the service-account JSON key.
    pub credentials_path: String,
    /// Sheets API base URL (default: `https://sheets.googleapis.com`).
    pub api_base: String,
    /// HTTP timeout for Sheets and token requests, in seconds.
    pub request_timeout_secs: u64,
}

impl SheetsConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default                           |
    /// |-----------------------------|-----------------------------------|
    /// | `SPREADSHEET_ID`            | (required)                        |
    /// | `SHEET_NAME`                | `Лист1`                           |
    /// | `GOOGLE_CREDENTIALS_PATH`   | `credentials.json`                |
    /// | `SHEETS_API_BASE`           | `https://sheets.googleapis.com`   |
    /// | `SHEETS_TIMEOUT_SECS`       | `20`                              |
    pub fn from_env() -> Self {
        let spreadsheet_id =
            std::env::var("SPREADSHEET_ID").expect("SPREADSHEET_ID must be set");

        let sheet_name = std::env::var("SHEET_NAME").unwrap_or_else(|_| "Лист1".into());

        let credentials_path = std::env::var("GOOGLE_CREDENTIALS_PATH")
            .unwrap_or_else(|_| "credentials.json".into());

        let api_base = std::env::var("SHEETS_API_BASE")
            .unwrap_or_else(|_| "https://sheets.googleapis.com".into());

        let request_timeout_secs: u64 = std::env::var("SHEETS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("SHEETS_TIMEOUT_SECS must be a valid u64");

        Self {
            spreadsheet_id,
            sheet_name,
            credentials_path,
            api_base: api_base.trim_end_matches('/').to_string(),
            request_timeout_secs,
        }
    }
}
