//! Google Sheets API client
//!
//! Thin wrapper over the Sheets v4 `values` endpoints implementing
//! [`RowStore`]. The base URL is injectable so tests can point the client at a
//! mock server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::sheets::auth::ServiceAccountAuth;
use crate::sheets::RowStore;
use crate::utils::errors::{FleetCheckError, Result};

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Where the client gets its bearer token from.
#[derive(Clone)]
enum TokenSource {
    ServiceAccount(ServiceAccountAuth),
    /// Fixed token, used in tests against a mock server.
    Static(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Vec<String>>>,
}

/// Sheets v4 REST client.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    token_source: TokenSource,
    api_base: String,
    spreadsheet_id: String,
}

impl GoogleSheetsClient {
    pub fn new(auth: ServiceAccountAuth, spreadsheet_id: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("fleetcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token_source: TokenSource::ServiceAccount(auth),
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id,
        })
    }

    /// Client with a fixed token and custom base URL, for tests.
    pub fn with_static_token(api_base: String, spreadsheet_id: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_source: TokenSource::Static(token),
            api_base,
            spreadsheet_id,
        }
    }

    async fn bearer_token(&self) -> Result<String> {
        match &self.token_source {
            TokenSource::ServiceAccount(auth) => auth.access_token().await,
            TokenSource::Static(token) => Ok(token.clone()),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base, self.spreadsheet_id, range
        )
    }

    async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(context = context, status = %status, "Sheets API call failed");
        Err(FleetCheckError::SheetsApi(format!(
            "{context}: HTTP {status}: {body}"
        )))
    }
}

/// A1 column letter(s) for a 1-based column index.
fn column_letter(mut col: u32) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[async_trait]
impl RowStore for GoogleSheetsClient {
    async fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let token = self.bearer_token().await?;
        let response = self
            .http
            .get(self.values_url(sheet))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response, "read_rows").await?;

        let range: ValueRange = response.json().await?;
        let rows = range.values.unwrap_or_default();
        debug!(sheet = sheet, rows = rows.len(), "Read sheet rows");
        Ok(rows)
    }

    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        let token = self.bearer_token().await?;
        let body = ValueRange {
            range: None,
            values: Some(vec![row]),
        };
        let response = self
            .http
            .post(format!("{}:append", self.values_url(sheet)))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response, "append_row").await?;

        debug!(sheet = sheet, "Appended sheet row");
        Ok(())
    }

    async fn update_cell(&self, sheet: &str, row: u32, col: u32, value: &str) -> Result<()> {
        let token = self.bearer_token().await?;
        let range = format!("{sheet}!{}{row}", column_letter(col));
        let body = ValueRange {
            range: Some(range.clone()),
            values: Some(vec![vec![value.to_string()]]),
        };
        let response = self
            .http
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response, "update_cell").await?;

        debug!(sheet = sheet, row = row, col = col, "Updated sheet cell");
        Ok(())
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GoogleSheetsClient {
        GoogleSheetsClient::with_static_token(
            server.uri(),
            "sheet-id".to_string(),
            "test-token".to_string(),
        )
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(3), "C");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
    }

    #[tokio::test]
    async fn read_rows_parses_value_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Vehicles"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Vehicles!A1:C3",
                "values": [
                    ["Номер авто", "ID водителя", "Водитель"],
                    ["A333BC", "42", "driver"],
                    ["A123BC"]
                ]
            })))
            .mount(&server)
            .await;

        let rows = client(&server).read_rows("Vehicles").await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["A333BC", "42", "driver"]);
        assert_eq!(rows[2], vec!["A123BC"]);
    }

    #[tokio::test]
    async fn read_rows_empty_sheet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Vehicles!A1:C1"
            })))
            .mount(&server)
            .await;

        let rows = client(&server).read_rows("Vehicles").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn append_row_posts_value_range() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-id/values/Inspections:append"))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_partial_json(serde_json::json!({
                "values": [["30.08.2026", "12:00:00", "B777XY"]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .append_row(
                "Inspections",
                vec![
                    "30.08.2026".to_string(),
                    "12:00:00".to_string(),
                    "B777XY".to_string(),
                ],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_cell_targets_a1_range() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sheet-id/values/Vehicles!B2"))
            .and(query_param("valueInputOption", "RAW"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_cell("Vehicles", 2, 2, "42")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_failure_is_sheets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).read_rows("Vehicles").await.unwrap_err();
        assert!(matches!(err, FleetCheckError::SheetsApi(_)));
        assert!(err.is_transient());
    }
}
