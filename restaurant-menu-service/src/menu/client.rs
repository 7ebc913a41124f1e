//! Upstream restaurant menu API client implementation.

use chrono::{DateTime, Local};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, error, info};

use super::responses::MenuData;
use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

/// Path of the menu endpoint, relative to the configured base URL
const MENU_PATH: &str = "/ecom/v1/restaurant-menu";

/// Fixed session identifier the menu API expects from kiosk clients
const KIOSK_SESSION_ID: &str = "uak84xaaez3zujkyn11io";

/// Format of `ui_request_timestamp`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifies which restaurant menu to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuQuery {
    pub restaurant_id: i64,
    pub branch_id: i64,
    pub brand_id: String,
}

/// JSON body of a menu request
#[derive(Debug, Serialize)]
pub(crate) struct MenuRequest<'a> {
    restaurant_id: i64,
    branch_id: i64,
    brand_id: &'a str,
    is_pos: u8,
    session_id: &'static str,
    version: &'static str,
    lang: &'static str,
    source: &'static str,
    ui_request_timestamp: String,
}

impl<'a> MenuRequest<'a> {
    pub(crate) fn new(query: &'a MenuQuery, now: DateTime<Local>) -> Self {
        Self {
            restaurant_id: query.restaurant_id,
            branch_id: query.branch_id,
            brand_id: &query.brand_id,
            is_pos: 2,
            session_id: KIOSK_SESSION_ID,
            version: "0.1",
            lang: "en",
            source: "kiosk",
            ui_request_timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Upstream menu API client
#[derive(Clone)]
pub struct UpstreamMenuClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamMenuClient {
    /// Create a new client.
    ///
    /// Missing credentials are not an error here; they are reported on each
    /// fetch so the service can start without them.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("restaurant-menu-service/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Fetch the full menu document for a restaurant branch.
    ///
    /// Makes exactly one POST request. Fails before touching the network
    /// when any credential is missing.
    pub async fn fetch_menu(&self, query: &MenuQuery) -> Result<MenuData, UpstreamError> {
        let credentials = self.config.credentials().inspect_err(|e| {
            error!(error = %e, "Upstream menu API is not configured");
        })?;

        let url = menu_url(credentials.base_url);
        let body = MenuRequest::new(query, Local::now());

        info!(
            restaurant_id = query.restaurant_id,
            branch_id = query.branch_id,
            brand_id = %query.brand_id,
            "Requesting restaurant menu"
        );
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", credentials.authorization)
            .header("UUID", credentials.uuid)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .inspect_err(|e| error!(error = %e, "Menu API request failed"))?;

        let bytes = response
            .bytes()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to read menu API response"))?;

        let data = parse_menu_document(&bytes)
            .inspect_err(|e| error!(error = %e, "Invalid response structure received from API"))?;
        debug!("API request successful");

        Ok(data)
    }
}

fn menu_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MENU_PATH)
}

/// Validate and decode a menu response body.
///
/// The body must be JSON with a truthy top-level `data` value shaped like a
/// menu document.
pub(crate) fn parse_menu_document(body: &[u8]) -> Result<MenuData, UpstreamError> {
    let mut document: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| UpstreamError::InvalidResponse {
            message: format!("body is not valid JSON: {}", e),
        })?;

    let data = document
        .get_mut("data")
        .map(serde_json::Value::take)
        .filter(is_truthy)
        .ok_or_else(|| UpstreamError::InvalidResponse {
            message: "missing or empty `data` field".to_string(),
        })?;

    serde_json::from_value(data).map_err(|e| UpstreamError::InvalidResponse {
        message: format!("unexpected `data` shape: {}", e),
    })
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_request_body_carries_fixed_fields() {
        let query = MenuQuery {
            restaurant_id: 255,
            branch_id: 2942,
            brand_id: "7c15f9e7-cec4-11ed-8648-129754d6b903".to_string(),
        };
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

        let body = serde_json::to_value(MenuRequest::new(&query, now)).unwrap();
        assert_eq!(
            body,
            json!({
                "restaurant_id": 255,
                "branch_id": 2942,
                "brand_id": "7c15f9e7-cec4-11ed-8648-129754d6b903",
                "is_pos": 2,
                "session_id": "uak84xaaez3zujkyn11io",
                "version": "0.1",
                "lang": "en",
                "source": "kiosk",
                "ui_request_timestamp": "2024-03-09 07:05:01"
            })
        );
    }

    #[test]
    fn test_menu_url_trims_trailing_slash() {
        assert_eq!(
            menu_url("https://api.example.com/"),
            "https://api.example.com/ecom/v1/restaurant-menu"
        );
        assert_eq!(
            menu_url("https://api.example.com"),
            "https://api.example.com/ecom/v1/restaurant-menu"
        );
    }

    #[test]
    fn test_parse_valid_document() {
        let body = br#"{"status": 200, "data": {"menu_type": [{"menu_category": [{"category_display_text": "Mains"}]}]}}"#;
        let data = parse_menu_document(body).unwrap();
        assert_eq!(data.categories().count(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_or_falsy_data() {
        for body in [
            r#"{}"#,
            r#"{"data": null}"#,
            r#"{"data": {}}"#,
            r#"{"data": []}"#,
            r#"{"data": false}"#,
            r#"{"data": ""}"#,
            r#"{"data": 0}"#,
            r#"[]"#,
            r#"null"#,
        ] {
            let result = parse_menu_document(body.as_bytes());
            assert!(
                matches!(result, Err(UpstreamError::InvalidResponse { .. })),
                "expected invalid response for {body}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_json_and_wrong_shape() {
        assert!(matches!(
            parse_menu_document(b"<html>502 Bad Gateway</html>"),
            Err(UpstreamError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_menu_document(br#"{"data": {"menu_type": "breakfast"}}"#),
            Err(UpstreamError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_without_credentials_fails_before_network() {
        let client = UpstreamMenuClient::new(UpstreamConfig {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        })
        .unwrap();
        let query = MenuQuery {
            restaurant_id: 1,
            branch_id: 2,
            brand_id: "brand".to_string(),
        };

        match client.fetch_menu(&query).await {
            Err(UpstreamError::Configuration { missing }) => {
                assert_eq!(missing, vec!["AUTHORIZATION", "UUID"]);
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}
