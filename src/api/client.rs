//! HTTP client for the signal backend.

use super::endpoints;
use super::models::{
    Branding, Broker, LoginRequest, LoginResponse, LoginRole, ManualSignal, MentorIndicator,
    Monitor, MonitorStatus, NewMonitor, NewsItem, Quote, SymbolCatalog, UpcomingAlert,
};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Everything the client needs from the backend.
///
/// Authenticated calls take the bearer token explicitly so the caller decides
/// what "signed in" means. Quotes, symbols and branding are public.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(
        &self,
        role: LoginRole,
        request: &LoginRequest,
        timeout: Duration,
    ) -> Result<LoginResponse>;

    async fn list_monitors(&self, token: &str) -> Result<Vec<Monitor>>;

    async fn create_monitor(&self, token: &str, body: &NewMonitor) -> Result<Monitor>;

    async fn delete_monitor(&self, token: &str, id: &str) -> Result<()>;

    /// Ask the backend to start or stop a monitor; returns its new state.
    async fn set_monitor_status(
        &self,
        token: &str,
        id: &str,
        target: MonitorStatus,
    ) -> Result<Monitor>;

    async fn quotes(&self, category: Option<String>) -> Result<Vec<Quote>>;

    async fn symbol_catalog(&self) -> Result<SymbolCatalog>;

    /// The active manual signal, if any.
    async fn latest_manual_signal(&self, token: &str) -> Result<Option<ManualSignal>>;

    async fn brokers(&self, token: &str) -> Result<Vec<Broker>>;

    async fn news(&self, token: &str) -> Result<Vec<NewsItem>>;

    async fn upcoming_alerts(&self, token: &str) -> Result<Vec<UpcomingAlert>>;

    async fn mentor_indicators(&self, token: &str) -> Result<Vec<MentorIndicator>>;

    async fn select_mentor_indicator(&self, token: &str, id: &str) -> Result<()>;

    async fn branding(&self) -> Result<Branding>;
}

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::new(self.config)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// reqwest-backed implementation of [`Backend`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("eawatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "backend request");
        self.http.request(method, url).timeout(self.timeout)
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    /// Send and decode the body, mapping non-2xx statuses to [`Error`].
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let value = self.send_value(request).await?;
        serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
    }

    async fn send_value(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            tracing::debug!(status = status.as_u16(), ?message, "backend error response");
            return Err(Error::from_status(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::decode(e.to_string()))
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        key: &str,
    ) -> Result<Vec<T>> {
        let value = self.send_value(request).await?;
        decode_list(value, key)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(
        &self,
        role: LoginRole,
        request: &LoginRequest,
        timeout: Duration,
    ) -> Result<LoginResponse> {
        let builder = self
            .request(Method::POST, endpoints::login(role))
            .timeout(timeout)
            .json(request);
        self.send(builder).await
    }

    async fn list_monitors(&self, token: &str) -> Result<Vec<Monitor>> {
        self.send_list(self.authed(Method::GET, endpoints::MONITORS, token), "eas")
            .await
    }

    async fn create_monitor(&self, token: &str, body: &NewMonitor) -> Result<Monitor> {
        let value = self
            .send_value(self.authed(Method::POST, endpoints::MONITORS, token).json(body))
            .await?;
        decode_object(value, "ea")
    }

    async fn delete_monitor(&self, token: &str, id: &str) -> Result<()> {
        self.send_value(self.authed(Method::DELETE, &endpoints::monitor(id), token))
            .await
            .map(|_| ())
    }

    async fn set_monitor_status(
        &self,
        token: &str,
        id: &str,
        target: MonitorStatus,
    ) -> Result<Monitor> {
        let path = endpoints::monitor_transition(id, target);
        let value = self.send_value(self.authed(Method::POST, &path, token)).await?;
        decode_object(value, "ea")
    }

    async fn quotes(&self, category: Option<String>) -> Result<Vec<Quote>> {
        let mut request = self.request(Method::GET, endpoints::QUOTES);
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            request = request.query(&[("category", category)]);
        }
        self.send_list(request, "quotes").await
    }

    async fn symbol_catalog(&self) -> Result<SymbolCatalog> {
        let value = self
            .send_value(self.request(Method::GET, endpoints::SYMBOLS))
            .await?;
        decode_object(value, "symbols")
    }

    async fn latest_manual_signal(&self, token: &str) -> Result<Option<ManualSignal>> {
        let value = self
            .send_value(self.authed(Method::GET, endpoints::LATEST_SIGNAL, token))
            .await?;
        decode_optional(value, "signal")
    }

    async fn brokers(&self, token: &str) -> Result<Vec<Broker>> {
        self.send_list(self.authed(Method::GET, endpoints::BROKERS, token), "brokers")
            .await
    }

    async fn news(&self, token: &str) -> Result<Vec<NewsItem>> {
        self.send_list(self.authed(Method::GET, endpoints::NEWS, token), "news")
            .await
    }

    async fn upcoming_alerts(&self, token: &str) -> Result<Vec<UpcomingAlert>> {
        self.send_list(
            self.authed(Method::GET, endpoints::UPCOMING_ALERTS, token),
            "alerts",
        )
        .await
    }

    async fn mentor_indicators(&self, token: &str) -> Result<Vec<MentorIndicator>> {
        self.send_list(
            self.authed(Method::GET, endpoints::MENTOR_INDICATORS, token),
            "indicators",
        )
        .await
    }

    async fn select_mentor_indicator(&self, token: &str, id: &str) -> Result<()> {
        let body = serde_json::json!({ "indicatorId": id });
        self.send_value(
            self.authed(Method::POST, endpoints::SELECT_INDICATOR, token)
                .json(&body),
        )
        .await
        .map(|_| ())
    }

    async fn branding(&self) -> Result<Branding> {
        let value = self
            .send_value(self.request(Method::GET, endpoints::BRANDING))
            .await?;
        decode_object(value, "branding")
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Strip a `{"data": ...}` or `{"<key>": ...}` envelope if present.
fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) => {
            if let Some(inner) = map.remove("data").or_else(|| map.remove(key)) {
                inner
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>> {
    match unwrap_envelope(value, key) {
        Value::Null => Ok(Vec::new()),
        list @ Value::Array(_) => {
            serde_json::from_value(list).map_err(|e| Error::decode(e.to_string()))
        }
        other => Err(Error::decode(format!(
            "expected a list of {key}, got {}",
            json_kind(&other)
        ))),
    }
}

fn decode_object<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    serde_json::from_value(unwrap_envelope(value, key)).map_err(|e| Error::decode(e.to_string()))
}

fn decode_optional<T: DeserializeOwned>(value: Value, key: &str) -> Result<Option<T>> {
    match unwrap_envelope(value, key) {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        inner => serde_json::from_value(inner)
            .map(Some)
            .map_err(|e| Error::decode(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_lookup_order() {
        assert_eq!(
            error_message(r#"{"error":"x","message":"Invalid symbol"}"#).as_deref(),
            Some("Invalid symbol")
        );
        assert_eq!(error_message(r#"{"detail":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_decode_list_accepts_bare_and_wrapped() {
        let bare: Vec<Broker> = decode_list(json!([{"_id": "1", "name": "IC"}]), "brokers").unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped: Vec<Broker> =
            decode_list(json!({"brokers": [{"_id": "1", "name": "IC"}]}), "brokers").unwrap();
        assert_eq!(wrapped[0].name, "IC");

        let data: Vec<Broker> =
            decode_list(json!({"success": true, "data": []}), "brokers").unwrap();
        assert!(data.is_empty());

        let err = decode_list::<Broker>(json!({"oops": 1}), "brokers").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_optional_signal() {
        assert!(decode_optional::<ManualSignal>(Value::Null, "signal").unwrap().is_none());
        assert!(decode_optional::<ManualSignal>(json!({}), "signal").unwrap().is_none());
        assert!(
            decode_optional::<ManualSignal>(json!({"signal": null}), "signal")
                .unwrap()
                .is_none()
        );

        let signal: ManualSignal = decode_optional(
            json!({"signal": {"_id": "m1", "symbol": "EURUSD", "type": "SELL"}}),
            "signal",
        )
        .unwrap()
        .unwrap();
        assert_eq!(signal.symbol, "EURUSD");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = ApiClientBuilder::new()
            .config(ApiConfig {
                base_url: "https://api.example.com/".into(),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
