//! Wire types mirrored from the signal backend.
//!
//! The backend owns all of these. The client only deserializes, caches and
//! displays them, so every field the UI does not strictly need is optional.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Trading signal direction as computed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell", alias = "Sell")]
    Sell,
    /// `NEUTRAL`, `NONE` and anything unrecognised.
    #[default]
    #[serde(rename = "NEUTRAL", other)]
    Neutral,
}

impl SignalKind {
    pub fn is_actionable(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Monitor lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Running,
    #[default]
    Stopped,
}

impl MonitorStatus {
    /// The status a toggle asks the backend for.
    pub fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Stopped,
            Self::Stopped => Self::Running,
        }
    }
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Indicator selection for a monitor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Indicator identifier, e.g. `RSI` or `MACD`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form parameters, passed through untouched.
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// What a monitor watches. Older records may lack any of the fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub symbol: String,
    pub timeframe: String,
    pub indicator: IndicatorConfig,
}

/// A user-configured monitor ("EA").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: MonitorStatus,
    #[serde(default)]
    pub config: MonitorConfig,
    #[serde(default, alias = "last_signal", alias = "signal")]
    pub last_signal: Option<SignalKind>,
    #[serde(default, alias = "last_price")]
    pub last_price: Option<Decimal>,
    #[serde(default, alias = "indicator_values")]
    /// `None` entries are indicators the server could not compute yet.
    pub indicator_values: Option<HashMap<String, Option<f64>>>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Monitor {
    pub fn is_running(&self) -> bool {
        self.status == MonitorStatus::Running
    }

    /// The backend's last signal, neutral when none was reported.
    pub fn signal(&self) -> SignalKind {
        self.last_signal.unwrap_or_default()
    }
}

/// Body for creating a monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMonitor {
    pub name: String,
    pub config: MonitorConfig,
}

/// A market quote snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Quote {
    /// Best price to display: close, then mid, then whichever side exists.
    pub fn display_price(&self) -> Option<Decimal> {
        self.close.or(match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            (bid, ask) => bid.or(ask),
        })
    }
}

/// Category name to tradable symbols.
pub type SymbolCatalog = BTreeMap<String, Vec<String>>;

/// A signal pushed by an admin or mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSignal {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type", alias = "signal", alias = "signalType")]
    pub kind: SignalKind,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A broker recommended to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A market news item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default, alias = "currency")]
    pub symbol: Option<String>,
    #[serde(default, alias = "date", alias = "event_time")]
    pub event_time: Option<DateTime<Utc>>,
}

/// A news event the backend will alert on soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAlert {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default, alias = "event_time", alias = "time")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "minutes_until")]
    pub minutes_until: Option<i64>,
}

/// A custom indicator made available by a mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorIndicator {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "mentor_name")]
    pub mentor_name: Option<String>,
    #[serde(default, alias = "is_selected", alias = "isSelected")]
    pub selected: bool,
    #[serde(default, alias = "current_signal", alias = "signal")]
    pub current_signal: Option<SignalKind>,
}

/// System name and background shown on every screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default, alias = "system_name")]
    pub system_name: Option<String>,
    #[serde(default, alias = "background_url", alias = "backgroundImage")]
    pub background_url: Option<String>,
}

/// Which login endpoint to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginRole {
    #[default]
    User,
    Admin,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "access_token", alias = "token")]
    pub access_token: String,
    #[serde(default, alias = "user_type", alias = "role")]
    pub user_type: Option<String>,
    #[serde(default, alias = "has_paid", alias = "isPaid")]
    pub has_paid: Option<bool>,
    #[serde(default, alias = "is_active")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monitor_from_backend_json() {
        let json = r#"{
            "_id": "a",
            "name": "EURUSD RSI",
            "status": "running",
            "config": {
                "symbol": "EURUSD",
                "timeframe": "M15",
                "indicator": { "type": "RSI", "parameters": { "period": 14 } }
            },
            "lastSignal": "BUY",
            "lastPrice": 1.0842,
            "indicatorValues": { "rsi": 28.4 },
            "createdAt": "2024-05-01T10:00:00Z",
            "somethingNew": true
        }"#;

        let monitor: Monitor = serde_json::from_str(json).unwrap();
        assert_eq!(monitor.id, "a");
        assert!(monitor.is_running());
        assert_eq!(monitor.signal(), SignalKind::Buy);
        assert_eq!(monitor.last_price, Some(dec!(1.0842)));
        assert_eq!(monitor.config.indicator.kind, "RSI");
        assert_eq!(monitor.config.indicator.parameters["period"], 14);
        assert!(monitor.updated_at.is_none());
    }

    #[test]
    fn test_monitor_with_partial_config() {
        let json = r#"{
            "_id": "b",
            "name": "Legacy",
            "config": { "symbol": "GBPUSD" },
            "indicatorValues": { "rsi": null, "ema": 1.2711 }
        }"#;

        let monitor: Monitor = serde_json::from_str(json).unwrap();
        assert_eq!(monitor.config.symbol, "GBPUSD");
        assert_eq!(monitor.config.timeframe, "");
        assert_eq!(monitor.config.indicator, IndicatorConfig::default());
        let values = monitor.indicator_values.unwrap();
        assert_eq!(values["rsi"], None);
        assert_eq!(values["ema"], Some(1.2711));
    }

    #[test]
    fn test_indicator_without_parameters() {
        let json = r#"{ "symbol": "EURUSD", "timeframe": "H1", "indicator": { "type": "MACD" } }"#;
        let config: MonitorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.indicator.kind, "MACD");
        assert!(config.indicator.parameters.is_empty());
    }

    #[test]
    fn test_signal_none_reads_as_neutral() {
        let kind: SignalKind = serde_json::from_str("\"NONE\"").unwrap();
        assert_eq!(kind, SignalKind::Neutral);
        let kind: SignalKind = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(kind, SignalKind::Sell);
        assert!(!SignalKind::Neutral.is_actionable());
    }

    #[test]
    fn test_quote_display_price() {
        let quote = Quote {
            symbol: "XAUUSD".into(),
            category: Some("metals".into()),
            bid: Some(dec!(2300)),
            ask: Some(dec!(2302)),
            close: None,
            change: None,
            timestamp: None,
        };
        assert_eq!(quote.display_price(), Some(dec!(2301)));
    }

    #[test]
    fn test_new_monitor_body_shape() {
        let body = NewMonitor {
            name: "Gold".into(),
            config: MonitorConfig {
                symbol: "XAUUSD".into(),
                timeframe: "H1".into(),
                indicator: IndicatorConfig {
                    kind: "MACD".into(),
                    parameters: Default::default(),
                },
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["config"]["indicator"]["type"], "MACD");
        assert_eq!(value["config"]["symbol"], "XAUUSD");
    }

    #[test]
    fn test_login_response_snake_case() {
        let json = r#"{"access_token":"t0k","user_type":"user","is_active":true}"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.access_token, "t0k");
        assert_eq!(login.user_type.as_deref(), Some("user"));
        assert_eq!(login.is_active, Some(true));
    }
}
