//! Configuration settings for eawatch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix, e.g. `EAWATCH_API__BASE_URL`.
const ENV_PREFIX: &str = "EAWATCH";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Refresh cadences.
    pub polling: PollingConfig,
    /// Floating signal badge.
    pub overlay: OverlayConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration in layers: defaults, then the TOML file, then
    /// `EAWATCH_*` environment variables.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_path);
        Self::load_with_env(&config_path, ENV_PREFIX)
    }

    fn load_with_env(config_path: &Path, prefix: &str) -> crate::Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())
            .map_err(|e| crate::Error::config(e.to_string()))?;

        ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::from(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Timeout for the single login retry, to ride out a cold start.
    pub login_retry_timeout_secs: u64,
    /// Pause before the login retry, in milliseconds.
    pub login_retry_delay_ms: u64,
    /// Where the session file lives. Defaults to the platform data dir.
    pub session_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn login_retry_timeout(&self) -> Duration {
        Duration::from_secs(self.login_retry_timeout_secs)
    }

    pub fn login_retry_delay(&self) -> Duration {
        Duration::from_millis(self.login_retry_delay_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 15,
            login_retry_timeout_secs: 60,
            login_retry_delay_ms: 2000,
            session_path: None,
        }
    }
}

/// Refresh cadences, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Monitors and quotes.
    pub fast_secs: u64,
    /// Signals, alerts and indicator state.
    pub medium_secs: u64,
    /// Branding, brokers and news.
    pub slow_secs: u64,
    /// Drop responses that arrive after a newer request for the same resource.
    pub discard_stale_responses: bool,
}

impl PollingConfig {
    pub fn fast(&self) -> Duration {
        Duration::from_secs(self.fast_secs.max(1))
    }

    pub fn medium(&self) -> Duration {
        Duration::from_secs(self.medium_secs.max(1))
    }

    pub fn slow(&self) -> Duration {
        Duration::from_secs(self.slow_secs.max(1))
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_secs: 5,
            medium_secs: 10,
            slow_secs: 30,
            discard_stale_responses: true,
        }
    }
}

/// Floating signal badge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Show the badge at all.
    pub enabled: bool,
    /// Pointer travel (in cells) below which a press/release counts as a tap.
    pub tap_threshold: u16,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tap_threshold: 2,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support (required to drag the signal badge).
    pub mouse_support: bool,
    /// Seconds a notification stays on screen.
    pub notification_secs: u64,
    /// Quote category shown on the dashboard at start (None for all).
    pub default_quote_category: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            notification_secs: 4,
            default_quote_category: None,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Refresh the current screen now.
    pub refresh: String,
    /// Switch to dashboard.
    pub dashboard: String,
    /// Switch to monitor configuration.
    pub monitors: String,
    /// Switch to brokers.
    pub brokers: String,
    /// Switch to news.
    pub news: String,
    /// Switch to mentor indicators.
    pub indicators: String,
    /// Open the add-monitor form.
    pub add_monitor: String,
    /// Delete the selected monitor.
    pub delete_monitor: String,
    /// Start or stop the selected monitor.
    pub toggle_monitor: String,
    /// Cycle the quote category filter.
    pub cycle_category: String,
    /// Expand or collapse the signal badge.
    pub toggle_overlay: String,
    /// Sign out.
    pub logout: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            dashboard: "1".to_string(),
            monitors: "2".to_string(),
            brokers: "3".to_string(),
            news: "4".to_string(),
            indicators: "5".to_string(),
            add_monitor: "a".to_string(),
            delete_monitor: "d".to_string(),
            toggle_monitor: "s".to_string(),
            cycle_category: "c".to_string(),
            toggle_overlay: "o".to_string(),
            logout: "L".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Primary color (hex).
    pub primary: String,
    /// Buy signal color (hex).
    pub buy: String,
    /// Sell signal color (hex).
    pub sell: String,
    /// Neutral signal color (hex).
    pub neutral: String,
    /// Border color (hex).
    pub border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#5c6bc0".to_string(),
            buy: "#66bb6a".to_string(),
            sell: "#ef5350".to_string(),
            neutral: "#9e9e9e".to_string(),
            border: "#45475a".to_string(),
        }
    }
}
