//! Error types for the eawatch client.

use thiserror::Error;

/// Fallback shown when the server gives no usable message.
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// The main error type for eawatch.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// Network connectivity errors (DNS, refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 403.
    #[error("Access denied{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Forbidden(Option<String>),

    /// An authenticated call was attempted without a stored token.
    #[error("Not signed in")]
    NotSignedIn,

    /// The backend revoked a session we held a token for.
    #[error("Account inactive: please sign in again")]
    AccountInactive,

    /// Any other 4xx response.
    #[error("Request rejected ({status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// 5xx responses.
    #[error("Server error ({status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Map an HTTP status and optional server message to an error.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            403 => Self::Forbidden(message),
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    /// Whether the login flow should retry after this error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Message suitable for an alert shown to the user.
    ///
    /// Validation failures carry the server's text verbatim. Everything else
    /// gets a short generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(m), ..
            }
            | Self::Forbidden(Some(m)) => m.clone(),
            Self::Timeout | Self::Network(_) => {
                "Unable to reach the server. Check your connection.".to_string()
            }
            Self::AccountInactive | Self::NotSignedIn => self.to_string(),
            Self::InvalidInput(m) => m.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), None)
        } else {
            Self::Network(err.to_string())
        }
    }
}
