use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Usage error: {0}")]
    #[diagnostic(code(suncal::usage))]
    Usage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(suncal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(suncal::config))]
    Config(String),

    #[error("Geocoding error: {0}")]
    #[diagnostic(code(suncal::geocoding))]
    Geocoding(String),

    #[error("Timezone error: {0}")]
    #[diagnostic(code(suncal::timezone))]
    Timezone(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(suncal::google_calendar))]
    GoogleCalendar(String),

    #[error("Token error: {0}")]
    #[diagnostic(
        code(suncal::token),
        help("Run `get_calendar_token` to create a fresh token file")
    )]
    Token(String),

    #[error(transparent)]
    #[diagnostic(code(suncal::io))]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(suncal::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(suncal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(suncal::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SunResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid value for environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create geocoding errors
pub fn geocoding_error(message: &str) -> Error {
    Error::Geocoding(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create token errors
pub fn token_error(message: &str) -> Error {
    Error::Token(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
