use crate::error::{config_error, env_error, SunResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of days to publish
pub const DEFAULT_DAYS: u32 = 365;

/// Default location of the authorized-user token file
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Default Google Calendar REST endpoint
pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default Nominatim endpoint used for geocoding
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// User agent sent to the geocoding service
pub const DEFAULT_USER_AGENT: &str = "sun_cal_app";

/// Optional overrides file
pub const CONFIG_FILE: &str = "config/suncal.toml";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the OAuth authorized-user token file
    pub token_file: PathBuf,
    /// Google OAuth client ID (token tool, refresh fallback)
    pub google_client_id: Option<String>,
    /// Google OAuth client secret (token tool, refresh fallback)
    pub google_client_secret: Option<String>,
    /// Base URL of the Calendar v3 API
    pub calendar_api_url: String,
    /// Base URL of the Nominatim geocoder
    pub nominatim_url: String,
    /// User agent for geocoding requests
    pub user_agent: String,
    /// Number of days published when no count is given
    pub default_days: u32,
    /// Local port receiving the OAuth redirect
    pub oauth_port: u16,
}

/// Keys accepted in `config/suncal.toml`; present keys override the environment
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub token_file: Option<PathBuf>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub calendar_api_url: Option<String>,
    pub nominatim_url: Option<String>,
    pub user_agent: Option<String>,
    pub default_days: Option<u32>,
    pub oauth_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            google_client_id: None,
            google_client_secret: None,
            calendar_api_url: DEFAULT_CALENDAR_API_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_days: DEFAULT_DAYS,
            oauth_port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SunResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_env()?;

        if Path::new(CONFIG_FILE).exists() {
            let content = fs::read_to_string(CONFIG_FILE)?;
            config.merge_toml(&content)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables only
    pub fn from_env() -> SunResult<Self> {
        let mut config = Config::default();

        if let Ok(path) = env::var("SUNCAL_TOKEN_FILE") {
            config.token_file = PathBuf::from(path);
        }
        config.google_client_id = env::var("GOOGLE_CLIENT_ID").ok();
        config.google_client_secret = env::var("GOOGLE_CLIENT_SECRET").ok();

        if let Ok(url) = env::var("SUNCAL_CALENDAR_API_URL") {
            config.calendar_api_url = url;
        }
        if let Ok(url) = env::var("SUNCAL_NOMINATIM_URL") {
            config.nominatim_url = url;
        }
        if let Ok(agent) = env::var("SUNCAL_USER_AGENT") {
            config.user_agent = agent;
        }

        // Parse numeric values
        if let Ok(days) = env::var("SUNCAL_DEFAULT_DAYS") {
            config.default_days = days
                .parse::<u32>()
                .map_err(|_| env_error("SUNCAL_DEFAULT_DAYS"))?;
        }
        if let Ok(port) = env::var("SUNCAL_OAUTH_PORT") {
            config.oauth_port = port
                .parse::<u16>()
                .map_err(|_| env_error("SUNCAL_OAUTH_PORT"))?;
        }

        Ok(config)
    }

    /// Apply overrides from TOML content
    pub fn merge_toml(&mut self, content: &str) -> SunResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(path) = file.token_file {
            self.token_file = path;
        }
        if file.google_client_id.is_some() {
            self.google_client_id = file.google_client_id;
        }
        if file.google_client_secret.is_some() {
            self.google_client_secret = file.google_client_secret;
        }
        if let Some(url) = file.calendar_api_url {
            self.calendar_api_url = url;
        }
        if let Some(url) = file.nominatim_url {
            self.nominatim_url = url;
        }
        if let Some(agent) = file.user_agent {
            self.user_agent = agent;
        }
        if let Some(days) = file.default_days {
            self.default_days = days;
        }
        if let Some(port) = file.oauth_port {
            self.oauth_port = port;
        }

        Ok(())
    }

    /// Reject values no run could work with
    pub fn validate(&self) -> SunResult<()> {
        if self.user_agent.trim().is_empty() {
            return Err(config_error("user_agent must not be empty"));
        }
        for (name, url) in [
            ("calendar_api_url", &self.calendar_api_url),
            ("nominatim_url", &self.nominatim_url),
        ] {
            url::Url::parse(url)
                .map_err(|e| config_error(&format!("{} is not a valid URL: {}", name, e)))?;
        }
        Ok(())
    }
}
