use crate::config::Config;
use crate::error::{token_error, SunResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// OAuth token endpoint
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope needed to create calendars and insert events
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

// Refresh this long before the recorded expiry
const EXPIRY_SKEW_SECONDS: i64 = 60;

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// Authorized-user credentials as stored in `token.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthorizedUser {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expiry: Option<DateTime<Utc>>,
    /// Keys we do not interpret but write back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthorizedUser {
    /// True when there is no access token or it is about to expire
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expiry) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(_), Some(expiry)) => expiry - Duration::seconds(EXPIRY_SKEW_SECONDS) <= now,
        }
    }

    /// Record a freshly issued token
    pub fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        let expires_in = response.expires_in.unwrap_or(3600);
        self.token = Some(response.access_token);
        self.expiry = Some(now + Duration::seconds(expires_in));
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
    }
}

/// Response of the OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

/// Read an authorized-user file
pub async fn read_token_file(path: &Path) -> SunResult<AuthorizedUser> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        token_error(&format!("Failed to read token file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| token_error(&format!("Failed to parse token file {}: {}", path.display(), e)))
}

/// Write an authorized-user file
pub async fn write_token_file(path: &Path, user: &AuthorizedUser) -> SunResult<()> {
    let content = serde_json::to_string_pretty(user)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Hands out a valid access token, refreshing it through the token file's
/// refresh token when needed.
pub struct TokenManager {
    path: PathBuf,
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    cached: Mutex<Option<AuthorizedUser>>,
}

impl TokenManager {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.token_file.clone(),
            client: Client::new(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Get an access token, loading or refreshing credentials as required
    pub async fn access_token(&self) -> SunResult<String> {
        let mut cached = self.cached.lock().await;

        let mut user = match cached.take() {
            Some(user) => user,
            None => read_token_file(&self.path).await?,
        };

        if user.needs_refresh(Utc::now()) {
            self.refresh(&mut user).await?;
            write_token_file(&self.path, &user).await?;
            info!("Refreshed access token and updated {}", self.path.display());
        }

        let token = user
            .token
            .clone()
            .ok_or_else(|| token_error("No access token available"))?;
        *cached = Some(user);

        Ok(token)
    }

    /// Refresh an expired token
    async fn refresh(&self, user: &mut AuthorizedUser) -> SunResult<()> {
        let refresh_token = user
            .refresh_token
            .clone()
            .ok_or_else(|| token_error("No refresh token in token data"))?;

        let client_id = user
            .client_id
            .clone()
            .or_else(|| self.client_id.clone())
            .ok_or_else(|| token_error("No client_id in token file or GOOGLE_CLIENT_ID"))?;

        let client_secret = user
            .client_secret
            .clone()
            .or_else(|| self.client_secret.clone())
            .ok_or_else(|| token_error("No client_secret in token file or GOOGLE_CLIENT_SECRET"))?;

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token".to_string()),
        ];

        debug!("Refreshing access token via {}", user.token_uri);
        let response = self
            .client
            .post(&user.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| token_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(token_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: TokenResponse = response
            .json()
            .await
            .map_err(|e| token_error(&format!("Failed to parse token response: {}", e)))?;

        user.apply(new_token, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> AuthorizedUser {
        serde_json::from_str(
            r#"{
                "token": "ya29.old",
                "refresh_token": "1//refresh",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_id": "id.apps.googleusercontent.com",
                "client_secret": "secret",
                "scopes": ["https://www.googleapis.com/auth/calendar"],
                "universe_domain": "googleapis.com",
                "expiry": "2024-06-21T10:00:00.123456Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parses_authorized_user_file() {
        let user = sample();
        assert_eq!(user.token.as_deref(), Some("ya29.old"));
        assert_eq!(user.scopes, vec![CALENDAR_SCOPE.to_string()]);
        assert_eq!(user.extra["universe_domain"], "googleapis.com");
    }

    #[test]
    fn test_needs_refresh_near_expiry() {
        let user = sample();
        let before = Utc.with_ymd_and_hms(2024, 6, 21, 9, 0, 0).unwrap();
        let inside_skew = Utc.with_ymd_and_hms(2024, 6, 21, 9, 59, 30).unwrap();
        assert!(!user.needs_refresh(before));
        assert!(user.needs_refresh(inside_skew));

        let empty = AuthorizedUser::default();
        assert!(empty.needs_refresh(before));
    }

    #[test]
    fn test_apply_keeps_refresh_token_when_not_reissued() {
        let mut user = sample();
        let now = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        user.apply(
            TokenResponse {
                access_token: "ya29.new".to_string(),
                expires_in: Some(3599),
                refresh_token: None,
            },
            now,
        );

        assert_eq!(user.token.as_deref(), Some("ya29.new"));
        assert_eq!(user.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(user.expiry, Some(now + Duration::seconds(3599)));
    }

    #[test]
    fn test_round_trip_keeps_unknown_keys() {
        let user = sample();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["universe_domain"], "googleapis.com");
        assert_eq!(value["token_uri"], GOOGLE_TOKEN_URI);
    }
}
