use super::models::{CalendarListEntry, CalendarListPage, NewCalendar, NewEvent};
use super::token::TokenManager;
use super::CalendarApi;
use crate::config::Config;
use crate::error::{google_calendar_error, SunResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

/// Calendar v3 REST client authenticated with the stored user token
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    tokens: TokenManager,
}

impl GoogleCalendarClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.calendar_api_url.trim_end_matches('/').to_string(),
            tokens: TokenManager::new(config),
        }
    }

    /// Build an API URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> SunResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API URL cannot take a path"))?
            .extend(segments);
        Ok(url)
    }

    async fn bearer(&self) -> SunResult<String> {
        let token = self.tokens.access_token().await?;
        Ok(format!("Bearer {}", token))
    }

    /// Turn a non-success response into an error carrying the body
    async fn check(response: Response, action: &str) -> SunResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(google_calendar_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_calendars(&self) -> SunResult<Vec<CalendarListEntry>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(&["users", "me", "calendarList"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self
                .client
                .get(url)
                .header("Authorization", self.bearer().await?)
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to list calendars: {}", e)))?;

            let page: CalendarListPage = Self::check(response, "list calendars")
                .await?
                .json()
                .await
                .map_err(|e| {
                    google_calendar_error(&format!("Failed to parse calendar list: {}", e))
                })?;

            calendars.extend(page.items);
            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!("Listed {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn create_calendar(&self, name: &str) -> SunResult<CalendarListEntry> {
        let url = self.url(&["calendars"])?;
        let body = NewCalendar {
            summary: name.to_string(),
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create calendar: {}", e)))?;

        Self::check(response, "create calendar")
            .await?
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse created calendar: {}", e)))
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> SunResult<()> {
        let url = self.url(&["calendars", calendar_id, "events"])?;

        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer().await?)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        Self::check(response, "insert event").await?;
        Ok(())
    }
}
