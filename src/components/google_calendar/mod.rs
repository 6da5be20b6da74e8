pub mod client;
pub mod models;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarListEntry, NewEvent};

use crate::error::SunResult;
use async_trait::async_trait;
use tracing::info;

/// Calendar operations the publisher needs
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Every calendar visible to the account
    async fn list_calendars(&self) -> SunResult<Vec<CalendarListEntry>>;

    /// Create a secondary calendar
    async fn create_calendar(&self, name: &str) -> SunResult<CalendarListEntry>;

    /// Insert one event; no duplicate check is made
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> SunResult<()>;
}

/// First comma-separated segment of a location label
pub fn city_name(location: &str) -> &str {
    location.split(',').next().unwrap_or(location).trim()
}

/// Display name of the calendar for a location
pub fn calendar_name(location: &str) -> String {
    format!("Sunrise/Sunset in {}", city_name(location))
}

/// Return the id of the calendar for `location`, creating it if no calendar
/// carries exactly that name.
pub async fn get_or_create_calendar<C>(api: &C, location: &str) -> SunResult<String>
where
    C: CalendarApi + ?Sized,
{
    let name = calendar_name(location);

    let calendars = api.list_calendars().await?;
    if let Some(existing) = calendars.into_iter().find(|c| c.summary == name) {
        info!("Using existing calendar '{}'", name);
        return Ok(existing.id);
    }

    let created = api.create_calendar(&name).await?;
    info!("Created calendar '{}'", name);
    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_name_uses_first_segment() {
        assert_eq!(calendar_name("Paris, France"), "Sunrise/Sunset in Paris");
        assert_eq!(calendar_name("  New York , NY, USA"), "Sunrise/Sunset in New York");
        assert_eq!(city_name("Reykjavik,Iceland"), "Reykjavik");
    }
}
