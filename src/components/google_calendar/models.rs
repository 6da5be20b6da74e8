use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar as listed for the authenticated account
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

/// One page of `calendarList.list`
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

/// Body of `calendars.insert`
#[derive(Debug, Serialize)]
pub struct NewCalendar {
    pub summary: String,
}

/// Start or end of a timed event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventDateTime {
    pub fn from_local(instant: &DateTime<Tz>) -> Self {
        Self {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, false),
            time_zone: instant.timezone().name().to_string(),
        }
    }
}

/// Body of `events.insert`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

impl NewEvent {
    pub fn new(summary: &str, description: &str, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        Self {
            summary: summary.to_string(),
            description: description.to_string(),
            start: EventDateTime::from_local(start),
            end: EventDateTime::from_local(end),
        }
    }
}
