#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use suncal::components::geocoder::{Geocode, Location};
use suncal::components::google_calendar::{CalendarApi, CalendarListEntry, NewEvent};
use suncal::error::{google_calendar_error, SunResult};

/// In-memory calendar service recording every call
#[derive(Debug, Default)]
pub struct MockCalendar {
    pub calendars: Mutex<Vec<CalendarListEntry>>,
    pub events: Mutex<Vec<(String, NewEvent)>>,
    pub list_calls: AtomicUsize,
    /// Inserts whose summary contains this text fail
    pub fail_on: Option<String>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock with calendars already present on the account
    pub fn with_calendars(names: &[(&str, &str)]) -> Self {
        let calendars = names
            .iter()
            .map(|(id, summary)| CalendarListEntry {
                id: id.to_string(),
                summary: summary.to_string(),
            })
            .collect();

        Self {
            calendars: Mutex::new(calendars),
            ..Default::default()
        }
    }

    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<(String, NewEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn calendar_count(&self) -> usize {
        self.calendars.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarApi for MockCalendar {
    async fn list_calendars(&self) -> SunResult<Vec<CalendarListEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.calendars.lock().unwrap().clone())
    }

    async fn create_calendar(&self, name: &str) -> SunResult<CalendarListEntry> {
        let mut calendars = self.calendars.lock().unwrap();
        let entry = CalendarListEntry {
            id: format!("generated-{}@group.calendar.google.com", calendars.len() + 1),
            summary: name.to_string(),
        };
        calendars.push(entry.clone());
        Ok(entry)
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> SunResult<()> {
        if let Some(text) = &self.fail_on {
            if event.summary.contains(text.as_str()) {
                return Err(google_calendar_error("HTTP 403 Forbidden - rateLimitExceeded"));
            }
        }
        self.events
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event.clone()));
        Ok(())
    }
}

/// Geocoder answering from a fixed table
#[derive(Debug, Default)]
pub struct MockGeocoder {
    pub places: Vec<(String, f64, f64)>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            places: vec![
                ("Paris, France".to_string(), 48.8588897, 2.3200410),
                ("Tromso, Norway".to_string(), 69.6492, 18.9553),
                ("Quito, Ecuador".to_string(), -0.2201641, -78.5123274),
                ("Helsinki, Finland".to_string(), 60.1674881, 24.9427473),
            ],
        }
    }
}

#[async_trait]
impl Geocode for MockGeocoder {
    async fn geocode(&self, query: &str) -> SunResult<Option<Location>> {
        Ok(self
            .places
            .iter()
            .find(|(name, _, _)| name == query)
            .map(|(name, latitude, longitude)| Location {
                latitude: *latitude,
                longitude: *longitude,
                display_name: Some(name.clone()),
            }))
    }
}
