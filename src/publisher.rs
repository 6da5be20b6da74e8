//! The run loop: resolve the place once, then publish a sunrise and a
//! sunset window for every requested date.

use crate::cli::RunArgs;
use crate::components::description::describe;
use crate::components::geocoder::Geocode;
use crate::components::google_calendar::{city_name, get_or_create_calendar, CalendarApi, NewEvent};
use crate::components::solar::{Observer, SolarDay};
use crate::components::timezone::TimezoneResolver;
use crate::error::{Error, SunResult};
use crate::utils::time::date_range;
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{error, info, warn};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Everything a run talks to, constructed once and borrowed by each step
pub struct Publisher<C, G> {
    calendar: C,
    geocoder: G,
    timezones: TimezoneResolver,
}

impl<C, G> Publisher<C, G>
where
    C: CalendarApi,
    G: Geocode,
{
    pub fn new(calendar: C, geocoder: G, timezones: TimezoneResolver) -> Self {
        Self {
            calendar,
            geocoder,
            timezones,
        }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Geocode, pick the timezone and calendar, then publish every day
    pub async fn run(&self, args: &RunArgs) -> SunResult<RunSummary> {
        let location = self
            .geocoder
            .geocode(&args.location)
            .await?
            .ok_or_else(|| {
                Error::Geocoding(format!("Could not find location for '{}'.", args.location))
            })?;

        let observer = Observer::new(location.latitude, location.longitude)?;
        let tz = self.timezones.resolve(location.latitude, location.longitude)?;
        info!(
            "Resolved '{}' to {} at {:.4}, {:.4} ({})",
            args.location,
            location.display_name.as_deref().unwrap_or("an unnamed place"),
            location.latitude,
            location.longitude,
            tz.name()
        );

        let calendar_id = get_or_create_calendar(&self.calendar, &args.location).await?;
        let city = city_name(&args.location);

        let mut summary = RunSummary::default();
        for date in date_range(args.start_date, args.num_days) {
            let day = SolarDay::compute(&observer, date, &tz);
            let description = describe(&day);

            let sunrise_summary = format!("☀️Sunrise in {}", city);
            let sunset_summary = format!("🌅Sunset in {}", city);
            let windows = [
                (sunrise_summary, day.civil_dawn, day.sunrise),
                (sunset_summary, day.sunset, day.civil_dusk),
            ];

            for (title, start, end) in windows {
                match (start, end) {
                    (Some(start), Some(end)) => {
                        self.publish(&calendar_id, &title, &description, &start, &end, &mut summary)
                            .await;
                    }
                    _ => {
                        warn!("Skipping '{}' on {}: the sun does not cross that boundary", title, date);
                        summary.skipped += 1;
                    }
                }
            }
        }

        info!(
            "Finished: {} created, {} failed, {} skipped",
            summary.created, summary.failed, summary.skipped
        );
        Ok(summary)
    }

    /// Insert one event; failures are reported and counted, never propagated
    async fn publish(
        &self,
        calendar_id: &str,
        title: &str,
        description: &str,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
        summary: &mut RunSummary,
    ) {
        let event = NewEvent::new(title, description, start, end);
        match self.calendar.insert_event(calendar_id, &event).await {
            Ok(()) => {
                println!("Event created: {} on {}", title, start.date_naive());
                summary.created += 1;
            }
            Err(e) => {
                println!("Error creating event: {}", e);
                error!("Failed to insert '{}' on {}: {:?}", title, start.date_naive(), e);
                summary.failed += 1;
            }
        }
    }
}
