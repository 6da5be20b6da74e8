// Export components
pub mod description;
pub mod geocoder;
pub mod google_calendar;
pub mod solar;
pub mod timezone;

pub use geocoder::{Geocode, Location, NominatimGeocoder};
pub use google_calendar::{CalendarApi, GoogleCalendarClient};
pub use timezone::TimezoneResolver;
