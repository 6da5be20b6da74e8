use crate::error::{Error, SunResult};
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

/// Offline coordinate to IANA timezone lookup
pub struct TimezoneResolver {
    finder: DefaultFinder,
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver {
    /// Loads the bundled timezone polygons; do this once per run
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }

    /// IANA name for the coordinates
    pub fn timezone_name(&self, latitude: f64, longitude: f64) -> SunResult<String> {
        // tzf-rs takes (longitude, latitude)
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() {
            return Err(Error::Timezone(format!(
                "No timezone found at {:.4}, {:.4}",
                latitude, longitude
            )));
        }
        Ok(name.to_string())
    }

    /// Timezone for the coordinates
    pub fn resolve(&self, latitude: f64, longitude: f64) -> SunResult<Tz> {
        let name = self.timezone_name(latitude, longitude)?;
        name.parse::<Tz>()
            .map_err(|e| Error::Timezone(format!("Unknown timezone '{}': {}", name, e)))
    }
}
