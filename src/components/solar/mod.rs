//! Sunrise, sunset, noon and twilight boundaries for an observer.
//!
//! The astronomy comes from the NREL SPA implementation in `solar_positioning`.
//! Boundaries that do not occur on a date (polar day or night) come back as
//! `None`. Nothing in this module panics on valid coordinates.

use crate::error::{Error, SunResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use solar_positioning::time::DeltaT;
use solar_positioning::{spa, Horizon, SunriseResult};
use tracing::debug;

/// Depression of the sun below the horizon bounding civil twilight
pub const CIVIL: f64 = 6.0;
/// Depression bounding nautical twilight
pub const NAUTICAL: f64 = 12.0;
/// Depression bounding astronomical twilight
pub const ASTRONOMICAL: f64 = 18.0;
/// Golden hour edge below the horizon (elevation -4)
pub const GOLDEN_LOW: f64 = 4.0;
/// Golden hour edge above the horizon (elevation +6)
pub const GOLDEN_HIGH: f64 = -6.0;

// TT - UT1 in seconds, used when no estimate exists for the year
const FALLBACK_DELTA_T: f64 = 69.0;

/// A point on the ground at sea level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

impl Observer {
    /// Create an observer, rejecting coordinates outside the globe
    pub fn new(latitude: f64, longitude: f64) -> SunResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::Geocoding(format!(
                "Invalid latitude: {}. Must be between -90 and 90 degrees",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::Geocoding(format!(
                "Invalid longitude: {}. Must be between -180 and 180 degrees",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Which side of solar noon a boundary lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Morning crossing, sun rising
    Dawn,
    /// Evening crossing, sun setting
    Dusk,
}

impl Boundary {
    /// Instant at which the sun crosses `depression` degrees below the horizon
    pub fn at(
        self,
        observer: &Observer,
        date: NaiveDate,
        depression: f64,
        tz: &Tz,
    ) -> Option<DateTime<Tz>> {
        match self {
            Boundary::Dawn => dawn(observer, date, depression, tz),
            Boundary::Dusk => dusk(observer, date, depression, tz),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn delta_t(date: NaiveDate) -> f64 {
    DeltaT::estimate_from_date(date.year(), date.month()).unwrap_or(FALLBACK_DELTA_T)
}

/// Crossing of `horizon` on the UTC day `date`, `None` on polar days and nights
fn crossing(
    observer: &Observer,
    date: NaiveDate,
    horizon: Horizon,
    boundary: Boundary,
) -> Option<DateTime<Utc>> {
    let result = spa::sunrise_sunset_for_horizon(
        midnight_utc(date),
        observer.latitude,
        observer.longitude,
        delta_t(date),
        horizon,
    );

    match result {
        Ok(SunriseResult::RegularDay {
            sunrise, sunset, ..
        }) => Some(match boundary {
            Boundary::Dawn => sunrise,
            Boundary::Dusk => sunset,
        }),
        Ok(SunriseResult::AllDay { .. }) | Ok(SunriseResult::AllNight { .. }) => None,
        Err(e) => {
            debug!("No {:?} crossing on {}: {}", boundary, date, e);
            None
        }
    }
}

/// Solar transit on the UTC day `date`; every variant carries one
fn transit(observer: &Observer, date: NaiveDate) -> Option<DateTime<Utc>> {
    let result = spa::sunrise_sunset_for_horizon(
        midnight_utc(date),
        observer.latitude,
        observer.longitude,
        delta_t(date),
        Horizon::SunriseSunset,
    )
    .ok()?;

    match result {
        SunriseResult::RegularDay { transit, .. }
        | SunriseResult::AllDay { transit }
        | SunriseResult::AllNight { transit } => Some(transit),
    }
}

/// First instant computed for `date` or a neighbouring day that lands on
/// `date` in `tz` and passes `accept`. `None` when no candidate does.
fn on_local_date<F, A>(date: NaiveDate, tz: &Tz, compute: F, accept: A) -> Option<DateTime<Tz>>
where
    F: Fn(NaiveDate) -> Option<DateTime<Utc>>,
    A: Fn(&DateTime<Tz>) -> bool,
{
    [Some(date), date.pred_opt(), date.succ_opt()]
        .into_iter()
        .flatten()
        .filter_map(compute)
        .map(|t| t.with_timezone(tz))
        .find(|t| t.date_naive() == date && accept(t))
}

/// Morning crossings come before the date's solar noon and evening ones after
fn crossing_on_date(
    observer: &Observer,
    date: NaiveDate,
    horizon: Horizon,
    boundary: Boundary,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    let noon = noon(observer, date, tz);
    on_local_date(
        date,
        tz,
        |day| crossing(observer, day, horizon, boundary),
        |t| match boundary {
            Boundary::Dawn => *t < noon,
            Boundary::Dusk => *t > noon,
        },
    )
}

/// Sunrise: upper limb on the horizon, refraction included
pub fn sunrise(observer: &Observer, date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    crossing_on_date(observer, date, Horizon::SunriseSunset, Boundary::Dawn, tz)
}

/// Sunset: upper limb on the horizon, refraction included
pub fn sunset(observer: &Observer, date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    crossing_on_date(observer, date, Horizon::SunriseSunset, Boundary::Dusk, tz)
}

/// Morning crossing of the given depression
pub fn dawn(observer: &Observer, date: NaiveDate, depression: f64, tz: &Tz) -> Option<DateTime<Tz>> {
    crossing_on_date(observer, date, Horizon::Custom(-depression), Boundary::Dawn, tz)
}

/// Evening crossing of the given depression
pub fn dusk(observer: &Observer, date: NaiveDate, depression: f64, tz: &Tz) -> Option<DateTime<Tz>> {
    crossing_on_date(observer, date, Horizon::Custom(-depression), Boundary::Dusk, tz)
}

/// Solar noon, which exists on every date
pub fn noon(observer: &Observer, date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    on_local_date(date, tz, |day| transit(observer, day), |_| true)
        .or_else(|| transit(observer, date).map(|t| t.with_timezone(tz)))
        // Mean solar noon for the longitude
        .unwrap_or_else(|| {
            let offset = Duration::seconds((43_200.0 - observer.longitude * 240.0) as i64);
            (midnight_utc(date) + offset).with_timezone(tz)
        })
}

/// Boundary in `tz`, or `None` when it does not occur on `date`.
///
/// Never panics: polar days and nights simply have no crossing.
pub fn safe_solar_time(
    boundary: Boundary,
    observer: &Observer,
    date: NaiveDate,
    depression: f64,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    boundary.at(observer, date, depression, tz)
}

/// Every named instant of one calendar date, in the target timezone
#[derive(Debug, Clone, PartialEq)]
pub struct SolarDay {
    pub date: NaiveDate,
    pub astronomical_dawn: Option<DateTime<Tz>>,
    pub nautical_dawn: Option<DateTime<Tz>>,
    pub civil_dawn: Option<DateTime<Tz>>,
    pub sunrise: Option<DateTime<Tz>>,
    pub golden_morning_start: Option<DateTime<Tz>>,
    pub golden_morning_end: Option<DateTime<Tz>>,
    pub noon: DateTime<Tz>,
    pub golden_evening_start: Option<DateTime<Tz>>,
    pub golden_evening_end: Option<DateTime<Tz>>,
    pub sunset: Option<DateTime<Tz>>,
    pub civil_dusk: Option<DateTime<Tz>>,
    pub nautical_dusk: Option<DateTime<Tz>>,
    pub astronomical_dusk: Option<DateTime<Tz>>,
}

impl SolarDay {
    pub fn compute(observer: &Observer, date: NaiveDate, tz: &Tz) -> Self {
        let at = |boundary: Boundary, depression: f64| {
            safe_solar_time(boundary, observer, date, depression, tz)
        };

        Self {
            date,
            astronomical_dawn: at(Boundary::Dawn, ASTRONOMICAL),
            nautical_dawn: at(Boundary::Dawn, NAUTICAL),
            civil_dawn: at(Boundary::Dawn, CIVIL),
            sunrise: sunrise(observer, date, tz),
            golden_morning_start: at(Boundary::Dawn, GOLDEN_LOW),
            golden_morning_end: at(Boundary::Dawn, GOLDEN_HIGH),
            noon: noon(observer, date, tz),
            golden_evening_start: at(Boundary::Dusk, GOLDEN_HIGH),
            golden_evening_end: at(Boundary::Dusk, GOLDEN_LOW),
            sunset: sunset(observer, date, tz),
            civil_dusk: at(Boundary::Dusk, CIVIL),
            nautical_dusk: at(Boundary::Dusk, NAUTICAL),
            astronomical_dusk: at(Boundary::Dusk, ASTRONOMICAL),
        }
    }

    /// Time between sunrise and sunset, if both happen
    pub fn daylight(&self) -> Option<Duration> {
        match (self.sunrise, self.sunset) {
            (Some(rise), Some(set)) => Some(set.signed_duration_since(rise)),
            _ => None,
        }
    }
}
