//! Text body shared by the sunrise and sunset events of a day.

use super::solar::{Observer, SolarDay};
use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

/// Placeholder for an instant that does not occur
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an instant as 24-hour `HH:MM`, or `N/A` when absent
pub fn format_time(instant: Option<&DateTime<Tz>>) -> String {
    instant
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format a duration as `{H}h {M}m`, seconds truncated
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    let hours = seconds.div_euclid(3600);
    let minutes = seconds.rem_euclid(3600) / 60;
    format!("{}h {}m", hours, minutes)
}

fn range(from: Option<&DateTime<Tz>>, to: Option<&DateTime<Tz>>) -> String {
    format!("{} - {}", format_time(from), format_time(to))
}

/// Render the description for an already computed day
pub fn describe(day: &SolarDay) -> String {
    let daylight = day
        .daylight()
        .map(format_duration)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let lines = [
        format!(
            "Astronomical Twilight: {}",
            range(day.astronomical_dawn.as_ref(), day.nautical_dawn.as_ref())
        ),
        format!(
            "Nautical Twilight: {}",
            range(day.nautical_dawn.as_ref(), day.civil_dawn.as_ref())
        ),
        format!(
            "Civil Twilight: {}",
            range(day.civil_dawn.as_ref(), day.sunrise.as_ref())
        ),
        format!("☀️ <b>Sunrise @ {}</b>", format_time(day.sunrise.as_ref())),
        format!(
            "Golden Hour: {}",
            range(day.golden_morning_start.as_ref(), day.golden_morning_end.as_ref())
        ),
        format!("Zenith: {}", format_time(Some(&day.noon))),
        format!(
            "Golden Hour: {}",
            range(day.golden_evening_start.as_ref(), day.golden_evening_end.as_ref())
        ),
        format!("🌅 <b>Sunset @ {}</b>", format_time(day.sunset.as_ref())),
        format!(
            "Civil Twilight: {}",
            range(day.sunset.as_ref(), day.civil_dusk.as_ref())
        ),
        format!(
            "Nautical Twilight: {}",
            range(day.civil_dusk.as_ref(), day.nautical_dusk.as_ref())
        ),
        format!(
            "Astronomical Twilight: {}",
            range(day.nautical_dusk.as_ref(), day.astronomical_dusk.as_ref())
        ),
        String::new(),
        format!("Length of daylight: {}", daylight),
    ];

    lines.join("\n")
}

/// Build the description for `observer` on `date` with times in `tz`
pub fn generate_description(observer: &Observer, date: NaiveDate, tz: &Tz) -> String {
    describe(&SolarDay::compute(observer, date, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration_truncates_seconds() {
        assert_eq!(format_duration(Duration::seconds(12 * 3600 + 7 * 60 + 59)), "12h 7m");
        assert_eq!(format_duration(Duration::seconds(59)), "0h 0m");
        assert_eq!(format_duration(Duration::hours(24)), "24h 0m");
    }

    #[test]
    fn test_format_time() {
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let dt = tz.with_ymd_and_hms(2024, 6, 21, 5, 46, 59).unwrap();
        assert_eq!(format_time(Some(&dt)), "05:46");
        assert_eq!(format_time(None), "N/A");
    }

    #[test]
    fn test_line_layout() {
        let obs = Observer::new(48.8566, 2.3522).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let tz: Tz = "Europe/Paris".parse().unwrap();

        let text = generate_description(&obs, date, &tz);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("Astronomical Twilight: "));
        assert!(lines[3].starts_with("☀️ <b>Sunrise @ "));
        assert!(lines[5].starts_with("Zenith: "));
        assert!(lines[7].starts_with("🌅 <b>Sunset @ "));
        assert_eq!(lines[11], "");
        assert!(lines[12].starts_with("Length of daylight: "));
    }

    #[test]
    fn test_daylight_matches_sunrise_and_sunset() {
        let obs = Observer::new(48.8566, 2.3522).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let day = SolarDay::compute(&obs, date, &tz);

        let seconds = (day.sunset.unwrap() - day.sunrise.unwrap()).num_seconds();
        let expected = format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60);
        assert!(describe(&day).ends_with(&format!("Length of daylight: {}", expected)));
    }

    #[test]
    fn test_civil_ranges_meet_sunrise_and_sunset() {
        let obs = Observer::new(40.4168, -3.7038).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        let day = SolarDay::compute(&obs, date, &tz);
        let text = describe(&day);
        let lines: Vec<&str> = text.lines().collect();

        let sunrise = format_time(day.sunrise.as_ref());
        let sunset = format_time(day.sunset.as_ref());
        assert!(lines[2].ends_with(&format!("- {}", sunrise)));
        assert!(lines[8].starts_with(&format!("Civil Twilight: {} - ", sunset)));
    }

    #[test]
    fn test_polar_day_renders_not_available() {
        let obs = Observer::new(69.6492, 18.9553).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let tz: Tz = "Europe/Oslo".parse().unwrap();

        let text = generate_description(&obs, date, &tz);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Astronomical Twilight: N/A - N/A");
        assert_eq!(lines[3], "☀️ <b>Sunrise @ N/A</b>");
        assert_eq!(lines[12], "Length of daylight: N/A");
    }

    #[test]
    fn test_description_is_deterministic() {
        let obs = Observer::new(-33.8688, 151.2093).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let tz: Tz = "Australia/Sydney".parse().unwrap();

        assert_eq!(
            generate_description(&obs, date, &tz),
            generate_description(&obs, date, &tz)
        );
    }
}
