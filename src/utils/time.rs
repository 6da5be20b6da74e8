use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Formats tried for a date token, in order. Numeric dates are read
/// month first; day first only when the leading number cannot be a month.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%b-%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%b-%d-%Y",
    "%d-%B-%Y",
    "%B-%d-%Y",
];

/// Formats that carry a time of day; only the date part is kept
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse a date written in any of the common hyphenated forms
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let token = token.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// `days` consecutive dates starting at `start`
pub fn date_range(start: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days).map_while(move |offset| start.checked_add_signed(Duration::days(offset as i64)))
}
