//! Command line parsing.
//!
//! The first positional is the location, everything after it is classified
//! as a start date or a day count.

use crate::config::Config;
use crate::error::{Error, SunResult};
use crate::utils::time::parse_date_token;
use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use tracing::{debug, warn};

/// Printed, line by line, when the location argument is missing or malformed
pub const USAGE: [&str; 2] = [
    "Usage Error: Please provide location in 'City, Country' format.",
    "Example: suncal 'Paris, France' [start_date] [num_days]",
];

/// Raw command line
#[derive(Debug, Parser)]
#[command(
    name = "suncal",
    version,
    about = "Publish sunrise and sunset windows to Google Calendar"
)]
pub struct Cli {
    /// Location in "City, Country" form
    pub location: Option<String>,

    /// Optional start date (e.g. 2024-06-21) and day count (e.g. 30), in any order
    #[arg(allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Validated run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub location: String,
    pub start_date: NaiveDate,
    pub num_days: u32,
    /// Date-like tokens that could not be parsed
    pub ignored: Vec<String>,
}

fn usage_error() -> Error {
    Error::Usage(USAGE.join("\n"))
}

impl Cli {
    /// Parse `argv`. Help and version requests print and exit as usual; any
    /// other rejection becomes a usage error.
    pub fn from_argv<I, T>(argv: I) -> SunResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(argv) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                debug!("Command line rejected: {:?}", e.kind());
                Err(usage_error())
            }
        }
    }

    /// The location, if it has the "City, Country" shape
    pub fn location(&self) -> SunResult<&str> {
        match self.location.as_deref() {
            Some(location) if location.contains(',') => Ok(location),
            _ => Err(usage_error()),
        }
    }

    /// Check the location, then load configuration and build the request.
    /// `load_config` is not called for a malformed location.
    pub fn into_request<F>(self, today: NaiveDate, load_config: F) -> SunResult<(Config, RunArgs)>
    where
        F: FnOnce() -> SunResult<Config>,
    {
        self.location()?;
        let config = load_config()?;
        let args = self.into_run_args(today, config.default_days)?;
        Ok((config, args))
    }

    /// Classify positional tokens into a run request.
    ///
    /// Tokens containing `-` are date candidates and all-digit tokens are day
    /// counts; later matches of either kind replace earlier ones.
    pub fn into_run_args(self, today: NaiveDate, default_days: u32) -> SunResult<RunArgs> {
        let location = match self.location {
            Some(location) if location.contains(',') => location,
            _ => return Err(usage_error()),
        };

        let mut start_date = today;
        let mut num_days = default_days;
        let mut ignored = Vec::new();

        for token in self.rest {
            if token.contains('-') {
                match parse_date_token(&token) {
                    Some(date) => start_date = date,
                    None => {
                        warn!("Ignoring unparseable date argument '{}'", token);
                        ignored.push(token);
                    }
                }
            } else if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
                match token.parse::<u32>() {
                    Ok(days) => num_days = days,
                    Err(_) => {
                        warn!("Ignoring out-of-range day count '{}'", token);
                        ignored.push(token);
                    }
                }
            }
        }

        Ok(RunArgs {
            location,
            start_date,
            num_days,
            ignored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn parse(args: &[&str]) -> SunResult<RunArgs> {
        let argv = std::iter::once("suncal").chain(args.iter().copied());
        Cli::try_parse_from(argv)
            .expect("clap accepts any positional tokens")
            .into_run_args(today(), 365)
    }

    #[test]
    fn test_missing_location_is_usage_error() {
        assert!(matches!(parse(&[]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["Paris"]), Err(Error::Usage(_))));
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["Paris, France"]).unwrap();
        assert_eq!(args.location, "Paris, France");
        assert_eq!(args.start_date, today());
        assert_eq!(args.num_days, 365);
    }

    #[test]
    fn test_date_and_count_in_any_order() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();

        let args = parse(&["Paris, France", "2024-06-21", "2"]).unwrap();
        assert_eq!((args.start_date, args.num_days), (expected, 2));

        let args = parse(&["Paris, France", "2", "2024-06-21"]).unwrap();
        assert_eq!((args.start_date, args.num_days), (expected, 2));
    }

    #[test]
    fn test_later_tokens_win() {
        let args = parse(&["Oslo, Norway", "2024-01-01", "10", "2024-02-01", "20"]).unwrap();
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(args.num_days, 20);
    }

    #[test]
    fn test_bad_date_keeps_default_and_is_reported() {
        let args = parse(&["Paris, France", "tomorrow-ish", "7"]).unwrap();
        assert_eq!(args.start_date, today());
        assert_eq!(args.num_days, 7);
        assert_eq!(args.ignored, vec!["tomorrow-ish".to_string()]);
    }

    #[test]
    fn test_other_tokens_are_ignored() {
        let args = parse(&["Paris, France", "soon", "12abc"]).unwrap();
        assert_eq!(args.num_days, 365);
        assert!(args.ignored.is_empty());
    }

    #[test]
    fn test_unknown_flags_are_usage_errors() {
        let argv = ["suncal", "--foo"];
        assert!(matches!(Cli::from_argv(argv), Err(Error::Usage(_))));

        let argv = ["suncal", "Paris, France", "2024-06-21"];
        assert!(Cli::from_argv(argv).is_ok());
    }

    #[test]
    fn test_location_checked_before_config() {
        let loaded = std::cell::Cell::new(false);
        let failing_load = || -> SunResult<Config> {
            loaded.set(true);
            Err(Error::Environment("Invalid SUNCAL_DEFAULT_DAYS: abc".to_string()))
        };

        let cli = Cli::from_argv(["suncal", "Paris"]).unwrap();
        assert!(matches!(cli.into_request(today(), failing_load), Err(Error::Usage(_))));
        assert!(!loaded.get());

        let cli = Cli::from_argv(["suncal", "Paris, France"]).unwrap();
        assert!(matches!(cli.into_request(today(), failing_load), Err(Error::Environment(_))));
        assert!(loaded.get());
    }

    #[test]
    fn test_config_default_days_applies() {
        let load = || -> SunResult<Config> {
            Ok(Config {
                default_days: 30,
                ..Config::default()
            })
        };
        let cli = Cli::from_argv(["suncal", "Paris, France"]).unwrap();
        let (_, args) = cli.into_request(today(), load).unwrap();
        assert_eq!(args.num_days, 30);
    }

    #[test]
    fn test_usage_message_has_two_lines() {
        match parse(&[]) {
            Err(Error::Usage(message)) => assert_eq!(message.lines().count(), 2),
            other => panic!("expected usage error, got {:?}", other),
        }
    }
}
