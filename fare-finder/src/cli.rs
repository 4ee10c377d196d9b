//! Command-line interface parsing.
//!
//! Arguments are parsed with clap and then turned into a [`RunConfig`],
//! which carries the typed configuration for every layer of a run.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::domain::{InvalidStation, Route, Station};
use crate::selector::SelectConfig;
use crate::traintimes::TrainTimesConfig;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// `--month` or `--year` was not given
    #[error("--month and --year are required")]
    MissingDate,

    /// The day does not exist in the given month
    #[error("{year}-{month:02}-{day:02} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),
}

/// Find the cheapest Tuesday and Wednesday rail fares in a month, including
/// Tuesday-to-Wednesday overnight stays
#[derive(Parser, Debug)]
#[command(name = "fare-finder")]
#[command(version)]
#[command(after_help = "Example: fare-finder --month 6 --year 2025 --station-from \"manchester piccadilly\"")]
pub struct Cli {
    /// Starting month (1-12)
    #[arg(long, value_name = "MONTH", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Starting year
    #[arg(long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// Day of the month to start from; the search still runs to the end of
    /// the month
    #[arg(long, value_name = "DAY", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: u32,

    /// Starting station, words joined by '+' or spaces
    #[arg(long, alias = "station_from", value_name = "STATION", default_value = "warrington+bank+quay")]
    pub station_from: String,

    /// Destination station, words joined by '+' or spaces
    #[arg(long, alias = "station_to", value_name = "STATION", default_value = "london+euston")]
    pub station_to: String,

    /// Ignore trains calling at more stops than this
    #[arg(long, alias = "max_stops", value_name = "STOPS", default_value_t = 8)]
    pub max_stops: usize,

    /// Include trains that need a change
    #[arg(long)]
    pub allow_changes: bool,

    /// Disable the fare cache file for this run
    #[arg(long)]
    pub nocache: bool,

    /// Fare cache file
    #[arg(long, value_name = "PATH", default_value = "train_prices_cache.json")]
    pub cache_file: PathBuf,

    /// Verbose output, with a hash after every fare
    #[arg(long, alias = "debug_trips")]
    pub debug_trips: bool,
}

/// Everything a run needs, derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// First day of the search window; the window ends with its month.
    pub start: NaiveDate,
    pub route: Route,
    pub select: SelectConfig,
    pub cache: CacheConfig,
    pub traintimes: TrainTimesConfig,
    pub debug_trips: bool,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Errors
    /// * `CliError::MissingDate` if month or year is absent
    /// * `CliError::InvalidDate` if the day is past the end of the month
    /// * `CliError::InvalidStation` for an unusable station name
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let (Some(month), Some(year)) = (cli.month, cli.year) else {
            return Err(CliError::MissingDate);
        };
        let start = NaiveDate::from_ymd_opt(year, month, cli.day).ok_or(CliError::InvalidDate {
            year,
            month,
            day: cli.day,
        })?;

        let route = Route::new(
            Station::parse(&cli.station_from)?,
            Station::parse(&cli.station_to)?,
        );

        Ok(Self {
            start,
            route,
            select: SelectConfig::default().with_max_stops(cli.max_stops),
            cache: CacheConfig::new(&cli.cache_file).with_enabled(!cli.nocache),
            traintimes: TrainTimesConfig::default()
                .with_direct_only(!cli.allow_changes)
                .with_max_stops(cli.max_stops),
            debug_trips: cli.debug_trips,
        })
    }
}
