//! One search run, from date window to ranked report.

use chrono::NaiveDate;
use tracing::info;

use crate::cache::{CacheError, FareCache};
use crate::cli::RunConfig;
use crate::domain::{DatePair, InvalidRange, end_of_month, enumerate};
use crate::report::Report;
use crate::selector::{SelectConfig, SelectError, select};
use crate::source::FareSource;
use crate::traintimes::{CachedFareSource, TrainTimesClient, TrainTimesError};

/// Errors that end a run without a report.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("could not open a session with traintimes.org.uk: {0}")]
    Connect(#[from] TrainTimesError),

    #[error(transparent)]
    Window(#[from] InvalidRange),

    #[error("no calendar month contains {0}")]
    Calendar(NaiveDate),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Candidate date pairs from `start` to the end of its month.
///
/// Days already past are skipped, so a window that started earlier this
/// month begins today, and one wholly in the past is empty.
pub fn window(start: NaiveDate, today: NaiveDate) -> Result<Vec<DatePair>, RunError> {
    let end = end_of_month(start).ok_or(RunError::Calendar(start))?;
    Ok(enumerate(start.max(today), end, today)?)
}

/// Select and rank itineraries for `pairs` from any fare source.
pub async fn find_fares<S: FareSource>(
    pairs: &[DatePair],
    source: &mut S,
    config: &SelectConfig,
) -> Result<Report, RunError> {
    let results = select(pairs, source, config).await?;
    Ok(Report::rank(results))
}

/// Run a search against traintimes.org.uk.
pub async fn run(config: &RunConfig, today: NaiveDate) -> Result<Report, RunError> {
    let pairs = window(config.start, today)?;
    info!(
        from = %config.route.from,
        to = %config.route.to,
        pairs = pairs.len(),
        "searching fares"
    );
    if pairs.is_empty() {
        return Ok(Report::default());
    }

    let cache = FareCache::load(&config.cache)?;
    let client = TrainTimesClient::connect(&config.traintimes).await?;
    let mut source = CachedFareSource::new(
        client,
        cache,
        config.route.clone(),
        config.traintimes.clone(),
    );

    find_fares(&pairs, &mut source, &config.select).await
}
