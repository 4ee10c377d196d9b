//! The fare-source boundary.
//!
//! The selector only needs one operation from the outside world: the fares
//! for a given date and direction. Keeping that behind a trait lets the
//! selection logic be tested with canned fares.

use chrono::NaiveDate;

use crate::cache::CacheError;
use crate::domain::{Direction, FareRecord};

/// Errors from fetching fares.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// The site has not published prices for this date yet.
    ///
    /// Dates are visited in order, so every later date will fail the same way.
    #[error("{date} is too far in advance, there are no prices yet")]
    TooFarInAdvance { date: NaiveDate },

    /// Network or markup failure for one date and direction.
    #[error("failed to fetch {direction} fares for {date}: {message}")]
    Fetch {
        date: NaiveDate,
        direction: Direction,
        message: String,
    },

    /// Fares were fetched but could not be saved to the cache.
    #[error(transparent)]
    Persistence(#[from] CacheError),
}

impl FareError {
    pub fn fetch(date: NaiveDate, direction: Direction, err: impl std::fmt::Display) -> Self {
        FareError::Fetch {
            date,
            direction,
            message: err.to_string(),
        }
    }
}

/// Trait for providing fares.
///
/// An empty list means the site has no trains for that date. That is a
/// different outcome from [`FareError::TooFarInAdvance`].
#[allow(async_fn_in_trait)]
pub trait FareSource {
    /// Get all fares for `direction` on `date`.
    async fn fetch_fares(
        &mut self,
        date: NaiveDate,
        direction: Direction,
    ) -> Result<Vec<FareRecord>, FareError>;
}
