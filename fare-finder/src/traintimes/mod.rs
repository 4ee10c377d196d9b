//! traintimes.org.uk fare source.
//!
//! This module fetches fare pages from traintimes.org.uk and turns them into
//! [`FareRecord`](crate::domain::FareRecord)s.
//!
//! Key characteristics of the site:
//! - Searches are addressed by URL: `/{from}/{to}/{time}/{YYYY-MM-DD}`
//! - Results pages must be requested with `POST` inside a cookie session
//! - Dates beyond the fare horizon show an error message instead of results
//! - Each result links to a separate calling-points page

mod client;
mod error;
mod fetcher;
pub mod markup;

pub use client::{PageFetcher, TrainTimesClient, TrainTimesConfig};
pub use error::TrainTimesError;
pub use fetcher::CachedFareSource;
