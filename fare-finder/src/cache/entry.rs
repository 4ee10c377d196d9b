//! Cache keys and values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::FareRecord;

/// What a cache entry is for.
///
/// Keys render to the strings stored in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Fares for one date on one route direction, keyed by the route URL
    /// (which already encodes stations, direction and departure time).
    Fares { date: NaiveDate, url: String },

    /// Stop count for a calling-points page.
    Stops { url: String },
}

impl CacheKey {
    pub fn fares(date: NaiveDate, url: impl Into<String>) -> Self {
        Self::Fares {
            date,
            url: url.into(),
        }
    }

    pub fn stops(url: impl Into<String>) -> Self {
        Self::Stops { url: url.into() }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Fares { date, url } => write!(f, "{}_{url}", date.format("%Y-%m-%d")),
            CacheKey::Stops { url } => write!(f, "stops_{url}"),
        }
    }
}

/// A cached value. The `kind` field tags each variant on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheValue {
    Stops { count: usize },
    Fares { fares: Vec<FareRecord> },
}
