//! Fare records scraped for a single train.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Price;

/// Which leg of a round trip a fare is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From the home station to the destination.
    Outbound,
    /// From the destination back home.
    Return,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("Outbound"),
            Direction::Return => f.write_str("Return"),
        }
    }
}

/// Format used for the travel date in fare records, e.g. `June 03, 2025`.
pub const DATE_LABEL_FORMAT: &str = "%B %d, %Y";

/// Format a calendar date as a fare-record date label.
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// The cheapest single fare for one train on one day.
///
/// Equality and hashing cover every field, so two records compare equal only
/// if they describe the same train at the same price on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FareRecord {
    pub direction: Direction,

    pub cost: Price,

    /// Departure and arrival times as shown by the site, e.g. `10:30 → 12:45`.
    pub departure_arrival: String,

    /// Journey duration as shown by the site, e.g. `2h 15m`.
    pub travel_time: String,

    /// `travel_time` in minutes, used to break cost ties.
    pub travel_minutes: u32,

    /// Travel date. Persisted as its label (`June 03, 2025`).
    #[serde(with = "label")]
    pub date: NaiveDate,

    /// Number of calling points, 0 if unknown.
    pub stops: usize,
}

impl FareRecord {
    /// Returns the travel date as its display label.
    pub fn date_label(&self) -> String {
        date_label(self.date)
    }
}

impl fmt::Display for FareRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} - {}: {} - {} stops",
            self.direction,
            self.cost,
            self.date_label(),
            self.departure_arrival,
            self.travel_time,
            self.stops
        )
    }
}

mod label {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::DATE_LABEL_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_LABEL_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_LABEL_FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid date label {s:?}: {e}")))
    }
}
