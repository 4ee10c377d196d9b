//! Selection configuration.

use crate::domain::FareRecord;

/// Configuration parameters for itinerary selection.
#[derive(Debug, Clone)]
pub struct SelectConfig {
    /// How many of the cheapest fares to keep per leg before pairing.
    pub fares_per_leg: usize,

    /// How many itineraries to keep per date pair.
    pub itineraries_per_pair: usize,

    /// Trains calling at more stops than this are ignored.
    pub max_stops: usize,
}

impl SelectConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(fares_per_leg: usize, itineraries_per_pair: usize, max_stops: usize) -> Self {
        Self {
            fares_per_leg,
            itineraries_per_pair,
            max_stops,
        }
    }

    /// Set the stop limit.
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops;
        self
    }

    /// Whether a fare passes the stop filter.
    pub fn accepts(&self, fare: &FareRecord) -> bool {
        fare.stops <= self.max_stops
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            fares_per_leg: 2,
            itineraries_per_pair: 2,
            max_stops: 8,
        }
    }
}
