//! Round-trip itineraries and the per-run result set.

use super::{FareRecord, Price};

/// An outbound fare paired with a return fare.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Itinerary {
    pub outbound: FareRecord,
    pub inbound: FareRecord,
}

impl Itinerary {
    pub fn new(outbound: FareRecord, inbound: FareRecord) -> Self {
        Self { outbound, inbound }
    }

    /// Combined price of both legs.
    pub fn total_cost(&self) -> Price {
        self.outbound.cost + self.inbound.cost
    }
}

/// Itineraries selected during one run, by category.
///
/// Filled once by the selector; later stages only sort, filter and truncate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub same_day_tuesday: Vec<Itinerary>,
    pub same_day_wednesday: Vec<Itinerary>,
    pub overnight: Vec<Itinerary>,
}

impl ResultSet {
    /// True if no category holds any itinerary.
    pub fn is_empty(&self) -> bool {
        self.same_day_tuesday.is_empty()
            && self.same_day_wednesday.is_empty()
            && self.overnight.is_empty()
    }
}
