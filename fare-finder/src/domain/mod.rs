//! Domain types for the fare finder.
//!
//! These types are validated at construction, so code that receives them can
//! trust their invariants: station slugs are URL-safe, prices are exact,
//! date pairs are either same-day or Tuesday→Wednesday.

mod dates;
mod fare;
mod itinerary;
mod journey_time;
mod price;
mod station;

pub use dates::{DatePair, InvalidRange, end_of_month, enumerate};
pub use fare::{DATE_LABEL_FORMAT, Direction, FareRecord, date_label};
pub use itinerary::{Itinerary, ResultSet};
pub use journey_time::{DurationError, JourneyTime};
pub use price::{Price, PriceError};
pub use station::{InvalidStation, Route, Station};
