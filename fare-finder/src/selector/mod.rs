//! Itinerary selection.
//!
//! Turns date pairs into priced itineraries in two passes. The first pass
//! fetches fares for each same-day pair and keeps the cheapest combinations.
//! The second pass builds overnight stays purely from the same-day winners,
//! so it never fetches.

mod config;
mod rank;
mod select;

pub use config::SelectConfig;
pub use rank::{best_fares, best_itineraries, combine, rank_fares, rank_itineraries};
pub use select::{SelectError, select};
