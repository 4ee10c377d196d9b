//! Cheapest rail fare finder.
//!
//! Searches traintimes.org.uk for the cheapest same-day return trips on
//! every Tuesday and Wednesday of a month, plus Tuesday-to-Wednesday
//! overnight stays, caching every page it reads.

pub mod cache;
pub mod cli;
pub mod domain;
pub mod report;
pub mod run;
pub mod selector;
pub mod source;
pub mod traintimes;
