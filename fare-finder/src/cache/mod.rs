//! Durable cache for scraped fare data.
//!
//! Fetching a results page is slow and the site rate-limits aggressive
//! clients, so every successful fetch is stored in a single JSON file and
//! reused on later runs. Entries never expire: a fare observed for a date is
//! assumed to hold for the rest of that date's booking window.
//!
//! Every write is flushed immediately with a read-merge-write cycle:
//! the current file is read, this process's entries are laid over it, and
//! the result replaces the file through an atomic rename. Two processes
//! writing different keys therefore never lose each other's entries; for the
//! same key the last writer wins.

mod config;
mod entry;
mod error;
mod store;

pub use config::CacheConfig;
pub use entry::{CacheKey, CacheValue};
pub use error::CacheError;
pub use store::FareCache;
