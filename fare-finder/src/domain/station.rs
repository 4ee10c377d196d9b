//! Station slugs and routes.

use std::fmt;

/// Error returned when parsing an invalid station slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

/// A station as it appears in fare-site URLs.
///
/// Slugs are lowercase words joined by `+` (e.g. `warrington+bank+quay`).
/// Parsing accepts spaces in place of `+` and any letter case, so a user
/// can type either form on the command line.
///
/// # Examples
///
/// ```
/// use fare_finder::domain::Station;
///
/// let station = Station::parse("London Euston").unwrap();
/// assert_eq!(station.as_str(), "london+euston");
///
/// assert!(Station::parse("").is_err());
/// assert!(Station::parse("euston/../admin").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Station(String);

impl Station {
    /// Parse a station slug from user input.
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let slug = s
            .split(|c: char| c == '+' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("+");

        if slug.is_empty() {
            return Err(InvalidStation {
                reason: "must not be empty",
            });
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '\''))
        {
            return Err(InvalidStation {
                reason: "must contain only letters, digits, spaces, '+', '-' or '''",
            });
        }

        Ok(Self(slug))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.0)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed pair of stations a run searches between.
///
/// Outbound trips go `from → to`; return trips go `to → from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub from: Station,
    pub to: Station,
}

impl Route {
    pub fn new(from: Station, to: Station) -> Self {
        Self { from, to }
    }
}

impl Default for Route {
    fn default() -> Self {
        Self {
            from: Station("warrington+bank+quay".to_string()),
            to: Station("london+euston".to_string()),
        }
    }
}
