//! Journey durations as printed by the fare site.
//!
//! The site shows durations like `"2h 3m"`. We keep the text as shown for
//! display and the minute count for ranking.

use std::fmt;

/// Error returned when parsing an invalid duration string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid journey time: {reason}")]
pub struct DurationError {
    reason: &'static str,
}

impl DurationError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A parsed journey duration.
///
/// # Examples
///
/// ```
/// use fare_finder::domain::JourneyTime;
///
/// let time = JourneyTime::parse("2h 3m").unwrap();
/// assert_eq!(time.minutes(), 123);
/// assert_eq!(time.as_str(), "2h 3m");
///
/// assert!(JourneyTime::parse("2 hours").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JourneyTime {
    text: String,
    minutes: u32,
}

impl JourneyTime {
    /// Parse `"<h>h <m>m"`, `"<h>h"` or `"<m>m"`.
    pub fn parse(s: &str) -> Result<Self, DurationError> {
        let text = s.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Err(DurationError::new("empty"));
        }

        let mut hours: Option<u32> = None;
        let mut minutes: Option<u32> = None;

        for part in text.split(' ') {
            if let Some(h) = part.strip_suffix('h') {
                if hours.is_some() || minutes.is_some() {
                    return Err(DurationError::new("hours must come first, once"));
                }
                hours = Some(parse_number(h).ok_or_else(|| DurationError::new("invalid hours"))?);
            } else if let Some(m) = part.strip_suffix('m') {
                if minutes.is_some() {
                    return Err(DurationError::new("minutes given twice"));
                }
                let m = parse_number(m).ok_or_else(|| DurationError::new("invalid minutes"))?;
                if m > 59 && hours.is_some() {
                    return Err(DurationError::new("minutes must be 0-59"));
                }
                minutes = Some(m);
            } else {
                return Err(DurationError::new("expected <h>h and/or <m>m"));
            }
        }

        let total = hours
            .unwrap_or(0)
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes.unwrap_or(0)))
            .ok_or_else(|| DurationError::new("duration out of range"))?;

        Ok(Self {
            text,
            minutes: total,
        })
    }

    /// Returns the duration as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the total number of minutes.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for JourneyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
