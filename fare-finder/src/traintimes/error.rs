//! traintimes.org.uk client error types.

use std::fmt;

/// Errors from talking to traintimes.org.uk.
#[derive(Debug)]
pub enum TrainTimesError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// The site answered with a status that carries no page.
    Status { status: u16, url: String },

    /// A link in a page could not be resolved against the base URL.
    InvalidUrl { href: String, message: String },
}

impl fmt::Display for TrainTimesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainTimesError::Http(e) => write!(f, "HTTP error: {e}"),
            TrainTimesError::Status { status, url } => {
                write!(f, "unexpected status {status} from {url}")
            }
            TrainTimesError::InvalidUrl { href, message } => {
                write!(f, "invalid link {href:?}: {message}")
            }
        }
    }
}

impl std::error::Error for TrainTimesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainTimesError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TrainTimesError {
    fn from(err: reqwest::Error) -> Self {
        TrainTimesError::Http(err)
    }
}
