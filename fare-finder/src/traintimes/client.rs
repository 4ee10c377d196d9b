//! traintimes.org.uk HTTP client.
//!
//! The site wants a browser-like session: a cookie from the front page, then
//! results pages requested with `POST`. Calling-point pages are plain `GET`s.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::domain::{Direction, Route};

use super::error::TrainTimesError;

/// Default base URL for the site.
const DEFAULT_BASE_URL: &str = "https://traintimes.org.uk";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Configuration for the traintimes client.
#[derive(Debug, Clone)]
pub struct TrainTimesConfig {
    /// Base URL for the site (defaults to production)
    pub base_url: String,
    /// Departure-time slug for outbound searches
    pub outbound_time: String,
    /// Departure-time slug for return searches
    pub return_time: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Skip trains that need a change
    pub direct_only: bool,
    /// Unpriced trains calling at more stops than this are ignored rather
    /// than read as the end of the booking horizon
    pub max_stops: usize,
}

impl Default for TrainTimesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            outbound_time: "10:30a".to_string(),
            return_time: "22:00a".to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            direct_only: true,
            max_stops: 8,
        }
    }
}

impl TrainTimesConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Include trains that need a change.
    pub fn with_direct_only(mut self, direct_only: bool) -> Self {
        self.direct_only = direct_only;
        self
    }

    /// Set the stop limit used when deciding whether an unpriced train
    /// marks the booking horizon.
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops;
        self
    }

    /// Search URL for one direction of `route`, without a date.
    ///
    /// This string also identifies the route in cache keys.
    pub fn route_url(&self, route: &Route, direction: Direction) -> String {
        let base = self.base_url.trim_end_matches('/');
        match direction {
            Direction::Outbound => {
                format!("{base}/{}/{}/{}", route.from, route.to, self.outbound_time)
            }
            Direction::Return => {
                format!("{base}/{}/{}/{}", route.to, route.from, self.return_time)
            }
        }
    }

    /// Resolve a link found in a page against the base URL.
    pub fn resolve(&self, href: &str) -> Result<String, TrainTimesError> {
        let invalid = |message: String| TrainTimesError::InvalidUrl {
            href: href.to_string(),
            message,
        };
        let base = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        let url = base.join(href).map_err(|e| invalid(e.to_string()))?;
        Ok(url.into())
    }
}

/// Trait for fetching pages from the site.
///
/// This abstraction allows fare extraction to be tested with canned pages.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch a search results page.
    async fn results_page(&self, url: &str) -> Result<String, TrainTimesError>;

    /// Fetch a calling-points page.
    async fn calling_points_page(&self, url: &str) -> Result<String, TrainTimesError>;
}

/// traintimes.org.uk client.
///
/// Holds a cookie store so the session cookie from [`connect`](Self::connect)
/// is sent with every later request.
#[derive(Debug, Clone)]
pub struct TrainTimesClient {
    http: reqwest::Client,
}

impl TrainTimesClient {
    /// Create a client and open a session with the site.
    pub async fn connect(config: &TrainTimesConfig) -> Result<Self, TrainTimesError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("dnt", HeaderValue::from_static("1"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        if let Ok(referer) = HeaderValue::from_str(&format!(
            "{}/",
            config.base_url.trim_end_matches('/')
        )) {
            headers.insert(REFERER, referer);
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Without the session cookie the site answers 418.
        let response = http.get(&config.base_url).send().await?;
        debug!(status = %response.status(), "opened session");

        Ok(Self { http })
    }
}

impl PageFetcher for TrainTimesClient {
    async fn results_page(&self, url: &str) -> Result<String, TrainTimesError> {
        debug!(url, "POST results page");
        let response = self.http.post(url).send().await?;

        // Searches for dates beyond the fare horizon come back as 422 with
        // the explanation in the page.
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::UNPROCESSABLE_ENTITY {
            return Err(TrainTimesError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    async fn calling_points_page(&self, url: &str) -> Result<String, TrainTimesError> {
        debug!(url, "GET calling points");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrainTimesError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
