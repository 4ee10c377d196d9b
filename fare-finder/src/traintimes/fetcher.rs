//! Fare source backed by traintimes.org.uk and the fare cache.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheValue, FareCache};
use crate::domain::{Direction, FareRecord, Route};
use crate::source::{FareError, FareSource};

use super::client::{PageFetcher, TrainTimesConfig};
use super::markup;

/// Fetches fares from the site, at most once per date and direction.
///
/// Every fetched fare list and every stop count is written to the cache
/// before the next request is made.
pub struct CachedFareSource<P> {
    pages: P,
    cache: FareCache,
    route: Route,
    config: TrainTimesConfig,
}

impl<P: PageFetcher> CachedFareSource<P> {
    pub fn new(pages: P, cache: FareCache, route: Route, config: TrainTimesConfig) -> Self {
        Self {
            pages,
            cache,
            route,
            config,
        }
    }

    pub fn cache(&self) -> &FareCache {
        &self.cache
    }

    /// Fares listed on one results page.
    async fn page_fares(
        &mut self,
        html: &str,
        date: NaiveDate,
        direction: Direction,
    ) -> Result<Vec<FareRecord>, FareError> {
        if markup::has_warning(html) {
            debug!(%date, %direction, "no trains listed");
            return Ok(Vec::new());
        }

        let mut fares = Vec::new();
        for row in markup::result_rows(html) {
            debug!(%date, %direction, "result row: {}", row.block);
            if row.has_changes && self.config.direct_only {
                continue;
            }

            let stops = match &row.calling_points {
                Some(href) => self.count_stops(href).await?,
                None => 0,
            };

            // Priced trains over the limit are kept; the selector filters them.
            let Some(cost) = row.price else {
                if stops > self.config.max_stops {
                    debug!(%date, train = %row.departure_arrival, stops, "unpriced train over stop limit");
                    continue;
                }
                return Err(FareError::TooFarInAdvance { date });
            };

            let (travel_time, travel_minutes) = match &row.journey_time {
                Some(time) => (time.as_str().to_string(), time.minutes()),
                None => {
                    warn!(%date, train = %row.departure_arrival, "journey time not found");
                    (String::new(), 0)
                }
            };

            let fare = FareRecord {
                direction,
                cost,
                departure_arrival: row.departure_arrival,
                travel_time,
                travel_minutes,
                date,
                stops,
            };
            info!("{fare}");
            fares.push(fare);
        }

        Ok(fares)
    }

    /// Number of calling points behind `href`.
    ///
    /// Lookup failures count as 0 stops and are not cached.
    async fn count_stops(&mut self, href: &str) -> Result<usize, FareError> {
        let url = match self.config.resolve(href) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "skipping calling points");
                return Ok(0);
            }
        };

        let key = CacheKey::stops(&url);
        if let Some(count) = self.cache.stops(&key) {
            return Ok(count);
        }

        let html = match self.pages.calling_points_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch calling points");
                return Ok(0);
            }
        };

        let Some(count) = markup::count_calling_points(&html) else {
            warn!(url = %url, "calling points page has no table");
            return Ok(0);
        };

        self.cache.put(key, CacheValue::Stops { count })?;
        Ok(count)
    }
}

impl<P: PageFetcher> FareSource for CachedFareSource<P> {
    async fn fetch_fares(
        &mut self,
        date: NaiveDate,
        direction: Direction,
    ) -> Result<Vec<FareRecord>, FareError> {
        let route_url = self.config.route_url(&self.route, direction);
        let key = CacheKey::fares(date, route_url.as_str());

        if let Some(fares) = self.cache.fares(&key) {
            debug!(%date, %direction, fares = fares.len(), "cache hit");
            for fare in fares {
                info!("{fare}");
            }
            return Ok(fares.to_vec());
        }
        debug!(%date, %direction, "cache miss");

        let url = format!("{route_url}/{}", date.format("%Y-%m-%d"));
        let html = self
            .pages
            .results_page(&url)
            .await
            .map_err(|e| FareError::fetch(date, direction, e))?;

        if markup::is_too_far_in_advance(&html) {
            return Err(FareError::TooFarInAdvance { date });
        }

        let mut fares = self.page_fares(&html, date, direction).await?;

        if let Some(href) = markup::paging_link(&html, direction) {
            let more_url = self
                .config
                .resolve(&href)
                .map_err(|e| FareError::fetch(date, direction, e))?;
            let more = self
                .pages
                .results_page(&more_url)
                .await
                .map_err(|e| FareError::fetch(date, direction, e))?;
            fares.extend(self.page_fares(&more, date, direction).await?);
        }

        self.cache.put(
            key,
            CacheValue::Fares {
                fares: fares.clone(),
            },
        )?;

        Ok(fares)
    }
}
