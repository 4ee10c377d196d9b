//! Two-pass itinerary selection.
//!
//! Pass 1 walks the same-day pairs in date order, fetching both legs and
//! keeping the cheapest itineraries per pair. Pass 2 builds overnight
//! itineraries from the legs that won pass 1, without fetching again.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::SelectConfig;
use super::rank::{best_fares, best_itineraries, combine};
use crate::cache::CacheError;
use crate::domain::{DatePair, Direction, FareRecord, ResultSet};
use crate::source::{FareError, FareSource};

/// Errors that abort selection.
///
/// Horizon cutoffs and per-date fetch failures are not errors at this level.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("failed to save fetched fares: {0}")]
    Persistence(#[from] CacheError),
}

/// Outcome of fetching one leg.
enum Leg {
    Fares(Vec<FareRecord>),
    BeyondHorizon,
}

/// Select the cheapest itineraries for `pairs`.
///
/// Pairs must be in date order, as produced by
/// [`enumerate`](crate::domain::enumerate): the first date past the fare
/// horizon ends the scan, and everything already selected is kept.
pub async fn select<S: FareSource>(
    pairs: &[DatePair],
    source: &mut S,
    config: &SelectConfig,
) -> Result<ResultSet, SelectError> {
    let mut results = ResultSet::default();

    for pair in pairs.iter().filter(|p| p.is_same_day()) {
        let outbound = match fetch_leg(source, pair.first(), Direction::Outbound, config).await? {
            Leg::Fares(fares) => fares,
            Leg::BeyondHorizon => break,
        };
        let inbound = match fetch_leg(source, pair.second(), Direction::Return, config).await? {
            Leg::Fares(fares) => fares,
            Leg::BeyondHorizon => break,
        };

        if outbound.is_empty() || inbound.is_empty() {
            debug!(date = %pair.first(), "no fares for one leg, skipping");
            continue;
        }

        let outbound = best_fares(outbound, config.fares_per_leg);
        let inbound = best_fares(inbound, config.fares_per_leg);
        let chosen = best_itineraries(combine(&outbound, &inbound), config.itineraries_per_pair);

        if pair.is_tuesday() {
            results.same_day_tuesday.extend(chosen);
        } else {
            results.same_day_wednesday.extend(chosen);
        }
    }

    for pair in pairs.iter().filter(|p| p.is_overnight()) {
        let outbound = distinct(
            results
                .same_day_tuesday
                .iter()
                .map(|it| &it.outbound)
                .filter(|fare| fare.date == pair.first()),
        );
        let inbound = distinct(
            results
                .same_day_wednesday
                .iter()
                .map(|it| &it.inbound)
                .filter(|fare| fare.date == pair.second()),
        );

        let chosen = best_itineraries(combine(&outbound, &inbound), config.itineraries_per_pair);
        results.overnight.extend(chosen);
    }

    Ok(results)
}

async fn fetch_leg<S: FareSource>(
    source: &mut S,
    date: NaiveDate,
    direction: Direction,
    config: &SelectConfig,
) -> Result<Leg, SelectError> {
    match source.fetch_fares(date, direction).await {
        Ok(fares) => Ok(Leg::Fares(
            fares.into_iter().filter(|f| config.accepts(f)).collect(),
        )),
        Err(FareError::TooFarInAdvance { date }) => {
            info!(%date, "reached the fare horizon, stopping");
            Ok(Leg::BeyondHorizon)
        }
        Err(FareError::Persistence(e)) => Err(SelectError::Persistence(e)),
        Err(e @ FareError::Fetch { .. }) => {
            warn!(error = %e, "treating as no fares");
            Ok(Leg::Fares(Vec::new()))
        }
    }
}

/// Clone the distinct fares out of `fares`, keeping first-seen order.
fn distinct<'a>(fares: impl Iterator<Item = &'a FareRecord>) -> Vec<FareRecord> {
    let mut seen = HashSet::new();
    fares
        .filter(|fare| seen.insert(*fare))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Itinerary, Price, enumerate};
    use std::collections::HashMap;
    use std::io;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fare(direction: Direction, day: NaiveDate, pounds: u32, minutes: u32) -> FareRecord {
        FareRecord {
            direction,
            cost: Price::from_pounds(pounds),
            departure_arrival: format!("{pounds}/{minutes}"),
            travel_time: format!("{}h {}m", minutes / 60, minutes % 60),
            travel_minutes: minutes,
            date: day,
            stops: 2,
        }
    }

    enum Reply {
        Fares(Vec<FareRecord>),
        TooFar,
        Fail,
        DiskFull,
    }

    /// Mock fare source for testing. Dates without a reply have no fares.
    #[derive(Default)]
    struct MockSource {
        replies: HashMap<(NaiveDate, Direction), Reply>,
        calls: Vec<(NaiveDate, Direction)>,
    }

    impl MockSource {
        fn with(mut self, day: NaiveDate, direction: Direction, reply: Reply) -> Self {
            self.replies.insert((day, direction), reply);
            self
        }

        fn with_fares(self, day: NaiveDate, direction: Direction, fares: &[(u32, u32)]) -> Self {
            let fares = fares
                .iter()
                .map(|&(pounds, minutes)| fare(direction, day, pounds, minutes))
                .collect();
            self.with(day, direction, Reply::Fares(fares))
        }
    }

    impl FareSource for MockSource {
        async fn fetch_fares(
            &mut self,
            date: NaiveDate,
            direction: Direction,
        ) -> Result<Vec<FareRecord>, FareError> {
            self.calls.push((date, direction));
            match self.replies.get(&(date, direction)) {
                None => Ok(Vec::new()),
                Some(Reply::Fares(fares)) => Ok(fares.clone()),
                Some(Reply::TooFar) => Err(FareError::TooFarInAdvance { date }),
                Some(Reply::Fail) => Err(FareError::fetch(date, direction, "connection reset")),
                Some(Reply::DiskFull) => Err(FareError::Persistence(CacheError::Write(
                    io::Error::other("disk full"),
                ))),
            }
        }
    }

    fn totals(itineraries: &[Itinerary]) -> Vec<u32> {
        itineraries
            .iter()
            .map(|i| i.total_cost().pence() / 100)
            .collect()
    }

    #[tokio::test]
    async fn same_day_scenario() {
        let tue = date(2025, 6, 3);
        let mut source = MockSource::default()
            .with_fares(tue, Direction::Outbound, &[(40, 120), (30, 150), (90, 90)])
            .with_fares(tue, Direction::Return, &[(50, 100), (20, 140)]);

        let pairs = [DatePair::same_day(tue)];
        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert_eq!(totals(&results.same_day_tuesday), vec![50, 60]);
        assert!(results.same_day_wednesday.is_empty());
        assert!(results.overnight.is_empty());

        let best = &results.same_day_tuesday[0];
        assert_eq!(best.outbound.cost, Price::from_pounds(30));
        assert_eq!(best.inbound.cost, Price::from_pounds(20));
    }

    #[tokio::test]
    async fn overnight_is_built_from_winners() {
        let tue = date(2025, 6, 3);
        let wed = date(2025, 6, 4);
        // Both Tuesday winners share the £35 outbound, so it must only be
        // paired once.
        let mut source = MockSource::default()
            .with_fares(tue, Direction::Outbound, &[(35, 130)])
            .with_fares(tue, Direction::Return, &[(30, 120), (45, 120)])
            .with_fares(wed, Direction::Outbound, &[(50, 130)])
            .with_fares(wed, Direction::Return, &[(28, 120)]);

        let pairs = enumerate(tue, wed, tue).unwrap();
        assert_eq!(pairs.len(), 3);

        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert_eq!(totals(&results.same_day_tuesday), vec![65, 80]);
        assert_eq!(totals(&results.same_day_wednesday), vec![78]);
        assert_eq!(totals(&results.overnight), vec![63]);

        let overnight = &results.overnight[0];
        assert_eq!(overnight.outbound.date_label(), "June 03, 2025");
        assert_eq!(overnight.inbound.date_label(), "June 04, 2025");

        // Overnight pairs never fetch.
        assert_eq!(source.calls.len(), 4);
    }

    #[tokio::test]
    async fn overnight_needs_both_days() {
        let tue = date(2025, 6, 3);
        let wed = date(2025, 6, 4);
        let mut source = MockSource::default()
            .with_fares(tue, Direction::Outbound, &[(35, 130)])
            .with_fares(tue, Direction::Return, &[(30, 120)]);

        let pairs = enumerate(tue, wed, tue).unwrap();
        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert_eq!(results.same_day_tuesday.len(), 1);
        assert!(results.same_day_wednesday.is_empty());
        assert!(results.overnight.is_empty());
    }

    #[tokio::test]
    async fn horizon_stops_the_scan() {
        let (d3, d4, d10, d11) = (
            date(2025, 6, 3),
            date(2025, 6, 4),
            date(2025, 6, 10),
            date(2025, 6, 11),
        );
        let mut source = MockSource::default()
            .with_fares(d3, Direction::Outbound, &[(30, 120)])
            .with_fares(d3, Direction::Return, &[(20, 120)])
            .with_fares(d4, Direction::Outbound, &[(31, 120)])
            .with_fares(d4, Direction::Return, &[(21, 120)])
            .with(d10, Direction::Outbound, Reply::TooFar)
            .with_fares(d11, Direction::Outbound, &[(1, 120)])
            .with_fares(d11, Direction::Return, &[(1, 120)]);

        let pairs = enumerate(d3, date(2025, 6, 30), d3).unwrap();
        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert_eq!(totals(&results.same_day_tuesday), vec![50]);
        assert_eq!(totals(&results.same_day_wednesday), vec![52]);
        assert_eq!(totals(&results.overnight), vec![51]);

        assert_eq!(source.calls.last(), Some(&(d10, Direction::Outbound)));
        assert!(!source.calls.iter().any(|(d, _)| *d > d10));
    }

    #[tokio::test]
    async fn horizon_on_return_leg_also_stops() {
        let (d3, d4) = (date(2025, 6, 3), date(2025, 6, 4));
        let mut source = MockSource::default()
            .with_fares(d3, Direction::Outbound, &[(30, 120)])
            .with(d3, Direction::Return, Reply::TooFar)
            .with_fares(d4, Direction::Outbound, &[(31, 120)])
            .with_fares(d4, Direction::Return, &[(21, 120)]);

        let pairs = enumerate(d3, d4, d3).unwrap();
        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(source.calls.len(), 2);
    }

    #[tokio::test]
    async fn transient_failure_skips_the_pair() {
        let (d3, d4) = (date(2025, 6, 3), date(2025, 6, 4));
        let mut source = MockSource::default()
            .with(d3, Direction::Outbound, Reply::Fail)
            .with_fares(d3, Direction::Return, &[(20, 120)])
            .with_fares(d4, Direction::Outbound, &[(31, 120)])
            .with_fares(d4, Direction::Return, &[(21, 120)]);

        let pairs = enumerate(d3, d4, d3).unwrap();
        let results = select(&pairs, &mut source, &SelectConfig::default())
            .await
            .unwrap();

        assert!(results.same_day_tuesday.is_empty());
        assert_eq!(totals(&results.same_day_wednesday), vec![52]);
        assert!(results.overnight.is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_aborts() {
        let d3 = date(2025, 6, 3);
        let mut source = MockSource::default().with(d3, Direction::Outbound, Reply::DiskFull);

        let err = select(&[DatePair::same_day(d3)], &mut source, &SelectConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SelectError::Persistence(CacheError::Write(_))));
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn stop_filter_applies_before_ranking() {
        let d3 = date(2025, 6, 3);
        let mut stopping = fare(Direction::Outbound, d3, 10, 200);
        stopping.stops = 12;
        let mut source = MockSource::default()
            .with(
                d3,
                Direction::Outbound,
                Reply::Fares(vec![stopping, fare(Direction::Outbound, d3, 40, 120)]),
            )
            .with_fares(d3, Direction::Return, &[(20, 120)]);

        let results = select(&[DatePair::same_day(d3)], &mut source, &SelectConfig::default())
            .await
            .unwrap();
        assert_eq!(totals(&results.same_day_tuesday), vec![60]);

        let mut source = MockSource::default()
            .with(
                d3,
                Direction::Outbound,
                Reply::Fares(vec![{
                    let mut f = fare(Direction::Outbound, d3, 10, 200);
                    f.stops = 12;
                    f
                }]),
            )
            .with_fares(d3, Direction::Return, &[(20, 120)]);
        let results = select(&[DatePair::same_day(d3)], &mut source, &SelectConfig::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn no_pairs_no_fetches() {
        let mut source = MockSource::default();
        let results = select(&[], &mut source, &SelectConfig::default())
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(source.calls.is_empty());
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let d3 = date(2025, 6, 3);
        let a = fare(Direction::Outbound, d3, 35, 130);
        let b = fare(Direction::Outbound, d3, 30, 130);
        let fares = [a.clone(), b.clone(), a.clone()];

        assert_eq!(distinct(fares.iter()), vec![a, b]);
    }
}
