//! Fare and itinerary ranking.
//!
//! All sorts are stable, so candidates with equal keys keep the order in
//! which the site listed them. That makes every selection deterministic.

use crate::domain::{FareRecord, Itinerary};

/// Rank fares cheapest first, breaking cost ties by shorter journey time.
pub fn rank_fares(mut fares: Vec<FareRecord>) -> Vec<FareRecord> {
    fares.sort_by_key(|fare| (fare.cost, fare.travel_minutes));
    fares
}

/// The `keep` best fares by [`rank_fares`] order.
pub fn best_fares(fares: Vec<FareRecord>, keep: usize) -> Vec<FareRecord> {
    let mut fares = rank_fares(fares);
    fares.truncate(keep);
    fares
}

/// Rank itineraries by total cost, cheapest first.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by_key(Itinerary::total_cost);
    itineraries
}

/// The `keep` cheapest itineraries.
pub fn best_itineraries(itineraries: Vec<Itinerary>, keep: usize) -> Vec<Itinerary> {
    let mut itineraries = rank_itineraries(itineraries);
    itineraries.truncate(keep);
    itineraries
}

/// Pair every outbound fare with every return fare, outbound-major.
pub fn combine(outbound: &[FareRecord], inbound: &[FareRecord]) -> Vec<Itinerary> {
    outbound
        .iter()
        .flat_map(|out| {
            inbound
                .iter()
                .map(move |ret| Itinerary::new(out.clone(), ret.clone()))
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Direction, Price};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn fare_strategy(direction: Direction) -> impl Strategy<Value = FareRecord> {
        (0u32..20_000, 30u32..400, 0usize..12).prop_map(move |(pence, minutes, stops)| {
            FareRecord {
                direction,
                cost: Price::from_pence(pence),
                departure_arrival: String::new(),
                travel_time: String::new(),
                travel_minutes: minutes,
                date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                stops,
            }
        })
    }

    fn fares_strategy(direction: Direction) -> impl Strategy<Value = Vec<FareRecord>> {
        prop::collection::vec(fare_strategy(direction), 0..12)
    }

    proptest! {
        #[test]
        fn rank_fares_is_sorted(fares in fares_strategy(Direction::Outbound)) {
            let ranked = rank_fares(fares);
            for window in ranked.windows(2) {
                prop_assert!(
                    (window[0].cost, window[0].travel_minutes)
                        <= (window[1].cost, window[1].travel_minutes)
                );
            }
        }

        #[test]
        fn best_fares_are_a_cheapest_prefix(fares in fares_strategy(Direction::Outbound), keep in 0usize..4) {
            let all = rank_fares(fares.clone());
            let best = best_fares(fares, keep);
            prop_assert_eq!(best.len(), keep.min(all.len()));
            prop_assert_eq!(&best[..], &all[..best.len()]);
        }

        #[test]
        fn combine_size_is_product(
            out in fares_strategy(Direction::Outbound),
            ret in fares_strategy(Direction::Return),
        ) {
            let combined = combine(&out, &ret);
            prop_assert_eq!(combined.len(), out.len() * ret.len());
        }

        #[test]
        fn best_itineraries_are_cheapest(
            out in fares_strategy(Direction::Outbound),
            ret in fares_strategy(Direction::Return),
        ) {
            let all = combine(&out, &ret);
            let best = best_itineraries(all.clone(), 2);

            for chosen in &best {
                let cheaper = all.iter().filter(|i| i.total_cost() < chosen.total_cost()).count();
                prop_assert!(cheaper < 2);
            }
            for window in best.windows(2) {
                prop_assert!(window[0].total_cost() <= window[1].total_cost());
            }
        }
    }
}
