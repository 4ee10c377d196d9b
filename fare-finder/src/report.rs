//! Final ranking and console output.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::domain::{FareRecord, Itinerary, ResultSet};
use crate::selector::rank_itineraries;

/// Trip category, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Tuesday,
    Wednesday,
    Overnight,
}

impl Category {
    fn title(self) -> &'static str {
        match self {
            Category::Tuesday => "Tuesday Same-Day Trips",
            Category::Wednesday => "Wednesday Same-Day Trips",
            Category::Overnight => "Overnight Trips",
        }
    }
}

/// Selected itineraries, cheapest first within each category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub tuesday: Vec<Itinerary>,
    pub wednesday: Vec<Itinerary>,
    pub overnight: Vec<Itinerary>,
}

impl Report {
    /// Rank a result set for display.
    ///
    /// Wednesday trips are only worth reporting when they beat the best
    /// Tuesday, so once both exist the rest are dropped.
    pub fn rank(results: ResultSet) -> Self {
        let tuesday = rank_itineraries(results.same_day_tuesday);
        let mut wednesday = rank_itineraries(results.same_day_wednesday);
        let overnight = rank_itineraries(results.overnight);

        if let Some(best_tuesday) = tuesday.first().map(Itinerary::total_cost)
            && !wednesday.is_empty()
        {
            wednesday.retain(|it| it.total_cost() < best_tuesday);
        }

        Self {
            tuesday,
            wednesday,
            overnight,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tuesday.is_empty() && self.wednesday.is_empty() && self.overnight.is_empty()
    }

    pub fn category(&self, category: Category) -> &[Itinerary] {
        match category {
            Category::Tuesday => &self.tuesday,
            Category::Wednesday => &self.wednesday,
            Category::Overnight => &self.overnight,
        }
    }

    /// Cheapest itinerary in `category`.
    pub fn best(&self, category: Category) -> Option<&Itinerary> {
        self.category(category).first()
    }

    /// Everything in `category` after the best.
    pub fn alternatives(&self, category: Category) -> &[Itinerary] {
        self.category(category).get(1..).unwrap_or_default()
    }

    /// Printable form. With `debug_hashes`, each fare line ends with a hash
    /// of its record so identical fares can be spotted across categories.
    pub fn render(&self, debug_hashes: bool) -> Rendered<'_> {
        Rendered {
            report: self,
            debug_hashes,
        }
    }
}

const CATEGORIES: [Category; 3] = [Category::Tuesday, Category::Wednesday, Category::Overnight];

/// A [`Report`] ready for printing.
pub struct Rendered<'a> {
    report: &'a Report,
    debug_hashes: bool,
}

impl Rendered<'_> {
    fn section(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        itineraries: &[Itinerary],
    ) -> fmt::Result {
        if itineraries.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "=== {title} ===")?;
        for (i, it) in itineraries.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Option {}:", i + 1)?;
            self.fare_line(f, "Outbound", &it.outbound)?;
            self.fare_line(f, "Return", &it.inbound)?;
            writeln!(f, "Total cost: {}", it.total_cost())?;
        }
        Ok(())
    }

    fn fare_line(&self, f: &mut fmt::Formatter<'_>, label: &str, fare: &FareRecord) -> fmt::Result {
        write!(
            f,
            "{label}: {} - {}: {} ({})",
            fare.date_label(),
            fare.departure_arrival,
            fare.cost,
            fare.travel_time
        )?;
        if self.debug_hashes {
            write!(f, "  #{:016x}", record_hash(fare))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.report.is_empty() {
            return writeln!(f, "No fares found.");
        }

        for category in CATEGORIES {
            let best = self
                .report
                .best(category)
                .map(std::slice::from_ref)
                .unwrap_or_default();
            self.section(f, &format!("Best {}", category.title()), best)?;
        }
        for category in CATEGORIES {
            self.section(
                f,
                &format!("Other Options {}", category.title()),
                self.report.alternatives(category),
            )?;
        }
        Ok(())
    }
}

fn record_hash(fare: &FareRecord) -> u64 {
    let mut hasher = DefaultHasher::new();
    fare.hash(&mut hasher);
    hasher.finish()
}
