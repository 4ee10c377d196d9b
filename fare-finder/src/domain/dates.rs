//! Travel-date windows.
//!
//! Trips are only searched on Tuesdays and Wednesdays. Each such day gives a
//! same-day pair; a Tuesday directly followed by its Wednesday also gives an
//! overnight pair.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Error returned when a date window starts in the past.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("date window starts on {from}, which is before today ({today})")]
pub struct InvalidRange {
    pub from: NaiveDate,
    pub today: NaiveDate,
}

/// Outbound and return travel dates for one candidate trip.
///
/// Either both dates are equal (same-day), or the first is a Tuesday and the
/// second is the following Wednesday (overnight). Constructors enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatePair {
    first: NaiveDate,
    second: NaiveDate,
}

impl DatePair {
    /// Out and back on the same day.
    pub fn same_day(date: NaiveDate) -> Self {
        Self {
            first: date,
            second: date,
        }
    }

    /// Out on `tuesday`, back the next day.
    ///
    /// Returns `None` if `tuesday` is not a Tuesday.
    pub fn overnight(tuesday: NaiveDate) -> Option<Self> {
        if tuesday.weekday() != Weekday::Tue {
            return None;
        }
        let wednesday = tuesday.succ_opt()?;
        Some(Self {
            first: tuesday,
            second: wednesday,
        })
    }

    /// Outbound travel date.
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Return travel date.
    pub fn second(&self) -> NaiveDate {
        self.second
    }

    pub fn is_same_day(&self) -> bool {
        self.first == self.second
    }

    pub fn is_overnight(&self) -> bool {
        !self.is_same_day()
    }

    /// True for a same-day pair on a Tuesday.
    pub fn is_tuesday(&self) -> bool {
        self.is_same_day() && self.first.weekday() == Weekday::Tue
    }
}

/// Enumerate the candidate date pairs in `date_from..=date_to`.
///
/// Only Tuesdays and Wednesdays on or after `today` qualify. Pairs come out
/// in date order, each same-day pair directly followed by its overnight pair
/// when there is one. A window with no qualifying dates (including one where
/// `date_to < date_from`) is empty rather than an error.
///
/// # Errors
///
/// Returns [`InvalidRange`] if `date_from` is before `today`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fare_finder::domain::enumerate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let to = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
///
/// // Tue 3rd, overnight 3rd-4th, Wed 4th
/// let pairs = enumerate(today, to, today).unwrap();
/// assert_eq!(pairs.len(), 3);
/// assert!(pairs[1].is_overnight());
/// ```
pub fn enumerate(
    date_from: NaiveDate,
    date_to: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<DatePair>, InvalidRange> {
    if date_from < today {
        return Err(InvalidRange {
            from: date_from,
            today,
        });
    }

    let dates: Vec<NaiveDate> = date_from
        .iter_days()
        .take_while(|d| *d <= date_to)
        .filter(|d| matches!(d.weekday(), Weekday::Tue | Weekday::Wed) && *d >= today)
        .collect();

    let mut pairs = Vec::with_capacity(dates.len() * 3 / 2);
    for (i, &date) in dates.iter().enumerate() {
        pairs.push(DatePair::same_day(date));

        let next = dates.get(i + 1);
        if date.weekday() == Weekday::Tue
            && next.is_some_and(|next| *next - date == Duration::days(1))
            && let Some(pair) = DatePair::overnight(date)
        {
            pairs.push(pair);
        }
    }

    Ok(pairs)
}

/// Last calendar day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
