//! Resolved, date-indexed series returned by every query.
//!
//! A [`ResolvedSeries`] is always sorted ascending by date with no duplicate
//! dates. The constructor enforces this, so callers can build one from
//! points in any order.

use crate::Date;
use serde::{Deserialize, Serialize};

/// Anything positioned on a calendar day.
pub trait Dated {
    /// The day this item belongs to.
    fn date(&self) -> Date;
}

/// An ascending, duplicate-free sequence of dated points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSeries<T> {
    points: Vec<T>,
}

impl<T> Default for ResolvedSeries<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: Dated> ResolvedSeries<T> {
    /// Build a series from points in any order.
    ///
    /// Points are stably sorted by date. When several points share a date the
    /// last one supplied wins.
    pub fn from_points(mut points: Vec<T>) -> Self {
        points.sort_by_key(Dated::date);
        let mut deduped: Vec<T> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date() == point.date() => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    /// Point dated exactly `date`.
    pub fn get(&self, date: Date) -> Option<&T> {
        self.points
            .binary_search_by_key(&date, Dated::date)
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// Latest point dated on or before `date` (backward-nearest lookup).
    pub fn as_of(&self, date: Date) -> Option<&T> {
        let idx = self.points.partition_point(|p| p.date() <= date);
        idx.checked_sub(1).map(|i| &self.points[i])
    }

    /// Dates of the series, ascending.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.points.iter().map(Dated::date)
    }
}

impl<T> ResolvedSeries<T> {
    /// The points, ascending by date.
    pub fn points(&self) -> &[T] {
        &self.points
    }

    /// Consume the series and return its points.
    pub fn into_points(self) -> Vec<T> {
        self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the points, ascending by date.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    /// Earliest point.
    pub fn first(&self) -> Option<&T> {
        self.points.first()
    }

    /// Latest point.
    pub fn last(&self) -> Option<&T> {
        self.points.last()
    }
}

impl<T> IntoIterator for ResolvedSeries<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResolvedSeries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// One row of a dividend-yield history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendYieldPoint {
    /// Base date of the distribution.
    pub date: Date,
    /// Amount distributed per share.
    pub dividend: f64,
    /// Reference price used for the yield.
    pub price_at_date: Option<f64>,
    /// Monthly dividend yield, in percent.
    pub dy_monthly: Option<f64>,
}

impl Dated for DividendYieldPoint {
    fn date(&self) -> Date {
        self.date
    }
}

/// Where a resolved book value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookValueSource {
    /// Historical fundamentals with a reported share count.
    YahooHistDirect,
    /// Historical fundamentals divided by a share count estimated from the
    /// current snapshot.
    YahooHistEstimatedShares,
    /// Oceans14 quarterly indicator table.
    Oceans14Quarterly,
    /// Book value of the most recent indicator snapshot.
    CurrentFixed,
}

impl BookValueSource {
    /// Stable identifier used in logs and exported frames.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::YahooHistDirect => "yahoo_hist",
            Self::YahooHistEstimatedShares => "yahoo_hist_estimated_shares",
            Self::Oceans14Quarterly => "oceans14",
            Self::CurrentFixed => "current",
        }
    }
}

impl std::fmt::Display for BookValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book value per share observed (or carried forward) on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookValuePoint {
    /// Calendar day.
    pub date: Date,
    /// Book value per share in effect on that day.
    pub book_value_per_share: f64,
    /// Source that produced the value.
    pub source: BookValueSource,
}

impl Dated for BookValuePoint {
    fn date(&self) -> Date {
        self.date
    }
}

/// One row of a price-to-book series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceToBookPoint {
    /// Trading day (or month-end row for monthly series).
    pub date: Date,
    /// Closing price.
    pub close: f64,
    /// Book value per share applied on that day.
    pub book_value_used: f64,
    /// `close / book_value_used`.
    pub price_to_book: f64,
}

impl Dated for PriceToBookPoint {
    fn date(&self) -> Date {
        self.date
    }
}
