//! Common types used throughout fiidex.
//!
//! This module defines the ticker identifier, the requested date span and the
//! canonical records produced by the normalizer. Optional economic fields are
//! modelled as `Option<f64>` and decided once, at normalization time.

use chrono::NaiveDateTime;
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Exchange marker appended to B3 listings by Yahoo-style providers.
pub const EXCHANGE_SUFFIX: &str = ".SA";

/// A fund ticker.
///
/// Tickers are trimmed and upper-cased on construction, so `" hglg11.sa "`
/// and `"HGLG11.SA"` are the same value. A ticker may carry the exchange
/// suffix; [`Ticker::bare`] and [`Ticker::with_exchange_suffix`] move between
/// the two spellings.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker from raw text.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// The ticker as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the ticker carries the exchange suffix.
    pub fn has_exchange_suffix(&self) -> bool {
        self.0.ends_with(EXCHANGE_SUFFIX)
    }

    /// The ticker without the exchange suffix.
    #[must_use]
    pub fn bare(&self) -> Self {
        match self.0.strip_suffix(EXCHANGE_SUFFIX) {
            Some(stripped) => Self(stripped.to_string()),
            None => self.clone(),
        }
    }

    /// The provider symbol: the ticker with the exchange suffix appended if absent.
    pub fn with_exchange_suffix(&self) -> String {
        if self.has_exchange_suffix() {
            self.0.clone()
        } else {
            format!("{}{EXCHANGE_SUFFIX}", self.0)
        }
    }

    /// Both spellings under which quotes for this ticker may be stored.
    pub fn variants(&self) -> [Self; 2] {
        let bare = self.bare();
        let suffixed = Self(bare.with_exchange_suffix());
        [bare, suffixed]
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    start: Date,
    end: Date,
}

impl DateSpan {
    /// Create a span; returns `None` when `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A span covering a single day.
    pub const fn day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day of the span.
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last day of the span.
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Whether the span contains `date`.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate every calendar day of the span, ascending.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Smallest span covering every date yielded, or `None` for no dates.
    pub fn covering(dates: impl IntoIterator<Item = Date>) -> Option<Self> {
        let mut dates = dates.into_iter();
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }
}

/// A distribution (dividend) paid by a fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEvent {
    /// Fund ticker.
    pub ticker: Ticker,
    /// Base date of the distribution.
    pub date: Date,
    /// Amount distributed per share.
    pub dividend: f64,
    /// Closing price on the base date, when the source reports it.
    pub price_at_date: Option<f64>,
    /// Monthly yield in percent, when the source reports it.
    pub dy_monthly: Option<f64>,
}

/// A daily closing quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Ticker as written by the source, with or without the exchange suffix.
    pub ticker: Ticker,
    /// Trading day.
    pub date: Date,
    /// Closing price.
    pub close: f64,
}

/// A point-in-time reading of a fund's current indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Fund ticker.
    pub ticker: Ticker,
    /// When the reading was taken.
    pub timestamp: NaiveDateTime,
    /// Book value per share at the time of the reading.
    pub book_value_per_share: Option<f64>,
    /// Net assets at the time of the reading.
    pub net_assets: Option<f64>,
}

impl IndicatorSnapshot {
    /// Share count implied by the reading (`net_assets / book_value_per_share`).
    ///
    /// Returns `None` when either figure is missing, non-finite, or the book
    /// value is zero.
    pub fn implied_shares(&self) -> Option<f64> {
        let net_assets = self.net_assets.filter(|v| v.is_finite())?;
        let bvps = self
            .book_value_per_share
            .filter(|v| v.is_finite() && *v != 0.0)?;
        Some(net_assets / bvps)
    }

    /// Book value per share when usable as a fixed value (finite and non-zero).
    pub fn usable_book_value(&self) -> Option<f64> {
        self.book_value_per_share
            .filter(|v| v.is_finite() && *v != 0.0)
    }
}

/// A historical fundamentals record (balance-sheet equity and share count).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    /// Fund ticker.
    pub ticker: Ticker,
    /// Balance-sheet date.
    pub date: Date,
    /// Net assets (equity).
    pub net_assets: Option<f64>,
    /// Shares outstanding at the balance-sheet date.
    pub shares_outstanding: Option<f64>,
    /// Book value per share as reported by the source.
    pub book_value_per_share: Option<f64>,
}

/// A quarterly book-value row from the Oceans14 indicator table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyBookValue {
    /// Fund ticker.
    pub ticker: Ticker,
    /// Quarter label as published (`"1T2023"`).
    pub quarter: String,
    /// Last calendar day of the quarter.
    pub date: Date,
    /// Book value per share at quarter end.
    pub book_value_per_share: Option<f64>,
    /// Published price-to-book ratio.
    pub price_to_book: Option<f64>,
}

macro_rules! impl_dated {
    ($($ty:ty),* $(,)?) => {
        $(
            impl crate::series::Dated for $ty {
                fn date(&self) -> Date {
                    self.date
                }
            }
        )*
    };
}

impl_dated!(DistributionEvent, PriceQuote, FundamentalsRecord, QuarterlyBookValue);

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_ticker_normalizes_case_and_whitespace() {
        let ticker = Ticker::new("  hglg11 ");
        assert_eq!(ticker.as_str(), "HGLG11");
        assert_eq!(ticker, Ticker::from("HGLG11"));
    }

    #[test]
    fn test_ticker_suffix_handling() {
        let bare = Ticker::new("MXRF11");
        assert!(!bare.has_exchange_suffix());
        assert_eq!(bare.with_exchange_suffix(), "MXRF11.SA");

        let suffixed = Ticker::new("mxrf11.sa");
        assert!(suffixed.has_exchange_suffix());
        assert_eq!(suffixed.with_exchange_suffix(), "MXRF11.SA");
        assert_eq!(suffixed.bare(), bare);
    }

    #[test]
    fn test_ticker_variants() {
        let [bare, suffixed] = Ticker::new("KNRI11.SA").variants();
        assert_eq!(bare.as_str(), "KNRI11");
        assert_eq!(suffixed.as_str(), "KNRI11.SA");
    }

    #[test]
    fn test_date_span_days() {
        let span = DateSpan::new(d(2024, 2, 27), d(2024, 3, 1)).unwrap();
        let days: Vec<Date> = span.days().collect();
        assert_eq!(days, vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
        assert!(span.contains(d(2024, 2, 29)));
        assert!(!span.contains(d(2024, 3, 2)));
    }

    #[test]
    fn test_date_span_rejects_inverted_range() {
        assert!(DateSpan::new(d(2024, 3, 1), d(2024, 2, 1)).is_none());
    }

    #[test]
    fn test_date_span_covering() {
        let span = DateSpan::covering([d(2023, 5, 1), d(2023, 1, 9), d(2023, 3, 3)]).unwrap();
        assert_eq!(span.start(), d(2023, 1, 9));
        assert_eq!(span.end(), d(2023, 5, 1));
        assert!(DateSpan::covering(Vec::new()).is_none());
    }

    #[test]
    fn test_implied_shares() {
        let snapshot = IndicatorSnapshot {
            ticker: Ticker::new("HGLG11"),
            timestamp: d(2024, 1, 1).and_hms_opt(10, 0, 0).unwrap(),
            book_value_per_share: Some(160.0),
            net_assets: Some(3_200_000_000.0),
        };
        assert_eq!(snapshot.implied_shares(), Some(20_000_000.0));

        let zero_bv = IndicatorSnapshot {
            book_value_per_share: Some(0.0),
            ..snapshot.clone()
        };
        assert_eq!(zero_bv.implied_shares(), None);
        assert_eq!(zero_bv.usable_book_value(), None);

        let no_assets = IndicatorSnapshot {
            net_assets: None,
            ..snapshot
        };
        assert_eq!(no_assets.implied_shares(), None);
        assert_eq!(no_assets.usable_book_value(), Some(160.0));
    }
}
