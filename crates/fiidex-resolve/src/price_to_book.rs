//! Price-to-book (P/VP) series.
//!
//! Daily rows join each trading day's close with the book value resolved for
//! that day; monthly rows keep the last daily row of every calendar month.

use crate::{
    book_value::{BookValueResolution, BookValueResolver},
    fill::{as_of_join, last_per_month},
};
use fiidex_traits::{
    Date, DateSpan, FiidexError, PriceToBookPoint, ResolvedSeries, Result, Snapshot, Ticker,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `close / book_value`, or `None` for a zero, negative-zero or non-finite
/// denominator.
pub fn price_to_book(close: f64, book_value: f64) -> Option<f64> {
    (book_value.is_finite() && book_value != 0.0)
        .then(|| close / book_value)
        .filter(|ratio| ratio.is_finite())
}

/// Latest P/VP reading of a monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceToBookSummary {
    /// Month-end label of the latest row.
    pub date: Date,
    /// Latest P/VP.
    pub price_to_book: f64,
    /// Latest close.
    pub close: f64,
    /// Latest book value per share.
    pub book_value: f64,
    /// Whether the book value changed over the series (historical source)
    /// rather than staying fixed.
    pub historical_book_value: bool,
}

/// Summarize a monthly (or daily) series; `None` when it is empty.
pub fn summarize(series: &ResolvedSeries<PriceToBookPoint>) -> Option<PriceToBookSummary> {
    let latest = series.last()?;
    let first_book_value = series.first()?.book_value_used;
    Some(PriceToBookSummary {
        date: latest.date,
        price_to_book: latest.price_to_book,
        close: latest.close,
        book_value: latest.book_value_used,
        historical_book_value: series
            .iter()
            .any(|p| p.book_value_used != first_book_value),
    })
}

/// Computes P/VP series from quotes and resolved book values.
#[derive(Debug, Default)]
pub struct PriceToBookEngine {
    book_values: BookValueResolver,
}

impl PriceToBookEngine {
    /// Create an engine resolving book values with `book_values`.
    pub const fn new(book_values: BookValueResolver) -> Self {
        Self { book_values }
    }

    /// The book-value resolver in use.
    pub const fn book_values(&self) -> &BookValueResolver {
        &self.book_values
    }

    /// Book value of `ticker` resolved over its quote span.
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::NoData`] when the ticker has no quotes, or the
    /// book-value resolver's error.
    pub fn try_book_value(&self, ticker: &Ticker, snapshot: &Snapshot) -> Result<BookValueResolution> {
        let span = quote_span(ticker, snapshot)
            .ok_or_else(|| FiidexError::NoData(ticker.bare().to_string()))?;
        self.book_values.try_resolve(ticker, snapshot, span)
    }

    /// Daily P/VP of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::NoData`] when the ticker has no quotes and
    /// [`FiidexError::DegenerateDenominator`] when no day has a usable book
    /// value.
    pub fn try_daily(&self, ticker: &Ticker, snapshot: &Snapshot) -> Result<ResolvedSeries<PriceToBookPoint>> {
        let ticker = ticker.bare();
        let prices = ResolvedSeries::from_points(snapshot.quotes(&ticker).to_vec());
        let span = DateSpan::covering(prices.dates())
            .ok_or_else(|| FiidexError::NoData(ticker.to_string()))?;

        let resolution = self.book_values.try_resolve(&ticker, snapshot, span)?;
        let joined = as_of_join(&resolution.series, prices.dates());

        let points: Vec<PriceToBookPoint> = prices
            .iter()
            .zip(joined)
            .filter_map(|(quote, (_, book_value))| {
                let book_value = book_value?.book_value_per_share;
                Some(PriceToBookPoint {
                    date: quote.date,
                    close: quote.close,
                    book_value_used: book_value,
                    price_to_book: price_to_book(quote.close, book_value)?,
                })
            })
            .collect();

        if points.is_empty() {
            return Err(FiidexError::DegenerateDenominator(format!(
                "no usable book value for {ticker} on any trading day"
            )));
        }
        debug!(%ticker, rows = points.len(), "daily price to book");
        Ok(ResolvedSeries::from_points(points))
    }

    /// Daily P/VP of `ticker`; failures yield an empty series.
    pub fn daily(&self, ticker: &Ticker, snapshot: &Snapshot) -> ResolvedSeries<PriceToBookPoint> {
        self.try_daily(ticker, snapshot).unwrap_or_else(|err| {
            debug!(%ticker, error = %err, "daily price to book unavailable");
            ResolvedSeries::default()
        })
    }

    /// Monthly P/VP of `ticker`: last daily row of each month, dated at the
    /// month end.
    ///
    /// # Errors
    ///
    /// Same as [`PriceToBookEngine::try_daily`].
    pub fn try_monthly(&self, ticker: &Ticker, snapshot: &Snapshot) -> Result<ResolvedSeries<PriceToBookPoint>> {
        let daily = self.try_daily(ticker, snapshot)?;
        Ok(monthly(&daily))
    }

    /// Monthly P/VP of `ticker`; failures yield an empty series.
    pub fn monthly(&self, ticker: &Ticker, snapshot: &Snapshot) -> ResolvedSeries<PriceToBookPoint> {
        monthly(&self.daily(ticker, snapshot))
    }
}

/// Span from the first to the last quote of `ticker`.
pub fn quote_span(ticker: &Ticker, snapshot: &Snapshot) -> Option<DateSpan> {
    DateSpan::covering(snapshot.quotes(ticker).iter().map(|q| q.date))
}

/// Resample a daily series to one row per month.
pub fn monthly(daily: &ResolvedSeries<PriceToBookPoint>) -> ResolvedSeries<PriceToBookPoint> {
    ResolvedSeries::from_points(
        last_per_month(daily)
            .into_iter()
            .map(|(month_end, point)| PriceToBookPoint {
                date: month_end,
                ..*point
            })
            .collect(),
    )
}
