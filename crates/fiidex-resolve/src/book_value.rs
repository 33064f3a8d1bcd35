//! Book-value-per-share resolution.
//!
//! Book values come from sources of very different cadence: historical
//! fundamentals (irregular, usually quarterly or annual), the Oceans14
//! quarterly table, and a single "current" snapshot. The resolver tries an
//! ordered list of [`BookValueStrategy`]s and uses the first one that yields
//! records:
//!
//! | Priority | Strategy | Source |
//! |---|---|---|
//! | 1 | [`HistoricalDirect`] | reported book value per share, else net assets / reported shares |
//! | 2 | [`HistoricalEstimatedShares`] | net assets / shares implied by the current snapshot |
//! | 3 | [`OceansQuarterly`] | quarterly book value per share |
//! | 4 | [`CurrentFixed`] | current book value held constant |
//!
//! Dated records are forward-filled onto every day of the requested span.
//! Days before the first record take the current fixed value (tagged
//! [`BookValueSource::CurrentFixed`]); days after the last record keep the
//! last record's value.

use crate::fill::forward_fill_daily;
use fiidex_traits::{
    BookValuePoint, BookValueSource, Date, DateSpan, Dated, FiidexError, ResolvedSeries, Result,
    Snapshot, Ticker,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// A book value per share observed on a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Observation day.
    pub date: Date,
    /// Book value per share.
    pub book_value_per_share: f64,
}

impl Dated for Observation {
    fn date(&self) -> Date {
        self.date
    }
}

/// What a strategy produced.
#[derive(Debug, Clone, PartialEq)]
pub enum BookValueRecords {
    /// Dated observations, forward-filled by the resolver.
    Dated(Vec<Observation>),
    /// A single value held constant over the whole span.
    Constant(f64),
}

impl BookValueRecords {
    fn is_empty(&self) -> bool {
        match self {
            Self::Dated(observations) => observations.is_empty(),
            Self::Constant(_) => false,
        }
    }
}

/// One source in the book-value waterfall.
///
/// Strategies are pure functions of the snapshot. Implementations should be
/// thread-safe (`Send + Sync`) so a resolver can be shared.
pub trait BookValueStrategy: Send + Sync + fmt::Debug {
    /// Source tag carried by points this strategy produces.
    fn source(&self) -> BookValueSource;

    /// Records for `ticker`, or `None` when the strategy does not apply.
    fn records(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<BookValueRecords>;
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Book value of the most recent snapshot, when finite and non-zero.
pub fn current_book_value(ticker: &Ticker, snapshot: &Snapshot) -> Option<f64> {
    snapshot
        .current_indicator(ticker)
        .and_then(|s| s.usable_book_value())
}

/// Historical fundamentals: the reported book value per share, else net
/// assets over the reported share count.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalDirect;

impl BookValueStrategy for HistoricalDirect {
    fn source(&self) -> BookValueSource {
        BookValueSource::YahooHistDirect
    }

    fn records(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<BookValueRecords> {
        let observations: Vec<Observation> = snapshot
            .fundamentals(ticker)
            .iter()
            .filter_map(|record| {
                let reported = record
                    .book_value_per_share
                    .filter(|v| v.is_finite() && *v != 0.0);
                let book_value_per_share = match reported {
                    Some(value) => value,
                    None => {
                        let net_assets = record.net_assets.filter(|v| v.is_finite())?;
                        net_assets / usable(record.shares_outstanding)?
                    }
                };
                Some(Observation {
                    date: record.date,
                    book_value_per_share,
                })
            })
            .collect();
        (!observations.is_empty()).then_some(BookValueRecords::Dated(observations))
    }
}

/// Historical fundamentals divided by a share count estimated from the most
/// recent snapshot (`net assets / book value per share`).
///
/// Applies only when no fundamentals record of the ticker has a usable share
/// count.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalEstimatedShares;

impl BookValueStrategy for HistoricalEstimatedShares {
    fn source(&self) -> BookValueSource {
        BookValueSource::YahooHistEstimatedShares
    }

    fn records(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<BookValueRecords> {
        let fundamentals = snapshot.fundamentals(ticker);
        if fundamentals.is_empty() || fundamentals.iter().any(|r| usable(r.shares_outstanding).is_some()) {
            return None;
        }

        let shares = snapshot
            .current_indicator(ticker)
            .and_then(|s| s.implied_shares())
            .filter(|s| s.is_finite() && *s > 0.0)?;

        let observations: Vec<Observation> = fundamentals
            .iter()
            .filter_map(|record| {
                let net_assets = record.net_assets.filter(|v| v.is_finite())?;
                Some(Observation {
                    date: record.date,
                    book_value_per_share: net_assets / shares,
                })
            })
            .collect();
        (!observations.is_empty()).then_some(BookValueRecords::Dated(observations))
    }
}

/// Oceans14 quarterly book value per share.
#[derive(Debug, Clone, Copy, Default)]
pub struct OceansQuarterly;

impl BookValueStrategy for OceansQuarterly {
    fn source(&self) -> BookValueSource {
        BookValueSource::Oceans14Quarterly
    }

    fn records(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<BookValueRecords> {
        let observations: Vec<Observation> = snapshot
            .quarterly(ticker)
            .iter()
            .filter_map(|row| {
                Some(Observation {
                    date: row.date,
                    book_value_per_share: row.book_value_per_share.filter(|v| v.is_finite())?,
                })
            })
            .collect();
        (!observations.is_empty()).then_some(BookValueRecords::Dated(observations))
    }
}

/// Book value of the most recent snapshot, held constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentFixed;

impl BookValueStrategy for CurrentFixed {
    fn source(&self) -> BookValueSource {
        BookValueSource::CurrentFixed
    }

    fn records(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<BookValueRecords> {
        current_book_value(ticker, snapshot).map(BookValueRecords::Constant)
    }
}

/// The waterfall in priority order.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn BookValueStrategy>> {
    vec![
        Box::new(HistoricalDirect),
        Box::new(HistoricalEstimatedShares),
        Box::new(OceansQuarterly),
        Box::new(CurrentFixed),
    ]
}

/// A resolved book-value series and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookValueResolution {
    /// Ticker (bare form).
    pub ticker: Ticker,
    /// Source of the winning strategy; `None` when nothing resolved.
    pub source_used: Option<BookValueSource>,
    /// Daily points over the requested span.
    pub series: ResolvedSeries<BookValuePoint>,
}

impl BookValueResolution {
    fn empty(ticker: Ticker) -> Self {
        Self {
            ticker,
            source_used: None,
            series: ResolvedSeries::default(),
        }
    }

    /// Whether no point was resolved.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Runs the book-value waterfall.
#[derive(Debug)]
pub struct BookValueResolver {
    strategies: Vec<Box<dyn BookValueStrategy>>,
}

impl Default for BookValueResolver {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl BookValueResolver {
    /// Create a resolver trying `strategies` in order.
    pub fn new(strategies: Vec<Box<dyn BookValueStrategy>>) -> Self {
        Self { strategies }
    }

    /// The strategies, in priority order.
    pub fn strategies(&self) -> &[Box<dyn BookValueStrategy>] {
        &self.strategies
    }

    /// First strategy that yields records.
    fn select(
        &self,
        ticker: &Ticker,
        snapshot: &Snapshot,
    ) -> Option<(BookValueSource, BookValueRecords)> {
        self.strategies.iter().find_map(|strategy| {
            let records = strategy.records(ticker, snapshot).filter(|r| !r.is_empty());
            if records.is_none() {
                debug!(%ticker, source = %strategy.source(), "book value strategy not applicable");
            }
            records.map(|r| (strategy.source(), r))
        })
    }

    /// Span covered by the dated records of the winning strategy.
    ///
    /// `None` when nothing resolves or the winner is a constant.
    pub fn observed_span(&self, ticker: &Ticker, snapshot: &Snapshot) -> Option<DateSpan> {
        match self.select(&ticker.bare(), snapshot)? {
            (_, BookValueRecords::Dated(observations)) => {
                DateSpan::covering(observations.iter().map(|o| o.date))
            }
            (_, BookValueRecords::Constant(_)) => None,
        }
    }

    /// Resolve the daily book value of `ticker` over `span`.
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::DegenerateDenominator`] when no strategy
    /// yields a usable value on any day of the span.
    pub fn try_resolve(
        &self,
        ticker: &Ticker,
        snapshot: &Snapshot,
        span: DateSpan,
    ) -> Result<BookValueResolution> {
        let ticker = ticker.bare();
        let Some((source, records)) = self.select(&ticker, snapshot) else {
            return Err(FiidexError::DegenerateDenominator(format!(
                "no book value source for {ticker}"
            )));
        };
        info!(%ticker, %source, "book value source selected");

        let points: Vec<BookValuePoint> = match records {
            BookValueRecords::Constant(value) => span
                .days()
                .map(|date| BookValuePoint {
                    date,
                    book_value_per_share: value,
                    source,
                })
                .collect(),
            BookValueRecords::Dated(observations) => {
                let observed = ResolvedSeries::from_points(observations);
                let leading = current_book_value(&ticker, snapshot);
                forward_fill_daily(&observed, span)
                    .into_iter()
                    .filter_map(|(date, observation)| match observation {
                        Some(o) => Some(BookValuePoint {
                            date,
                            book_value_per_share: o.book_value_per_share,
                            source,
                        }),
                        None => leading.map(|value| BookValuePoint {
                            date,
                            book_value_per_share: value,
                            source: BookValueSource::CurrentFixed,
                        }),
                    })
                    .collect()
            }
        };

        if points.is_empty() {
            return Err(FiidexError::DegenerateDenominator(format!(
                "no book value for {ticker} in span"
            )));
        }

        Ok(BookValueResolution {
            ticker,
            source_used: Some(source),
            series: ResolvedSeries::from_points(points),
        })
    }

    /// Resolve the daily book value of `ticker` over `span`; failures yield
    /// an empty resolution.
    pub fn resolve(&self, ticker: &Ticker, snapshot: &Snapshot, span: DateSpan) -> BookValueResolution {
        self.try_resolve(ticker, snapshot, span).unwrap_or_else(|err| {
            debug!(%ticker, error = %err, "book value unresolved");
            BookValueResolution::empty(ticker.bare())
        })
    }
}
