//! Immutable in-memory snapshot of every normalized dataset.
//!
//! A [`Snapshot`] is built once (by the ingest loader or by hand in tests)
//! and then only read. All tables are grouped by the bare ticker, so quotes
//! written as `HGLG11` and `HGLG11.SA` land under the same key.

use crate::types::{
    DistributionEvent, FundamentalsRecord, IndicatorSnapshot, PriceQuote, QuarterlyBookValue,
    Ticker,
};
use std::collections::{BTreeSet, HashMap};

/// Normalized datasets grouped by ticker.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    distributions: HashMap<Ticker, Vec<DistributionEvent>>,
    indicators: HashMap<Ticker, Vec<IndicatorSnapshot>>,
    quotes: HashMap<Ticker, Vec<PriceQuote>>,
    quarterly: HashMap<Ticker, Vec<QuarterlyBookValue>>,
    fundamentals: HashMap<Ticker, Vec<FundamentalsRecord>>,
}

impl Snapshot {
    /// Start building a snapshot.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Distribution events for a ticker, in source order.
    pub fn distributions(&self, ticker: &Ticker) -> &[DistributionEvent] {
        lookup(&self.distributions, ticker)
    }

    /// Every indicator snapshot recorded for a ticker.
    pub fn indicators(&self, ticker: &Ticker) -> &[IndicatorSnapshot] {
        lookup(&self.indicators, ticker)
    }

    /// The most recent indicator snapshot for a ticker.
    ///
    /// Ties on the timestamp resolve to the row loaded last.
    pub fn current_indicator(&self, ticker: &Ticker) -> Option<&IndicatorSnapshot> {
        self.indicators(ticker).iter().max_by_key(|s| s.timestamp)
    }

    /// Daily quotes for a ticker under both its bare and suffixed spelling.
    pub fn quotes(&self, ticker: &Ticker) -> &[PriceQuote] {
        lookup(&self.quotes, ticker)
    }

    /// Oceans14 quarterly rows for a ticker.
    pub fn quarterly(&self, ticker: &Ticker) -> &[QuarterlyBookValue] {
        lookup(&self.quarterly, ticker)
    }

    /// Historical fundamentals for a ticker.
    pub fn fundamentals(&self, ticker: &Ticker) -> &[FundamentalsRecord] {
        lookup(&self.fundamentals, ticker)
    }

    /// Tickers with at least one distribution event.
    pub fn distribution_tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.distributions.keys()
    }

    /// Tickers with at least one quote.
    pub fn quote_tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.quotes.keys()
    }

    /// Every ticker present in any dataset, sorted.
    pub fn all_tickers(&self) -> BTreeSet<Ticker> {
        self.distributions
            .keys()
            .chain(self.indicators.keys())
            .chain(self.quotes.keys())
            .chain(self.quarterly.keys())
            .chain(self.fundamentals.keys())
            .cloned()
            .collect()
    }

    /// Whether every dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
            && self.indicators.is_empty()
            && self.quotes.is_empty()
            && self.quarterly.is_empty()
            && self.fundamentals.is_empty()
    }
}

fn lookup<'a, T>(table: &'a HashMap<Ticker, Vec<T>>, ticker: &Ticker) -> &'a [T] {
    table.get(&ticker.bare()).map_or(&[], Vec::as_slice)
}

fn group<T>(
    table: &mut HashMap<Ticker, Vec<T>>,
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> &Ticker,
) {
    for row in rows {
        table.entry(key(&row).bare()).or_default().push(row);
    }
}

/// Builder for [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Add distribution events.
    #[must_use]
    pub fn distributions(mut self, rows: impl IntoIterator<Item = DistributionEvent>) -> Self {
        group(&mut self.snapshot.distributions, rows, |r| &r.ticker);
        self
    }

    /// Add indicator snapshots.
    #[must_use]
    pub fn indicators(mut self, rows: impl IntoIterator<Item = IndicatorSnapshot>) -> Self {
        group(&mut self.snapshot.indicators, rows, |r| &r.ticker);
        self
    }

    /// Add daily quotes.
    #[must_use]
    pub fn quotes(mut self, rows: impl IntoIterator<Item = PriceQuote>) -> Self {
        group(&mut self.snapshot.quotes, rows, |r| &r.ticker);
        self
    }

    /// Add Oceans14 quarterly rows.
    #[must_use]
    pub fn quarterly(mut self, rows: impl IntoIterator<Item = QuarterlyBookValue>) -> Self {
        group(&mut self.snapshot.quarterly, rows, |r| &r.ticker);
        self
    }

    /// Add historical fundamentals.
    #[must_use]
    pub fn fundamentals(mut self, rows: impl IntoIterator<Item = FundamentalsRecord>) -> Self {
        group(&mut self.snapshot.fundamentals, rows, |r| &r.ticker);
        self
    }

    /// Finish building.
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
