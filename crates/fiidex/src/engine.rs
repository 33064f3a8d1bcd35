//! The [`IndicatorEngine`] facade.

use fiidex_ingest::{DataPaths, LoadReport, load};
use fiidex_resolve::{
    BookValueResolution, Comparison, CoverageReport, DividendYieldHistory, DividendYieldResolver,
    PriceToBookEngine, PriceToBookSummary, quote_span, summarize, tickers,
};
use fiidex_traits::{
    FiidexError, LiveMarketData, OfflineMarketData, PriceToBookPoint, ResolvedSeries, Result,
    Snapshot, Ticker,
};
use tracing::debug;

/// Pull queries over one loaded [`Snapshot`].
///
/// The engine owns the snapshot, the load report describing how it was
/// built, and the live market-data provider used when a ticker has no local
/// distributions. Every query is a function of the ticker alone; nothing is
/// cached between calls.
#[derive(Debug)]
pub struct IndicatorEngine<L = OfflineMarketData> {
    snapshot: Snapshot,
    report: LoadReport,
    live: L,
    price_to_book: PriceToBookEngine,
}

impl IndicatorEngine<OfflineMarketData> {
    /// Engine over `snapshot` with the live fallback disabled.
    pub fn offline(snapshot: Snapshot) -> Self {
        Self::from_snapshot(snapshot, OfflineMarketData)
    }
}

impl<L: LiveMarketData> IndicatorEngine<L> {
    /// Load every extract under `paths`.
    ///
    /// Missing or unreadable sources never fail the load; they are recorded
    /// in [`IndicatorEngine::load_report`].
    pub fn load(paths: &DataPaths, live: L) -> Self {
        let (snapshot, report) = load(paths);
        debug!(tickers = snapshot.all_tickers().len(), "indicator engine ready");
        Self {
            snapshot,
            report,
            live,
            price_to_book: PriceToBookEngine::default(),
        }
    }

    /// Engine over an already-built snapshot.
    pub fn from_snapshot(snapshot: Snapshot, live: L) -> Self {
        Self {
            snapshot,
            report: LoadReport::default(),
            live,
            price_to_book: PriceToBookEngine::default(),
        }
    }

    /// Replace the P/VP engine (and with it the book-value waterfall).
    #[must_use]
    pub fn with_price_to_book(mut self, price_to_book: PriceToBookEngine) -> Self {
        self.price_to_book = price_to_book;
        self
    }

    /// The snapshot every query reads.
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// How the snapshot was loaded; empty for [`IndicatorEngine::from_snapshot`].
    pub const fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// The live provider.
    pub const fn live(&self) -> &L {
        &self.live
    }

    /// Known tickers: distribution and quote tickers, bare, sorted.
    pub fn tickers(&self) -> Vec<Ticker> {
        tickers(&self.snapshot)
    }

    /// Monthly dividend-yield history of `ticker`.
    ///
    /// # Errors
    ///
    /// See [`DividendYieldResolver::try_resolve`].
    pub async fn try_dividend_yield_history(&self, ticker: &Ticker) -> Result<DividendYieldHistory> {
        DividendYieldResolver::new(&self.snapshot, &self.live)
            .try_resolve(ticker)
            .await
    }

    /// Monthly dividend-yield history of `ticker`; empty when unavailable.
    pub async fn dividend_yield_history(&self, ticker: &Ticker) -> DividendYieldHistory {
        DividendYieldResolver::new(&self.snapshot, &self.live)
            .resolve(ticker)
            .await
    }

    /// Daily P/VP of `ticker`.
    ///
    /// # Errors
    ///
    /// See [`PriceToBookEngine::try_daily`].
    pub fn try_price_to_book_daily(&self, ticker: &Ticker) -> Result<ResolvedSeries<PriceToBookPoint>> {
        self.price_to_book.try_daily(ticker, &self.snapshot)
    }

    /// Daily P/VP of `ticker`; empty when unavailable.
    pub fn price_to_book_daily(&self, ticker: &Ticker) -> ResolvedSeries<PriceToBookPoint> {
        self.price_to_book.daily(ticker, &self.snapshot)
    }

    /// Monthly P/VP of `ticker`.
    ///
    /// # Errors
    ///
    /// See [`PriceToBookEngine::try_monthly`].
    pub fn try_price_to_book_monthly(&self, ticker: &Ticker) -> Result<ResolvedSeries<PriceToBookPoint>> {
        self.price_to_book.try_monthly(ticker, &self.snapshot)
    }

    /// Monthly P/VP of `ticker`; empty when unavailable.
    pub fn price_to_book_monthly(&self, ticker: &Ticker) -> ResolvedSeries<PriceToBookPoint> {
        self.price_to_book.monthly(ticker, &self.snapshot)
    }

    /// Latest monthly P/VP reading of `ticker`.
    pub fn price_to_book_summary(&self, ticker: &Ticker) -> Option<PriceToBookSummary> {
        summarize(&self.price_to_book_monthly(ticker))
    }

    /// Daily book value of `ticker`.
    ///
    /// The series covers the ticker's quote span, or the span of the winning
    /// source's own records when the ticker has no quotes.
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::NoData`] when neither span exists, otherwise
    /// see [`fiidex_resolve::BookValueResolver::try_resolve`].
    pub fn try_book_value_series(&self, ticker: &Ticker) -> Result<BookValueResolution> {
        let resolver = self.price_to_book.book_values();
        let span = quote_span(&ticker.bare(), &self.snapshot)
            .or_else(|| resolver.observed_span(ticker, &self.snapshot))
            .ok_or_else(|| FiidexError::NoData(ticker.bare().to_string()))?;
        resolver.try_resolve(ticker, &self.snapshot, span)
    }

    /// Per-ticker coverage across every source.
    pub fn coverage(&self) -> CoverageReport {
        CoverageReport::from_snapshot(&self.snapshot)
    }

    /// Dividend yield against monthly P/VP for `ticker`.
    pub async fn compare(&self, ticker: &Ticker) -> Comparison {
        let dividend_yield = self.dividend_yield_history(ticker).await;
        Comparison::new(&dividend_yield.series, &self.price_to_book_monthly(ticker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fiidex_resolve::DividendYieldOrigin;
    use fiidex_traits::{
        BookValueSource, Date, DistributionEvent, DividendPayment, IndicatorSnapshot, LiveHistory,
        PriceQuote, QuarterlyBookValue,
    };

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn quote(ticker: &str, date: Date, close: f64) -> PriceQuote {
        PriceQuote {
            ticker: Ticker::new(ticker),
            date,
            close,
        }
    }

    #[derive(Debug)]
    struct FixedMarketData(LiveHistory);

    impl LiveMarketData for FixedMarketData {
        async fn fetch_history(&self, _symbol: &str) -> Result<LiveHistory> {
            Ok(self.0.clone())
        }
    }

    fn sample() -> Snapshot {
        Snapshot::builder()
            .distributions([DistributionEvent {
                ticker: Ticker::new("HGLG11"),
                date: d(2024, 1, 31),
                dividend: 1.2,
                price_at_date: Some(120.0),
                dy_monthly: None,
            }])
            .quotes([
                quote("HGLG11.SA", d(2024, 1, 2), 12.0),
                quote("HGLG11", d(2024, 1, 31), 12.0),
                quote("HGLG11", d(2024, 2, 1), 8.0),
                quote("XPTO11", d(2023, 1, 2), 100.0),
                quote("XPTO11", d(2023, 2, 1), 102.0),
            ])
            .indicators([IndicatorSnapshot {
                ticker: Ticker::new("HGLG11"),
                timestamp: d(2024, 5, 1).and_hms_opt(0, 0, 0).unwrap(),
                book_value_per_share: Some(10.0),
                net_assets: None,
            }])
            .build()
    }

    #[test]
    fn test_tickers_and_coverage() {
        let engine = IndicatorEngine::offline(sample());
        let names: Vec<String> = engine.tickers().iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["HGLG11", "XPTO11"]);
        assert_eq!(engine.coverage().rows[0].ticker.as_str(), "HGLG11");
        assert!(engine.load_report().sources.is_empty());
    }

    #[test]
    fn test_price_to_book_queries() {
        let engine = IndicatorEngine::offline(sample());
        let ticker = Ticker::new("hglg11");

        let daily = engine.price_to_book_daily(&ticker);
        let ratios: Vec<f64> = daily.iter().map(|p| p.price_to_book).collect();
        assert_eq!(ratios.len(), 3);
        assert_relative_eq!(ratios[2], 0.8);

        let monthly = engine.price_to_book_monthly(&ticker);
        assert_eq!(monthly.dates().collect::<Vec<_>>(), vec![d(2024, 1, 31), d(2024, 2, 29)]);

        let summary = engine.price_to_book_summary(&ticker).unwrap();
        assert_relative_eq!(summary.price_to_book, 0.8);
        assert!(!summary.historical_book_value);

        assert!(engine.price_to_book_daily(&Ticker::new("XPTO11")).is_empty());
        assert!(matches!(
            engine.try_price_to_book_daily(&Ticker::new("XPTO11")),
            Err(FiidexError::DegenerateDenominator(_))
        ));
    }

    #[test]
    fn test_book_value_series_without_quotes_uses_observed_span() {
        let snapshot = Snapshot::builder()
            .quarterly([
                QuarterlyBookValue {
                    ticker: Ticker::new("KNRI11"),
                    quarter: "1T2023".to_string(),
                    date: d(2023, 3, 31),
                    book_value_per_share: Some(150.0),
                    price_to_book: None,
                },
                QuarterlyBookValue {
                    ticker: Ticker::new("KNRI11"),
                    quarter: "2T2023".to_string(),
                    date: d(2023, 6, 30),
                    book_value_per_share: Some(155.0),
                    price_to_book: None,
                },
            ])
            .build();
        let engine = IndicatorEngine::offline(snapshot);

        let resolution = engine.try_book_value_series(&Ticker::new("KNRI11")).unwrap();
        assert_eq!(resolution.source_used, Some(BookValueSource::Oceans14Quarterly));
        assert_eq!(resolution.series.len(), 92);
        assert_eq!(resolution.series.last().unwrap().book_value_per_share, 155.0);

        assert!(matches!(
            engine.try_book_value_series(&Ticker::new("NONE11")),
            Err(FiidexError::NoData(_))
        ));
    }

    #[tokio::test]
    async fn test_dividend_yield_local_and_offline() {
        let engine = IndicatorEngine::offline(sample());

        let local = engine.dividend_yield_history(&Ticker::new("HGLG11")).await;
        assert_eq!(local.origin, DividendYieldOrigin::Local);
        assert_relative_eq!(local.series.points()[0].dy_monthly.unwrap(), 1.0);

        let offline = engine.dividend_yield_history(&Ticker::new("XPTO11")).await;
        assert_eq!(offline.origin, DividendYieldOrigin::Unavailable);
        assert!(matches!(
            engine.try_dividend_yield_history(&Ticker::new("XPTO11")).await,
            Err(FiidexError::RemoteFallback { .. })
        ));
    }

    #[tokio::test]
    async fn test_dividend_yield_live_fallback_and_compare() {
        let live = FixedMarketData(LiveHistory {
            symbol: "XPTO11.SA".to_string(),
            dividends: vec![DividendPayment {
                date: d(2023, 1, 15),
                amount: 1.0,
            }],
            prices: Vec::new(),
        });
        let engine = IndicatorEngine::from_snapshot(sample(), live);

        let history = engine.dividend_yield_history(&Ticker::new("XPTO11")).await;
        assert_eq!(history.origin, DividendYieldOrigin::Live);
        assert_eq!(history.series.points()[0].price_at_date, Some(100.0));

        let comparison = engine.compare(&Ticker::new("XPTO11")).await;
        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(comparison.rows.points()[0].price_to_book, None);

        let comparison = engine.compare(&Ticker::new("HGLG11")).await;
        let dates: Vec<Date> = comparison.rows.dates().collect();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 29)]);
        assert_relative_eq!(comparison.rows.points()[0].dy_monthly.unwrap(), 1.0);
        assert_relative_eq!(comparison.rows.points()[0].price_to_book.unwrap(), 1.2);
    }
}
