//! Dividend-yield history resolution.
//!
//! Local distribution records are the primary source. When a ticker has
//! none, the resolver asks a [`LiveMarketData`] provider for the full
//! dividend and price history and pairs each dividend with the latest price
//! at or before its date.

use crate::fill::as_of_join;
use fiidex_traits::{
    DividendYieldPoint, FiidexError, LiveHistory, LiveMarketData, PriceQuote, ResolvedSeries,
    Result, Snapshot, Ticker,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Monthly dividend yield in percent: `dividend / price * 100`.
///
/// Non-positive prices yield `0.0` instead of a division by zero.
pub fn dy_monthly(dividend: f64, price: f64) -> f64 {
    if price > 0.0 {
        (dividend / price) * 100.0
    } else {
        0.0
    }
}

/// Where a dividend-yield history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividendYieldOrigin {
    /// Local distribution records.
    Local,
    /// Live provider fallback.
    Live,
    /// Neither source produced rows.
    Unavailable,
}

/// A resolved dividend-yield history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendYieldHistory {
    /// Ticker the history belongs to (bare form).
    pub ticker: Ticker,
    /// Source of the rows.
    pub origin: DividendYieldOrigin,
    /// Rows, ascending by date.
    pub series: ResolvedSeries<DividendYieldPoint>,
}

impl DividendYieldHistory {
    /// An empty history.
    pub fn unavailable(ticker: Ticker) -> Self {
        Self {
            ticker,
            origin: DividendYieldOrigin::Unavailable,
            series: ResolvedSeries::default(),
        }
    }

    /// Whether the history has no rows.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Dividend-yield rows from local distribution records.
///
/// Records without a reported yield get one computed from their dividend
/// and price when both are present.
pub fn local_history(ticker: &Ticker, snapshot: &Snapshot) -> ResolvedSeries<DividendYieldPoint> {
    let points = snapshot
        .distributions(ticker)
        .iter()
        .map(|event| DividendYieldPoint {
            date: event.date,
            dividend: event.dividend,
            price_at_date: event.price_at_date,
            dy_monthly: event
                .dy_monthly
                .or_else(|| event.price_at_date.map(|price| dy_monthly(event.dividend, price))),
        })
        .collect();
    ResolvedSeries::from_points(points)
}

/// Dividend-yield rows from a live history.
///
/// Each dividend takes the latest price dated on or before it, from the
/// provider's prices or, when the provider sent none, from `local_prices`.
/// Dividends with no such price are dropped.
pub fn live_history(
    history: &LiveHistory,
    local_prices: &[PriceQuote],
) -> ResolvedSeries<DividendYieldPoint> {
    let prices = if history.prices.is_empty() {
        ResolvedSeries::from_points(local_prices.to_vec())
    } else {
        ResolvedSeries::from_points(history.prices.clone())
    };

    let mut dividends = history.dividends.clone();
    dividends.sort_by_key(|d| d.date);

    let points = dividends
        .iter()
        .zip(as_of_join(&prices, dividends.iter().map(|d| d.date)))
        .filter_map(|(dividend, (_, price))| {
            let price = price?.close;
            Some(DividendYieldPoint {
                date: dividend.date,
                dividend: dividend.amount,
                price_at_date: Some(price),
                dy_monthly: Some(dy_monthly(dividend.amount, price)),
            })
        })
        .collect();
    ResolvedSeries::from_points(points)
}

/// Resolves dividend-yield histories from a snapshot and a live provider.
#[derive(Debug)]
pub struct DividendYieldResolver<'a, L> {
    snapshot: &'a Snapshot,
    live: &'a L,
}

impl<'a, L: LiveMarketData> DividendYieldResolver<'a, L> {
    /// Create a resolver over `snapshot`, falling back to `live`.
    pub const fn new(snapshot: &'a Snapshot, live: &'a L) -> Self {
        Self { snapshot, live }
    }

    /// Resolve the history of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::RemoteFallback`] when the ticker has no local
    /// rows and the live provider fails, or [`FiidexError::NoData`] when
    /// neither source produced a row.
    pub async fn try_resolve(&self, ticker: &Ticker) -> Result<DividendYieldHistory> {
        let ticker = ticker.bare();

        let local = local_history(&ticker, self.snapshot);
        if !local.is_empty() {
            debug!(%ticker, rows = local.len(), "dividend yield from local records");
            return Ok(DividendYieldHistory {
                ticker,
                origin: DividendYieldOrigin::Local,
                series: local,
            });
        }

        let symbol = ticker.with_exchange_suffix();
        info!(%ticker, %symbol, "no local distributions, using live fallback");
        let history = self.live.fetch_history(&symbol).await?;
        let series = live_history(&history, self.snapshot.quotes(&ticker));
        if series.is_empty() {
            return Err(FiidexError::NoData(ticker.to_string()));
        }

        Ok(DividendYieldHistory {
            ticker,
            origin: DividendYieldOrigin::Live,
            series,
        })
    }

    /// Resolve the history of `ticker`; failures yield an empty history.
    pub async fn resolve(&self, ticker: &Ticker) -> DividendYieldHistory {
        match self.try_resolve(ticker).await {
            Ok(history) => history,
            Err(err) => {
                if err.is_no_data() {
                    debug!(%ticker, "no dividend yield data");
                } else {
                    warn!(%ticker, error = %err, "dividend yield resolution failed");
                }
                DividendYieldHistory::unavailable(ticker.bare())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fiidex_traits::{Date, DistributionEvent, DividendPayment, OfflineMarketData};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(ticker: &str, date: Date, dividend: f64, price: Option<f64>, dy: Option<f64>) -> DistributionEvent {
        DistributionEvent {
            ticker: Ticker::new(ticker),
            date,
            dividend,
            price_at_date: price,
            dy_monthly: dy,
        }
    }

    fn quote(ticker: &str, date: Date, close: f64) -> PriceQuote {
        PriceQuote {
            ticker: Ticker::new(ticker),
            date,
            close,
        }
    }

    /// In-memory provider that counts calls.
    #[derive(Debug, Default)]
    struct StubMarketData {
        history: LiveHistory,
        calls: AtomicUsize,
    }

    impl LiveMarketData for StubMarketData {
        async fn fetch_history(&self, symbol: &str) -> Result<LiveHistory> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LiveHistory {
                symbol: symbol.to_string(),
                ..self.history.clone()
            })
        }
    }

    #[test]
    fn test_dy_formula() {
        assert_relative_eq!(dy_monthly(1.1, 110.0), 1.0);
        assert_eq!(dy_monthly(1.0, 0.0), 0.0);
        assert_eq!(dy_monthly(1.0, -5.0), 0.0);
        assert_eq!(dy_monthly(0.8, 160.0), 0.8 / 160.0 * 100.0);
    }

    #[test]
    fn test_local_history_sorted_and_computed() {
        let snapshot = Snapshot::builder()
            .distributions([
                event("HGLG11", d(2024, 2, 29), 1.1, Some(110.0), None),
                event("HGLG11", d(2024, 1, 31), 1.1, Some(160.0), Some(0.69)),
                event("HGLG11", d(2023, 12, 29), 1.0, None, None),
                event("HGLG11", d(2023, 11, 30), 1.0, Some(0.0), None),
            ])
            .build();

        let series = local_history(&Ticker::new("HGLG11"), &snapshot);
        let dates: Vec<Date> = series.dates().collect();
        assert_eq!(dates, vec![d(2023, 11, 30), d(2023, 12, 29), d(2024, 1, 31), d(2024, 2, 29)]);

        let points = series.points();
        assert_eq!(points[0].dy_monthly, Some(0.0));
        assert_eq!(points[1].dy_monthly, None);
        assert_eq!(points[2].dy_monthly, Some(0.69));
        assert_relative_eq!(points[3].dy_monthly.unwrap(), 1.0);
    }

    #[test]
    fn test_local_history_duplicate_date_last_wins() {
        let snapshot = Snapshot::builder()
            .distributions([
                event("HGLG11", d(2024, 1, 31), 1.0, Some(100.0), None),
                event("HGLG11", d(2024, 1, 31), 1.2, Some(100.0), None),
            ])
            .build();

        let series = local_history(&Ticker::new("HGLG11"), &snapshot);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].dividend, 1.2);
    }

    #[tokio::test]
    async fn test_local_records_skip_live_provider() {
        let snapshot = Snapshot::builder()
            .distributions([event("HGLG11", d(2024, 1, 31), 1.1, Some(110.0), None)])
            .build();
        let live = StubMarketData::default();

        let history = DividendYieldResolver::new(&snapshot, &live)
            .try_resolve(&Ticker::new("HGLG11"))
            .await
            .unwrap();

        assert_eq!(history.origin, DividendYieldOrigin::Local);
        assert_eq!(history.series.len(), 1);
        assert_eq!(live.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_live_fallback_uses_local_quotes_when_provider_has_no_prices() {
        // XPTO11: no local distributions, local quotes, one live dividend.
        let snapshot = Snapshot::builder()
            .quotes([
                quote("XPTO11", d(2023, 1, 2), 100.0),
                quote("XPTO11", d(2023, 2, 1), 102.0),
            ])
            .build();
        let live = StubMarketData {
            history: LiveHistory {
                symbol: String::new(),
                dividends: vec![DividendPayment {
                    date: d(2023, 1, 15),
                    amount: 1.0,
                }],
                prices: Vec::new(),
            },
            calls: AtomicUsize::new(0),
        };

        let history = DividendYieldResolver::new(&snapshot, &live)
            .try_resolve(&Ticker::new("XPTO11"))
            .await
            .unwrap();

        assert_eq!(history.origin, DividendYieldOrigin::Live);
        assert_eq!(
            history.series.points(),
            &[DividendYieldPoint {
                date: d(2023, 1, 15),
                dividend: 1.0,
                price_at_date: Some(100.0),
                dy_monthly: Some(1.0),
            }]
        );
        assert_eq!(live.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_live_history_prefers_provider_prices_and_drops_unpriced() {
        let history = LiveHistory {
            symbol: "XPTO11.SA".to_string(),
            dividends: vec![
                DividendPayment {
                    date: d(2023, 3, 15),
                    amount: 1.0,
                },
                DividendPayment {
                    date: d(2022, 12, 15),
                    amount: 0.9,
                },
            ],
            prices: vec![
                quote("XPTO11.SA", d(2023, 3, 17), 90.0),
                quote("XPTO11.SA", d(2023, 3, 12), 80.0),
            ],
        };
        let local = [quote("XPTO11", d(2022, 12, 1), 1000.0)];

        let series = live_history(&history, &local);
        assert_eq!(series.len(), 1);
        let point = series.points()[0];
        assert_eq!(point.date, d(2023, 3, 15));
        assert_eq!(point.price_at_date, Some(80.0));
        assert_relative_eq!(point.dy_monthly.unwrap(), 1.25);
    }

    #[tokio::test]
    async fn test_offline_failure_is_typed_and_lenient_form_is_empty() {
        let snapshot = Snapshot::default();
        let live = OfflineMarketData;
        let resolver = DividendYieldResolver::new(&snapshot, &live);

        let err = resolver.try_resolve(&Ticker::new("XPTO11")).await.unwrap_err();
        assert!(matches!(err, FiidexError::RemoteFallback { ref symbol, .. } if symbol == "XPTO11.SA"));

        let history = resolver.resolve(&Ticker::new("XPTO11")).await;
        assert!(history.is_empty());
        assert_eq!(history.origin, DividendYieldOrigin::Unavailable);
    }

    #[tokio::test]
    async fn test_live_without_dividends_is_no_data() {
        let snapshot = Snapshot::default();
        let live = StubMarketData::default();

        let err = DividendYieldResolver::new(&snapshot, &live)
            .try_resolve(&Ticker::new("XPTO11.SA"))
            .await
            .unwrap_err();
        assert!(err.is_no_data());
    }
}
