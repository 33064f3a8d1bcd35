//! Cross-source reports: ticker discovery, data coverage, and the DY versus
//! P/VP comparison table.

use fiidex_traits::{
    Date, Dated, DividendYieldPoint, PriceToBookPoint, ResolvedSeries, Result, Snapshot, Ticker,
    ToFrame,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tickers with distributions or quotes, bare, sorted and unique.
pub fn tickers(snapshot: &Snapshot) -> Vec<Ticker> {
    snapshot
        .distribution_tickers()
        .chain(snapshot.quote_tickers())
        .map(Ticker::bare)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// How much data each source holds for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// Ticker (bare).
    pub ticker: Ticker,
    /// Distribution records.
    pub distributions: usize,
    /// Distinct quote days.
    pub quote_days: usize,
    /// Historical fundamentals records.
    pub fundamentals: usize,
    /// Quarterly book-value rows.
    pub quarterly: usize,
    /// Whether a current indicator snapshot exists.
    pub has_snapshot: bool,
    /// First quote day.
    pub first_quote: Option<Date>,
    /// Last quote day.
    pub last_quote: Option<Date>,
}

/// Per-ticker coverage, most distributions first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// One row per ticker.
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    /// Build the report over every ticker of `snapshot`.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut rows: Vec<CoverageRow> = snapshot
            .all_tickers()
            .into_iter()
            .map(|ticker| {
                let quote_days: BTreeSet<Date> =
                    snapshot.quotes(&ticker).iter().map(|q| q.date).collect();
                CoverageRow {
                    distributions: snapshot.distributions(&ticker).len(),
                    quote_days: quote_days.len(),
                    fundamentals: snapshot.fundamentals(&ticker).len(),
                    quarterly: snapshot.quarterly(&ticker).len(),
                    has_snapshot: snapshot.current_indicator(&ticker).is_some(),
                    first_quote: quote_days.first().copied(),
                    last_quote: quote_days.last().copied(),
                    ticker,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.distributions
                .cmp(&a.distributions)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        Self { rows }
    }

    /// Keep the first `n` rows.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }
}

impl ToFrame for CoverageReport {
    fn to_frame(&self) -> Result<DataFrame> {
        let rows = &self.rows;
        Ok(df! {
            "ticker" => rows.iter().map(|r| r.ticker.as_str()).collect::<Vec<&str>>(),
            "distributions" => rows.iter().map(|r| r.distributions as u64).collect::<Vec<u64>>(),
            "quote_days" => rows.iter().map(|r| r.quote_days as u64).collect::<Vec<u64>>(),
            "fundamentals" => rows.iter().map(|r| r.fundamentals as u64).collect::<Vec<u64>>(),
            "quarterly" => rows.iter().map(|r| r.quarterly as u64).collect::<Vec<u64>>(),
            "has_snapshot" => rows.iter().map(|r| r.has_snapshot).collect::<Vec<bool>>(),
            "first_quote" => rows.iter().map(|r| r.first_quote).collect::<Vec<Option<Date>>>(),
            "last_quote" => rows.iter().map(|r| r.last_quote).collect::<Vec<Option<Date>>>(),
        }?)
    }
}

/// One date of the DY versus P/VP comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Date (distribution base date or P/VP month end).
    pub date: Date,
    /// Monthly dividend yield, in percent.
    pub dy_monthly: Option<f64>,
    /// Monthly P/VP.
    pub price_to_book: Option<f64>,
}

impl Dated for ComparisonRow {
    fn date(&self) -> Date {
        self.date
    }
}

/// Outer join of a DY history and a monthly P/VP series on date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Rows ascending by date; rows with both metrics missing are dropped.
    pub rows: ResolvedSeries<ComparisonRow>,
}

impl Comparison {
    /// Join `dividend_yield` and `price_to_book` on date.
    pub fn new(
        dividend_yield: &ResolvedSeries<DividendYieldPoint>,
        price_to_book: &ResolvedSeries<PriceToBookPoint>,
    ) -> Self {
        let mut by_date: BTreeMap<Date, ComparisonRow> = BTreeMap::new();
        for point in dividend_yield {
            by_date
                .entry(point.date)
                .or_insert_with(|| empty_row(point.date))
                .dy_monthly = point.dy_monthly;
        }
        for point in price_to_book {
            by_date
                .entry(point.date)
                .or_insert_with(|| empty_row(point.date))
                .price_to_book = Some(point.price_to_book);
        }

        let rows = by_date
            .into_values()
            .filter(|row| row.dy_monthly.is_some() || row.price_to_book.is_some())
            .collect();
        Self {
            rows: ResolvedSeries::from_points(rows),
        }
    }

    /// Whether the comparison has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const fn empty_row(date: Date) -> ComparisonRow {
    ComparisonRow {
        date,
        dy_monthly: None,
        price_to_book: None,
    }
}

impl ToFrame for Comparison {
    fn to_frame(&self) -> Result<DataFrame> {
        let rows = self.rows.points();
        Ok(df! {
            "date" => rows.iter().map(|r| r.date).collect::<Vec<Date>>(),
            "dy_monthly" => rows.iter().map(|r| r.dy_monthly).collect::<Vec<Option<f64>>>(),
            "price_to_book" => rows.iter().map(|r| r.price_to_book).collect::<Vec<Option<f64>>>(),
        }?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiidex_traits::{DistributionEvent, IndicatorSnapshot, PriceQuote};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn quote(ticker: &str, date: Date) -> PriceQuote {
        PriceQuote {
            ticker: Ticker::new(ticker),
            date,
            close: 10.0,
        }
    }

    fn event(ticker: &str, date: Date) -> DistributionEvent {
        DistributionEvent {
            ticker: Ticker::new(ticker),
            date,
            dividend: 0.1,
            price_at_date: Some(10.0),
            dy_monthly: None,
        }
    }

    fn sample() -> Snapshot {
        Snapshot::builder()
            .distributions([
                event("KNRI11", d(2024, 1, 31)),
                event("HGLG11", d(2024, 1, 31)),
                event("HGLG11", d(2024, 2, 29)),
            ])
            .quotes([
                quote("HGLG11.SA", d(2024, 1, 2)),
                quote("HGLG11", d(2024, 1, 2)),
                quote("HGLG11", d(2024, 1, 5)),
                quote("MXRF11.SA", d(2024, 1, 3)),
            ])
            .indicators([IndicatorSnapshot {
                ticker: Ticker::new("XPML11"),
                timestamp: d(2024, 5, 1).and_hms_opt(0, 0, 0).unwrap(),
                book_value_per_share: Some(100.0),
                net_assets: None,
            }])
            .build()
    }

    #[test]
    fn test_tickers_union_without_suffix() {
        let names: Vec<String> = tickers(&sample()).iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["HGLG11", "KNRI11", "MXRF11"]);
    }

    #[test]
    fn test_coverage_order_and_counts() {
        let report = CoverageReport::from_snapshot(&sample());
        let order: Vec<&str> = report.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["HGLG11", "KNRI11", "MXRF11", "XPML11"]);

        let hglg = &report.rows[0];
        assert_eq!(hglg.distributions, 2);
        assert_eq!(hglg.quote_days, 2);
        assert_eq!(hglg.first_quote, Some(d(2024, 1, 2)));
        assert_eq!(hglg.last_quote, Some(d(2024, 1, 5)));
        assert!(!hglg.has_snapshot);
        assert!(report.rows[3].has_snapshot);

        let top = report.top(1);
        assert_eq!(top.rows.len(), 1);
        assert_eq!(top.to_frame().unwrap().height(), 1);
    }

    #[test]
    fn test_comparison_outer_join() {
        let dy = ResolvedSeries::from_points(vec![
            DividendYieldPoint {
                date: d(2024, 1, 31),
                dividend: 1.0,
                price_at_date: Some(100.0),
                dy_monthly: Some(1.0),
            },
            DividendYieldPoint {
                date: d(2024, 2, 15),
                dividend: 1.0,
                price_at_date: None,
                dy_monthly: None,
            },
        ]);
        let pvp = ResolvedSeries::from_points(vec![
            PriceToBookPoint {
                date: d(2024, 1, 31),
                close: 12.0,
                book_value_used: 10.0,
                price_to_book: 1.2,
            },
            PriceToBookPoint {
                date: d(2024, 2, 29),
                close: 8.0,
                book_value_used: 10.0,
                price_to_book: 0.8,
            },
        ]);

        let comparison = Comparison::new(&dy, &pvp);
        let rows = comparison.rows.points();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ComparisonRow {
            date: d(2024, 1, 31),
            dy_monthly: Some(1.0),
            price_to_book: Some(1.2),
        });
        assert_eq!(rows[1].date, d(2024, 2, 29));
        assert_eq!(rows[1].dy_monthly, None);

        let frame = comparison.to_frame().unwrap();
        assert_eq!(frame.column("dy_monthly").unwrap().null_count(), 1);
    }

    #[test]
    fn test_comparison_of_empty_inputs() {
        let comparison = Comparison::new(&ResolvedSeries::default(), &ResolvedSeries::default());
        assert!(comparison.is_empty());
    }
}
