//! Price-to-book command implementation.

use crate::output::{OutputFormat, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{
    IndicatorEngine, LiveMarketData, PriceToBookSummary, Ticker,
    resolve::summarize,
    traits::{PriceToBookPoint, ResolvedSeries},
};
use serde::Serialize;

#[derive(Serialize)]
struct MonthlyOutput<'a> {
    ticker: &'a Ticker,
    summary: Option<PriceToBookSummary>,
    series: &'a ResolvedSeries<PriceToBookPoint>,
}

/// Print the daily or monthly P/VP of `ticker`.
pub(crate) fn run<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    ticker: &Ticker,
    monthly: bool,
    format: OutputFormat,
) -> Result<()> {
    let ticker = ticker.bare();
    let series = if monthly {
        engine.price_to_book_monthly(&ticker)
    } else {
        engine.price_to_book_daily(&ticker)
    };
    let summary = monthly.then(|| summarize(&series)).flatten();

    match format {
        OutputFormat::Json if monthly => print_json(&MonthlyOutput {
            ticker: &ticker,
            summary,
            series: &series,
        }),
        OutputFormat::Json => print_json(&series),
        OutputFormat::Csv => print_csv(&series),
        OutputFormat::Text => {
            let cadence = if monthly { "MONTHLY" } else { "DAILY" };
            header(&format!("{cadence} P/VP: {ticker}"));

            if series.is_empty() {
                println!("No P/VP for {ticker}: missing quotes or book value.");
                return Ok(());
            }

            println!("{:<12} {:>10} {:>12} {:>8}", "Date", "Close", "Book value", "P/VP");
            println!("{}", "-".repeat(45));
            for point in &series {
                println!(
                    "{:<12} {:>10.2} {:>12.2} {:>8.4}",
                    point.date.to_string(), point.close, point.book_value_used, point.price_to_book
                );
            }

            if let Some(summary) = summary {
                println!();
                println!("Latest ({}):", summary.date);
                println!("  P/VP:         {:>10.4}", summary.price_to_book);
                println!("  Close:        {:>10.2}", summary.close);
                println!("  Book value:   {:>10.2}", summary.book_value);
                println!(
                    "  Book value is {}",
                    if summary.historical_book_value {
                        "historical"
                    } else {
                        "fixed (current snapshot)"
                    }
                );
            }
            Ok(())
        }
    }
}
