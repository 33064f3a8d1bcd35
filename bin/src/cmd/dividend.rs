//! Dividend-yield history command implementation.

use crate::output::{OutputFormat, fmt_opt, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{DividendYieldOrigin, IndicatorEngine, LiveMarketData, Ticker};

/// Print the dividend-yield history of `ticker`.
pub(crate) async fn run<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    ticker: &Ticker,
    format: OutputFormat,
) -> Result<()> {
    let history = engine.dividend_yield_history(ticker).await;

    match format {
        OutputFormat::Json => print_json(&history),
        OutputFormat::Csv => print_csv(&history.series),
        OutputFormat::Text => {
            header(&format!("DIVIDEND YIELD: {}", history.ticker));
            let origin = match history.origin {
                DividendYieldOrigin::Local => "local distributions",
                DividendYieldOrigin::Live => "live market data",
                DividendYieldOrigin::Unavailable => "unavailable",
            };
            println!("Source: {origin}\n");

            if history.is_empty() {
                println!("No dividend history for {}.", history.ticker);
                return Ok(());
            }

            println!("{:<12} {:>10} {:>12} {:>10}", "Date", "Dividend", "Price", "DY (%)");
            println!("{}", "-".repeat(47));
            for point in &history.series {
                println!(
                    "{:<12} {:>10.4} {:>12} {:>10}",
                    point.date.to_string(),
                    point.dividend,
                    fmt_opt(point.price_at_date, 2),
                    fmt_opt(point.dy_monthly, 4),
                );
            }
            println!("\n{} rows", history.series.len());
            Ok(())
        }
    }
}
