//! DY versus P/VP comparison command implementation.

use crate::output::{OutputFormat, fmt_opt, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{IndicatorEngine, LiveMarketData, Ticker};

/// Print dividend yield and monthly P/VP of `ticker` side by side.
pub(crate) async fn run<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    ticker: &Ticker,
    format: OutputFormat,
) -> Result<()> {
    let comparison = engine.compare(ticker).await;

    match format {
        OutputFormat::Json => print_json(&comparison),
        OutputFormat::Csv => print_csv(&comparison),
        OutputFormat::Text => {
            header(&format!("DY vs P/VP: {}", ticker.bare()));
            if comparison.is_empty() {
                println!("Nothing to compare for {}.", ticker.bare());
                return Ok(());
            }

            println!("{:<12} {:>10} {:>8}", "Date", "DY (%)", "P/VP");
            println!("{}", "-".repeat(32));
            for row in &comparison.rows {
                println!(
                    "{:<12} {:>10} {:>8}",
                    row.date.to_string(),
                    fmt_opt(row.dy_monthly, 4),
                    fmt_opt(row.price_to_book, 4)
                );
            }
            Ok(())
        }
    }
}
