//! Coverage report command implementation.

use crate::output::{OutputFormat, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{IndicatorEngine, LiveMarketData};

/// Print per-ticker data coverage, optionally only the first `top` rows.
pub(crate) fn run<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut report = engine.coverage();
    if let Some(n) = top {
        report = report.top(n);
    }

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Csv => print_csv(&report),
        OutputFormat::Text => {
            header("DATA COVERAGE");
            println!(
                "{:<10} {:>6} {:>7} {:>6} {:>6} {:>5} {:<12} {:<12}",
                "Ticker", "Dists", "Quotes", "Fund.", "Qtrs", "Snap", "First quote", "Last quote"
            );
            println!("{}", "-".repeat(72));
            for row in &report.rows {
                println!(
                    "{:<10} {:>6} {:>7} {:>6} {:>6} {:>5} {:<12} {:<12}",
                    row.ticker,
                    row.distributions,
                    row.quote_days,
                    row.fundamentals,
                    row.quarterly,
                    if row.has_snapshot { "yes" } else { "no" },
                    row.first_quote.map_or_else(|| "-".to_string(), |d| d.to_string()),
                    row.last_quote.map_or_else(|| "-".to_string(), |d| d.to_string()),
                );
            }
            Ok(())
        }
    }
}
