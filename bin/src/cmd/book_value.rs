//! Book-value command implementation.

use crate::output::{OutputFormat, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{IndicatorEngine, LiveMarketData, Ticker};

/// Print the resolved book value of `ticker`.
///
/// Consecutive days with the same value and source are collapsed into one
/// line in the text output.
pub(crate) fn run<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    ticker: &Ticker,
    format: OutputFormat,
) -> Result<()> {
    let resolution = engine.try_book_value_series(ticker)?;

    match format {
        OutputFormat::Json => print_json(&resolution),
        OutputFormat::Csv => print_csv(&resolution.series),
        OutputFormat::Text => {
            header(&format!("BOOK VALUE: {}", resolution.ticker));
            if let Some(source) = resolution.source_used {
                println!("Source: {source}\n");
            }

            println!("{:<12} {:<12} {:>12} {:<28}", "From", "To", "Book value", "Source");
            println!("{}", "-".repeat(67));
            let points = resolution.series.points();
            for stretch in points.chunk_by(|a, b| {
                a.book_value_per_share == b.book_value_per_share && a.source == b.source
            }) {
                let (first, last) = (&stretch[0], &stretch[stretch.len() - 1]);
                println!(
                    "{:<12} {:<12} {:>12.4} {:<28}",
                    first.date.to_string(),
                    last.date.to_string(),
                    first.book_value_per_share,
                    first.source.as_str()
                );
            }
            Ok(())
        }
    }
}
