//! Source load-status command implementation.

use crate::output::{OutputFormat, header, print_csv, print_json};
use anyhow::Result;
use fiidex::{FiidexError, IndicatorEngine, LiveMarketData, LoadReport, ToFrame};
use polars::prelude::*;

struct SourceTable<'a>(&'a LoadReport);

impl ToFrame for SourceTable<'_> {
    fn to_frame(&self) -> Result<DataFrame, FiidexError> {
        let sources = &self.0.sources;
        Ok(df! {
            "dataset" => sources.iter().map(|s| s.kind.dataset()).collect::<Vec<&str>>(),
            "path" => sources.iter().map(|s| s.path.display().to_string()).collect::<Vec<String>>(),
            "rows_read" => sources.iter().map(|s| s.rows_read as u64).collect::<Vec<u64>>(),
            "rows_loaded" => sources.iter().map(|s| s.rows_loaded as u64).collect::<Vec<u64>>(),
            "rows_dropped" => sources.iter().map(|s| s.rows_dropped as u64).collect::<Vec<u64>>(),
            "status" => sources.iter().map(|s| s.status.to_string()).collect::<Vec<String>>(),
        }?)
    }
}

/// Print how every source was loaded.
pub(crate) fn run<L: LiveMarketData>(engine: &IndicatorEngine<L>, format: OutputFormat) -> Result<()> {
    let report = engine.load_report();

    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(&SourceTable(report)),
        OutputFormat::Text => {
            header("SOURCES");
            println!(
                "{:<14} {:>8} {:>8} {:>8}  {}",
                "Dataset", "Read", "Loaded", "Dropped", "Status"
            );
            println!("{}", "-".repeat(60));
            for source in &report.sources {
                println!(
                    "{:<14} {:>8} {:>8} {:>8}  {}",
                    source.kind.dataset(),
                    source.rows_read,
                    source.rows_loaded,
                    source.rows_dropped,
                    source.status
                );
                println!("  {}", source.path.display());
            }
            if report.all_loaded() {
                println!("\nAll sources loaded.");
            }
            Ok(())
        }
    }
}
