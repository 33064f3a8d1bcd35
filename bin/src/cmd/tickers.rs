//! Ticker listing command implementation.

use crate::output::{OutputFormat, print_csv, print_json};
use anyhow::Result;
use fiidex::{FiidexError, IndicatorEngine, LiveMarketData, Ticker, ToFrame};
use polars::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
#[serde(transparent)]
struct TickerList(Vec<Ticker>);

impl ToFrame for TickerList {
    fn to_frame(&self) -> Result<DataFrame, FiidexError> {
        Ok(df! {
            "ticker" => self.0.iter().map(Ticker::as_str).collect::<Vec<&str>>(),
        }?)
    }
}

/// List every ticker with distributions or quotes.
pub(crate) fn run<L: LiveMarketData>(engine: &IndicatorEngine<L>, format: OutputFormat) -> Result<()> {
    let tickers = TickerList(engine.tickers());

    match format {
        OutputFormat::Json => print_json(&tickers),
        OutputFormat::Csv => print_csv(&tickers),
        OutputFormat::Text => {
            if tickers.0.is_empty() {
                println!("No tickers found. Check --bronze-dir / FIIDEX_BRONZE_DIR.");
            }
            for ticker in &tickers.0 {
                println!("{ticker}");
            }
            Ok(())
        }
    }
}
