#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! Indicator resolvers for fiidex.
//!
//! Everything here reads an immutable [`Snapshot`](fiidex_traits::Snapshot)
//! and returns a [`ResolvedSeries`](fiidex_traits::ResolvedSeries). Fallible
//! entry points come in pairs: `try_*` returns the typed error, the plain
//! form logs it and returns an empty result.
//!
//! # Example
//!
//! ```ignore
//! use fiidex_resolve::PriceToBookEngine;
//! use fiidex_traits::Ticker;
//!
//! let engine = PriceToBookEngine::default();
//! let monthly = engine.monthly(&Ticker::new("HGLG11"), &snapshot);
//! ```

pub mod book_value;
pub mod dividend;
pub mod fill;
pub mod price_to_book;
pub mod report;

// Re-export key types
pub use book_value::{
    BookValueRecords, BookValueResolution, BookValueResolver, BookValueStrategy, CurrentFixed,
    HistoricalDirect, HistoricalEstimatedShares, Observation, OceansQuarterly,
    default_strategies,
};
pub use dividend::{
    DividendYieldHistory, DividendYieldOrigin, DividendYieldResolver, dy_monthly, live_history,
    local_history,
};
pub use fill::{as_of_join, forward_fill_daily, last_per_month, month_end};
pub use price_to_book::{PriceToBookEngine, PriceToBookSummary, price_to_book, quote_span, summarize};
pub use report::{Comparison, ComparisonRow, CoverageReport, CoverageRow, tickers};
