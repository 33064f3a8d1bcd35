#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fiidex/fiidex/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # fiidex
//!
//! Umbrella crate re-exporting the fiidex sub-crates and the
//! [`IndicatorEngine`] facade.
//!
//! ## Crate Organization
//!
//! - [`traits`] - Tickers, canonical records, [`Snapshot`], errors
//! - [`ingest`] - Normalizer and loader for the CSV extracts
//! - [`resolve`] - DY, book value and P/VP resolvers, reports
//! - [`yahoo`] - Live market-data fallback client
//!
//! ## Data flow
//!
//! 1. **Ingest** normalizes every extract into one immutable [`Snapshot`]
//! 2. **Book value** runs a source-priority waterfall per ticker
//! 3. **P/VP** joins daily quotes with the resolved book value
//! 4. **DY** reads local distributions, or the live provider when a fund
//!    has none

/// Version information for the fiidex crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod engine;

pub use engine::IndicatorEngine;

// ============================================================================
// Core types
// ============================================================================

/// Core types: tickers, records, snapshot, resolved series and errors.
pub mod traits {
    pub use fiidex_traits::*;
}

pub use fiidex_traits::{
    Date, FiidexError, LiveMarketData, OfflineMarketData, Result, Snapshot, Ticker, ToFrame,
};

// ============================================================================
// Ingestion
// ============================================================================

/// Normalization and loading of the raw extracts.
pub mod ingest {
    pub use fiidex_ingest::*;
}

pub use fiidex_ingest::{DataPaths, LoadReport};

// ============================================================================
// Resolution
// ============================================================================

/// Dividend-yield, book-value and price-to-book resolvers.
///
/// ## Book-value waterfall
///
/// | Priority | Source |
/// |---|---|
/// | 1 | historical fundamentals with reported shares |
/// | 2 | historical fundamentals with shares implied by the current snapshot |
/// | 3 | Oceans14 quarterly book value |
/// | 4 | current book value held constant |
///
/// ## Formulas
///
/// ```text
/// DY (%) = dividend / price_at_date * 100     (0 when price <= 0)
/// P/VP   = close / book_value_per_share       (dropped when book value is 0)
/// ```
pub mod resolve {
    pub use fiidex_resolve::*;
}

pub use fiidex_resolve::{
    BookValueResolution, Comparison, CoverageReport, DividendYieldHistory, DividendYieldOrigin,
    PriceToBookSummary,
};

// ============================================================================
// Live data
// ============================================================================

/// Yahoo chart API client.
///
/// The base URL and timeout come from `FIIDEX_YAHOO_BASE_URL` and
/// `FIIDEX_YAHOO_TIMEOUT_SECS` (a `.env` file is honored).
pub mod yahoo {
    pub use fiidex_yahoo::*;
}

pub use fiidex_yahoo::YahooClient;

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use fiidex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DataPaths, FiidexError, IndicatorEngine, LiveMarketData, OfflineMarketData, Result,
        Snapshot, Ticker, ToFrame,
    };
}
