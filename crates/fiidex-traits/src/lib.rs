#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fiidex/fiidex/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the fiidex indicator engine.
//!
//! This crate provides the shared vocabulary of the workspace: tickers and
//! canonical records, the immutable [`Snapshot`] every query reads from, the
//! resolved series returned by queries, the error taxonomy, and the
//! [`LiveMarketData`] seam used by the remote fallback.

/// The version of the fiidex-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod frame;
pub mod live;
pub mod series;
pub mod snapshot;
pub mod types;

// Re-exports
pub use error::{FiidexError, Result};
pub use frame::ToFrame;
pub use live::{DividendPayment, LiveHistory, LiveMarketData, OfflineMarketData};
pub use series::{
    BookValuePoint, BookValueSource, Dated, DividendYieldPoint, PriceToBookPoint, ResolvedSeries,
};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use types::{
    Date, DateSpan, DistributionEvent, EXCHANGE_SUFFIX, FundamentalsRecord, IndicatorSnapshot,
    PriceQuote, QuarterlyBookValue, Ticker,
};
