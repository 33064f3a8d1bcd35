//! Yahoo chart API client for fiidex.
//!
//! This crate provides the live fallback used when a fund has no local
//! distribution records: the full dividend history and the full daily close
//! history of a symbol, fetched from the Yahoo chart endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fiidex_yahoo::YahooClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YahooClient::from_env()?;
//!
//!     // Dividends and daily closes, dates in exchange-local time
//!     let history = client.history("HGLG11.SA").await?;
//!     println!("{} dividends", history.dividends.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Both are optional; set them in your environment or `.env` file:
//!
//! ```bash
//! FIIDEX_YAHOO_BASE_URL=https://query1.finance.yahoo.com/v8/finance/chart
//! FIIDEX_YAHOO_TIMEOUT_SECS=30
//! ```

mod client;
mod error;
mod types;

pub use client::{BASE_URL_ENV, DEFAULT_TIMEOUT, TIMEOUT_ENV, YAHOO_BASE_URL, YahooClient};
pub use error::YahooError;
pub use types::*;

/// Result type for Yahoo operations.
pub type Result<T> = std::result::Result<T, YahooError>;
