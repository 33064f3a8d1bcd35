//! Live market data seam.
//!
//! The dividend-yield resolver falls back to a remote provider when a ticker
//! has no local distribution records. This module defines the interface the
//! resolver talks to, so the provider can be swapped (HTTP client, in-memory
//! stub in tests, or nothing at all when running offline).
//!
//! # Example
//!
//! ```no_run
//! use fiidex_traits::{LiveHistory, LiveMarketData, Result};
//!
//! struct Fixed;
//!
//! impl LiveMarketData for Fixed {
//!     async fn fetch_history(&self, symbol: &str) -> Result<LiveHistory> {
//!         Ok(LiveHistory::empty(symbol))
//!     }
//! }
//! ```

use crate::{Date, Result, error::FiidexError, types::PriceQuote};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A dividend paid on a given day, as reported by a live provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendPayment {
    /// Payment (ex-) date.
    pub date: Date,
    /// Amount per share.
    pub amount: f64,
}

/// Full dividend and daily price history of one provider symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveHistory {
    /// Provider symbol the history belongs to (suffixed form).
    pub symbol: String,
    /// Every dividend payment, in provider order.
    pub dividends: Vec<DividendPayment>,
    /// Daily closing prices, in provider order.
    pub prices: Vec<PriceQuote>,
}

impl LiveHistory {
    /// A history with no dividends and no prices.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Whether the provider returned neither dividends nor prices.
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty() && self.prices.is_empty()
    }
}

/// A remote source of dividend and price history.
///
/// Implementations must be thread-safe (`Send + Sync`); the returned future
/// must be `Send` so queries can run on a multi-threaded runtime.
pub trait LiveMarketData: Send + Sync {
    /// Fetch the full dividend and daily price history of `symbol`.
    ///
    /// `symbol` is already in provider form (exchange suffix appended).
    ///
    /// # Errors
    ///
    /// Returns [`FiidexError::RemoteFallback`] when the provider cannot be
    /// reached or its response cannot be used.
    fn fetch_history(&self, symbol: &str) -> impl Future<Output = Result<LiveHistory>> + Send;
}

/// A [`LiveMarketData`] that never reaches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMarketData;

impl LiveMarketData for OfflineMarketData {
    async fn fetch_history(&self, symbol: &str) -> Result<LiveHistory> {
        Err(FiidexError::remote(symbol, "live market data disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_always_fails_with_remote_error() {
        let err = OfflineMarketData.fetch_history("HGLG11.SA").await.unwrap_err();
        assert!(matches!(err, FiidexError::RemoteFallback { ref symbol, .. } if symbol == "HGLG11.SA"));
    }

    #[test]
    fn test_empty_history() {
        let history = LiveHistory::empty("XPTO11.SA");
        assert!(history.is_empty());
        assert_eq!(history.symbol, "XPTO11.SA");
    }
}
