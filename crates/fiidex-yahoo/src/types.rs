//! Data types for Yahoo chart API responses.
//!
//! Only the parts of the chart payload needed to rebuild a dividend and daily
//! close history are modelled. Yahoo reports instants as Unix seconds; the
//! exchange's `gmtoffset` is applied before taking the calendar day so that
//! bars and dividends land on the local trading date.

use crate::error::YahooError;
use chrono::{DateTime, NaiveDate};
use fiidex_traits::{DividendPayment, LiveHistory, PriceQuote, Ticker};
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Chart payload.
    pub chart: Chart,
}

/// Chart payload: either results or an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    /// Results, one per requested symbol.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// API-level error.
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// API-level error reported inside a chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    /// Error code (`"Not Found"`, ...).
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Chart data of one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Symbol metadata.
    pub meta: ChartMeta,
    /// Bar instants, Unix seconds.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    /// Bar values.
    pub indicators: ChartIndicators,
    /// Corporate events (dividends when requested with `events=div`).
    #[serde(default)]
    pub events: Option<ChartEvents>,
}

/// Symbol metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Provider symbol.
    pub symbol: String,
    /// Trading currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Offset of the exchange's local time from UTC, in seconds.
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: i64,
}

/// Bar value arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    /// OHLCV arrays (Yahoo always sends exactly one entry).
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// OHLCV arrays aligned with [`ChartResult::timestamp`].
#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    /// Closing prices; `null` for bars without trades.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Corporate events.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEvents {
    /// Dividends keyed by their instant (as a string).
    #[serde(default)]
    pub dividends: HashMap<String, DividendEvent>,
}

/// One dividend event.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DividendEvent {
    /// Amount per share.
    pub amount: f64,
    /// Instant of the event, Unix seconds.
    pub date: i64,
}

/// Local calendar day of a Unix instant at the given UTC offset.
pub(crate) fn local_date(seconds: i64, gmt_offset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds.checked_add(gmt_offset)?, 0).map(|dt| dt.date_naive())
}

impl ChartResponse {
    /// Unwrap the first result, turning API errors into [`YahooError`].
    ///
    /// # Errors
    ///
    /// Returns [`YahooError::Api`] for an API-level error and
    /// [`YahooError::NoData`] when the response carries no result.
    pub fn into_result(self, symbol: &str) -> Result<ChartResult, YahooError> {
        if let Some(error) = self.chart.error {
            return Err(YahooError::Api(format!("{}: {}", error.code, error.description)));
        }
        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| YahooError::NoData(symbol.to_string()))
    }
}

impl ChartResult {
    /// Daily closes as price quotes, skipping bars without a close.
    pub fn closes(&self) -> Vec<PriceQuote> {
        let Some(timestamps) = &self.timestamp else {
            return Vec::new();
        };
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };
        let ticker = Ticker::new(&self.meta.symbol);

        timestamps
            .iter()
            .zip(&quote.close)
            .filter_map(|(&ts, close)| {
                let close = close.filter(|c| c.is_finite())?;
                Some(PriceQuote {
                    ticker: ticker.clone(),
                    date: local_date(ts, self.meta.gmt_offset)?,
                    close,
                })
            })
            .collect()
    }

    /// Dividend payments, ascending by date.
    pub fn dividends(&self) -> Vec<DividendPayment> {
        let Some(events) = &self.events else {
            return Vec::new();
        };
        let mut payments: Vec<DividendPayment> = events
            .dividends
            .values()
            .filter(|event| event.amount.is_finite())
            .filter_map(|event| {
                Some(DividendPayment {
                    date: local_date(event.date, self.meta.gmt_offset)?,
                    amount: event.amount,
                })
            })
            .collect();
        payments.sort_by_key(|p| p.date);
        payments
    }

    /// Convert into the provider-neutral history.
    pub fn into_history(self) -> LiveHistory {
        LiveHistory {
            dividends: self.dividends(),
            prices: self.closes(),
            symbol: self.meta.symbol,
        }
    }
}
