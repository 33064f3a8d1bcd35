//! Yahoo chart API client implementation.

use crate::{
    Result,
    error::YahooError,
    types::{ChartResponse, ChartResult},
};
use fiidex_traits::{FiidexError, LiveHistory, LiveMarketData};
use reqwest::Client;
use std::{env, time::Duration};
use tracing::{debug, warn};

/// Base URL of the Yahoo chart API.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "FIIDEX_YAHOO_BASE_URL";
/// Environment variable overriding the timeout, in seconds.
pub const TIMEOUT_ENV: &str = "FIIDEX_YAHOO_TIMEOUT_SECS";

const USER_AGENT: &str = concat!("fiidex/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY: usize = 200;

/// Yahoo chart API client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl YahooClient {
    /// Create a client against the public endpoint with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(YAHOO_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the HTTP client cannot be
    /// built.
    pub fn with_config(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(YahooError::Config("timeout must be positive".to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from `FIIDEX_YAHOO_BASE_URL` / `FIIDEX_YAHOO_TIMEOUT_SECS`.
    ///
    /// This will also load from a `.env` file if present. Unset variables
    /// fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a positive integer or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| YAHOO_BASE_URL.to_string());
        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| YahooError::Config(format!("{TIMEOUT_ENV}={raw}: {e}")))?,
            Err(_) => DEFAULT_TIMEOUT,
        };
        Self::with_config(base_url, timeout)
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Chart URL with full daily history and dividend events.
    fn url(&self, symbol: &str) -> String {
        format!(
            "{}/{}?range=max&interval=1d&events=div",
            self.base_url,
            symbol.to_uppercase()
        )
    }

    /// Fetch the raw chart of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response is not a chart
    /// payload, or the API reports an error.
    pub async fn chart(&self, symbol: &str) -> Result<ChartResult> {
        let url = self.url(symbol);
        debug!(%url, "fetching chart");
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(YahooError::RateLimitExceeded);
        }

        let text = response.text().await?;

        // Yahoo sends error payloads with non-success statuses, so try the
        // chart shape first.
        match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) => chart.into_result(symbol),
            Err(_) if !status.is_success() => Err(YahooError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            }),
            Err(e) => Err(YahooError::Json(e)),
        }
    }

    /// Fetch the full dividend and daily close history of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`YahooClient::chart`] fails.
    pub async fn history(&self, symbol: &str) -> Result<LiveHistory> {
        let history = self.chart(symbol).await?.into_history();
        debug!(
            symbol,
            dividends = history.dividends.len(),
            prices = history.prices.len(),
            "fetched history"
        );
        Ok(history)
    }
}

impl LiveMarketData for YahooClient {
    async fn fetch_history(&self, symbol: &str) -> fiidex_traits::Result<LiveHistory> {
        self.history(symbol).await.map_err(|err| {
            warn!(symbol, error = %err, "yahoo fetch failed");
            FiidexError::remote(symbol, err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let client = YahooClient::new().unwrap();
        assert_eq!(
            client.url("hglg11.sa"),
            "https://query1.finance.yahoo.com/v8/finance/chart/HGLG11.SA?range=max&interval=1d&events=div"
        );
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_custom_base_url() {
        let client = YahooClient::with_config("http://localhost:9999/chart/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/chart");
        assert_eq!(
            client.url("MXRF11.SA"),
            "http://localhost:9999/chart/MXRF11.SA?range=max&interval=1d&events=div"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = YahooClient::with_config(YAHOO_BASE_URL, Duration::ZERO).unwrap_err();
        assert!(matches!(err, YahooError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_remote_fallback() {
        let client =
            YahooClient::with_config("http://127.0.0.1:9/chart", Duration::from_secs(2)).unwrap();
        let err = client.fetch_history("XPTO11.SA").await.unwrap_err();
        assert!(matches!(err, FiidexError::RemoteFallback { ref symbol, .. } if symbol == "XPTO11.SA"));
    }
}
