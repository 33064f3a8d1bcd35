//! Error types for fiidex.
//!
//! The variants follow the engine's failure taxonomy: a dataset that is not
//! there, a dataset that cannot be read, a live provider that failed, a ratio
//! with nothing to divide by, and a ticker with no data at all. None of them
//! is fatal to a caller of the lenient query API; the typed `try_*` queries
//! surface them so a caller can tell "no data" apart from "fetch failed".

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fiidex operations.
#[derive(Debug, Error)]
pub enum FiidexError {
    /// An expected dataset file or table is absent.
    #[error("Missing source {dataset}: {}", path.display())]
    MissingSource {
        /// Dataset name.
        dataset: String,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A dataset could not be coerced into its canonical shape.
    #[error("Parse failure in {dataset}: {message}")]
    ParseFailure {
        /// Dataset name.
        dataset: String,
        /// What went wrong.
        message: String,
    },

    /// The live provider failed or returned nothing usable.
    #[error("Remote fallback failed for {symbol}: {message}")]
    RemoteFallback {
        /// Provider symbol that was requested.
        symbol: String,
        /// What went wrong.
        message: String,
    },

    /// A ratio had a zero or missing denominator.
    #[error("Degenerate denominator: {0}")]
    DegenerateDenominator(String),

    /// No source holds data for the ticker.
    #[error("No data for {0}")]
    NoData(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FiidexError {
    /// Build a [`FiidexError::ParseFailure`].
    pub fn parse(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    /// Build a [`FiidexError::RemoteFallback`].
    pub fn remote(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteFallback {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Whether the error only means that there was nothing to return.
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_) | Self::DegenerateDenominator(_))
    }
}

/// A specialized Result type for fiidex operations.
pub type Result<T> = std::result::Result<T, FiidexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FiidexError::MissingSource {
            dataset: "distributions".to_string(),
            path: PathBuf::from("data/bronze/funds_rendimentos.csv"),
        };
        assert_eq!(
            err.to_string(),
            "Missing source distributions: data/bronze/funds_rendimentos.csv"
        );

        let err = FiidexError::remote("HGLG11.SA", "timeout");
        assert_eq!(err.to_string(), "Remote fallback failed for HGLG11.SA: timeout");
    }

    #[test]
    fn test_no_data_classification() {
        assert!(FiidexError::NoData("XPTO11".to_string()).is_no_data());
        assert!(FiidexError::DegenerateDenominator("book value".to_string()).is_no_data());
        assert!(!FiidexError::remote("XPTO11.SA", "HTTP 500").is_no_data());
        assert!(!FiidexError::parse("quotes", "bad header").is_no_data());
    }
}
