//! Data-source setup for the fiidex CLI.

use fiidex::{DataPaths, YahooClient};
use std::path::PathBuf;
use tracing::warn;

/// Extract directories: command-line flags first, then the environment
/// (`.env` included), then the defaults.
pub(crate) fn data_paths(bronze_dir: Option<PathBuf>, oceans_dir: Option<PathBuf>) -> DataPaths {
    DataPaths::from_env()
        .with_bronze_dir(bronze_dir)
        .with_oceans_dir(oceans_dir)
}

/// The live provider, unless disabled.
///
/// A client that cannot be configured disables the fallback instead of
/// aborting: local queries stay usable.
pub(crate) fn live_client(offline: bool) -> Option<YahooClient> {
    if offline {
        return None;
    }
    match YahooClient::from_env() {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "live market data unavailable, running offline");
            None
        }
    }
}
