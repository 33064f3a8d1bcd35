//! Locations of the raw extracts.

use crate::normalize::SourceKind;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable naming the bronze directory.
pub const BRONZE_DIR_ENV: &str = "FIIDEX_BRONZE_DIR";
/// Environment variable naming the Oceans14 output directory.
pub const OCEANS_DIR_ENV: &str = "FIIDEX_OCEANS_DIR";

/// Default bronze directory, relative to the working directory.
pub const DEFAULT_BRONZE_DIR: &str = "data/bronze";
/// Default Oceans14 directory, relative to the working directory.
pub const DEFAULT_OCEANS_DIR: &str = "data/oceans14";

/// Directories holding the extracts written by the collectors.
///
/// The bronze directory holds the distribution, indicator, quote and
/// fundamentals extracts; the Oceans14 directory holds the quarterly table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    /// Bronze directory.
    pub bronze_dir: PathBuf,
    /// Oceans14 output directory.
    pub oceans_dir: PathBuf,
}

impl DataPaths {
    /// Create paths from explicit directories.
    pub fn new(bronze_dir: impl Into<PathBuf>, oceans_dir: impl Into<PathBuf>) -> Self {
        Self {
            bronze_dir: bronze_dir.into(),
            oceans_dir: oceans_dir.into(),
        }
    }

    /// Read the directories from `FIIDEX_BRONZE_DIR` / `FIIDEX_OCEANS_DIR`.
    ///
    /// This will also load from a `.env` file if present. Unset variables
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::new(
            env::var_os(BRONZE_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_BRONZE_DIR), PathBuf::from),
            env::var_os(OCEANS_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_OCEANS_DIR), PathBuf::from),
        )
    }

    /// Replace the bronze directory when `dir` is given.
    #[must_use]
    pub fn with_bronze_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.bronze_dir = dir;
        }
        self
    }

    /// Replace the Oceans14 directory when `dir` is given.
    #[must_use]
    pub fn with_oceans_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.oceans_dir = dir;
        }
        self
    }

    /// Directory holding the extract of `kind`.
    pub fn dir_for(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Quarterly => &self.oceans_dir,
            _ => &self.bronze_dir,
        }
    }

    /// Full path of the extract of `kind`.
    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        self.dir_for(kind).join(kind.file_name())
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_BRONZE_DIR, DEFAULT_OCEANS_DIR)
    }
}
