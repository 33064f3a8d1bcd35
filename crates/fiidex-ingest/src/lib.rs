#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! Normalization and loading of the raw extracts.
//!
//! This crate turns the CSV extracts written by the collectors into the
//! canonical records of `fiidex-traits` and bundles them into an immutable
//! [`Snapshot`](fiidex_traits::Snapshot):
//!
//! - [`parse`]: locale-aware numbers and per-source date formats
//! - [`quarter`]: quarter labels (`"1T2023"`) to quarter-end dates
//! - [`normalize`]: raw polars frames to [`CanonicalTable`]s
//! - [`loader`]: reading every source into a snapshot plus a [`LoadReport`]
//! - [`config`]: where the extracts live ([`DataPaths`])
//!
//! # Example
//!
//! ```ignore
//! use fiidex_ingest::{DataPaths, load};
//!
//! let (snapshot, report) = load(&DataPaths::from_env());
//! for source in &report.sources {
//!     println!("{}: {}", source.kind, source.status);
//! }
//! ```

pub mod config;
pub mod loader;
pub mod normalize;
pub mod parse;
pub mod quarter;

// Re-export key types
pub use config::DataPaths;
pub use loader::{LoadReport, SourceReport, SourceStatus, load, load_source, read_raw};
pub use normalize::{CanonicalTable, Normalized, SourceKind, normalize, try_normalize};
