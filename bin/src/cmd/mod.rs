//! CLI subcommand modules.
//!
//! This module contains the implementations for all fiidex CLI subcommands.

pub(crate) mod book_value;
pub(crate) mod compare;
pub(crate) mod coverage;
pub(crate) mod dividend;
pub(crate) mod price_to_book;
pub(crate) mod sources;
pub(crate) mod tickers;
