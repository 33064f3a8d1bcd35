//! Normalization of raw extracts into canonical records.
//!
//! Raw tables are polars frames whose cells are text, exactly as the
//! collaborators wrote them. Each [`SourceKind`] has its own column names,
//! numeric convention and date rules; the output is a [`CanonicalTable`] of
//! typed records. Rows missing the primary value of their kind are dropped,
//! never reported as errors. A table that cannot be interpreted at all (a
//! required column is absent) fails with [`FiidexError::ParseFailure`] from
//! [`try_normalize`], or turns into an empty table in [`normalize`].

use crate::{
    parse::{parse_br_date, parse_iso_date, parse_locale_number, parse_plain_number, parse_timestamp},
    quarter::quarter_end,
};
use fiidex_traits::{
    DistributionEvent, FiidexError, FundamentalsRecord, IndicatorSnapshot, PriceQuote,
    QuarterlyBookValue, Result, Ticker,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Quote interval kept by the normalizer.
pub const DAILY_INTERVAL: &str = "1d";

/// Kinds of raw extract understood by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Distribution records scraped from the fund listing site.
    Distributions,
    /// Current indicator snapshots (book value per share, net assets).
    Indicators,
    /// Daily market quotes.
    Quotes,
    /// Historical fundamentals (net assets, shares outstanding).
    Fundamentals,
    /// Oceans14 quarterly indicator table.
    Quarterly,
}

impl SourceKind {
    /// Every kind, in load order.
    pub const ALL: [Self; 5] = [
        Self::Distributions,
        Self::Indicators,
        Self::Quotes,
        Self::Fundamentals,
        Self::Quarterly,
    ];

    /// Dataset name used in logs and errors.
    #[must_use]
    pub const fn dataset(&self) -> &'static str {
        match self {
            Self::Distributions => "distributions",
            Self::Indicators => "indicators",
            Self::Quotes => "quotes",
            Self::Fundamentals => "fundamentals",
            Self::Quarterly => "quarterly",
        }
    }

    /// File name of the extract inside its data directory.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Distributions => "funds_rendimentos.csv",
            Self::Indicators => "funds_indicadores_diarios.csv",
            Self::Quotes => "yahoo_cotacoes.csv",
            Self::Fundamentals => "yahoo_historical_indicators.csv",
            Self::Quarterly => "Indicadores.csv",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dataset())
    }
}

/// Canonical records of one source.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalTable {
    /// Distribution events.
    Distributions(Vec<DistributionEvent>),
    /// Indicator snapshots.
    Indicators(Vec<IndicatorSnapshot>),
    /// Daily quotes.
    Quotes(Vec<PriceQuote>),
    /// Historical fundamentals.
    Fundamentals(Vec<FundamentalsRecord>),
    /// Quarterly book values.
    Quarterly(Vec<QuarterlyBookValue>),
}

impl CanonicalTable {
    /// An empty table of the given kind.
    #[must_use]
    pub const fn empty(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Distributions => Self::Distributions(Vec::new()),
            SourceKind::Indicators => Self::Indicators(Vec::new()),
            SourceKind::Quotes => Self::Quotes(Vec::new()),
            SourceKind::Fundamentals => Self::Fundamentals(Vec::new()),
            SourceKind::Quarterly => Self::Quarterly(Vec::new()),
        }
    }

    /// The kind of records held.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Distributions(_) => SourceKind::Distributions,
            Self::Indicators(_) => SourceKind::Indicators,
            Self::Quotes(_) => SourceKind::Quotes,
            Self::Fundamentals(_) => SourceKind::Fundamentals,
            Self::Quarterly(_) => SourceKind::Quarterly,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Self::Distributions(rows) => rows.len(),
            Self::Indicators(rows) => rows.len(),
            Self::Quotes(rows) => rows.len(),
            Self::Fundamentals(rows) => rows.len(),
            Self::Quarterly(rows) => rows.len(),
        }
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of normalizing one raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Canonical records.
    pub table: CanonicalTable,
    /// Rows in the raw table.
    pub rows_read: usize,
}

impl Normalized {
    /// Rows discarded because their primary value, ticker or date was unusable.
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.table.len())
    }
}

/// Normalize a raw table, reporting why it could not be interpreted.
///
/// # Errors
///
/// Returns [`FiidexError::ParseFailure`] if a required column is missing, or
/// a polars error if a column cannot be read as text.
pub fn try_normalize(raw: &DataFrame, kind: SourceKind) -> Result<Normalized> {
    let table = match kind {
        SourceKind::Distributions => CanonicalTable::Distributions(distributions(raw)?),
        SourceKind::Indicators => CanonicalTable::Indicators(indicators(raw)?),
        SourceKind::Quotes => CanonicalTable::Quotes(quotes(raw)?),
        SourceKind::Fundamentals => CanonicalTable::Fundamentals(fundamentals(raw)?),
        SourceKind::Quarterly => CanonicalTable::Quarterly(quarterly(raw)?),
    };
    let normalized = Normalized {
        table,
        rows_read: raw.height(),
    };
    debug!(
        dataset = kind.dataset(),
        rows_read = normalized.rows_read,
        rows_kept = normalized.table.len(),
        "normalized extract"
    );
    Ok(normalized)
}

/// Normalize a raw table; failures are logged and yield an empty table.
pub fn normalize(raw: &DataFrame, kind: SourceKind) -> CanonicalTable {
    match try_normalize(raw, kind) {
        Ok(normalized) => normalized.table,
        Err(err) => {
            warn!(dataset = kind.dataset(), error = %err, "normalization failed, using empty table");
            CanonicalTable::empty(kind)
        }
    }
}

/// Text cells of one column, `None` for nulls.
type TextCells = Vec<Option<String>>;

fn header_matches(header: &str, wanted: &str) -> bool {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .eq_ignore_ascii_case(wanted)
}

fn text(raw: &DataFrame, name: &str) -> Result<Option<TextCells>> {
    let Some(column) = raw
        .get_columns()
        .iter()
        .find(|c| header_matches(c.name().as_str(), name))
    else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let cells = series
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect();
    Ok(Some(cells))
}

fn required(raw: &DataFrame, kind: SourceKind, name: &str) -> Result<TextCells> {
    text(raw, name)?
        .ok_or_else(|| FiidexError::parse(kind.dataset(), format!("missing column `{name}`")))
}

fn optional(raw: &DataFrame, name: &str) -> Result<TextCells> {
    Ok(text(raw, name)?.unwrap_or_else(|| vec![None; raw.height()]))
}

fn cell(cells: &[Option<String>], row: usize) -> Option<&str> {
    cells.get(row).and_then(|c| c.as_deref())
}

fn ticker(cells: &[Option<String>], row: usize) -> Option<Ticker> {
    cell(cells, row)
        .map(Ticker::new)
        .filter(|t| !t.is_empty())
}

fn distributions(raw: &DataFrame) -> Result<Vec<DistributionEvent>> {
    let kind = SourceKind::Distributions;
    let tickers = required(raw, kind, "Ticker")?;
    let dividends = required(raw, kind, "Valor por Cota (R$)")?;
    let base_dates = text(raw, "Data Base")?;
    let payment_dates = text(raw, "Data de Pagamento")?;
    if base_dates.is_none() && payment_dates.is_none() {
        return Err(FiidexError::parse(kind.dataset(), "no date column"));
    }
    let base_dates = base_dates.unwrap_or_else(|| vec![None; raw.height()]);
    let payment_dates = payment_dates.unwrap_or_else(|| vec![None; raw.height()]);
    let closes = optional(raw, "Fechamento (R$)")?;
    let yields = optional(raw, "Yield 1M")?;

    Ok((0..raw.height())
        .filter_map(|row| {
            let dividend = cell(&dividends, row).and_then(parse_locale_number)?;
            let date = cell(&base_dates, row)
                .and_then(parse_br_date)
                .or_else(|| cell(&payment_dates, row).and_then(parse_br_date))?;
            Some(DistributionEvent {
                ticker: ticker(&tickers, row)?,
                date,
                dividend,
                price_at_date: cell(&closes, row).and_then(parse_locale_number),
                dy_monthly: cell(&yields, row).and_then(parse_locale_number),
            })
        })
        .collect())
}

fn indicators(raw: &DataFrame) -> Result<Vec<IndicatorSnapshot>> {
    let kind = SourceKind::Indicators;
    let tickers = required(raw, kind, "Ticker")?;
    let timestamps = required(raw, kind, "timestamp")?;
    let book_values = optional(raw, "valor_patrimonial_cota")?;
    let net_assets = optional(raw, "patrimonio_liquido")?;

    Ok((0..raw.height())
        .filter_map(|row| {
            Some(IndicatorSnapshot {
                ticker: ticker(&tickers, row)?,
                timestamp: cell(&timestamps, row).and_then(parse_timestamp)?,
                book_value_per_share: cell(&book_values, row).and_then(parse_plain_number),
                net_assets: cell(&net_assets, row).and_then(parse_plain_number),
            })
        })
        .collect())
}

fn quotes(raw: &DataFrame) -> Result<Vec<PriceQuote>> {
    let kind = SourceKind::Quotes;
    let tickers = required(raw, kind, "Ticker")?;
    let closes = required(raw, kind, "Close")?;
    let dates = text(raw, "Date")?;
    let datetimes = text(raw, "Datetime")?;
    if dates.is_none() && datetimes.is_none() {
        return Err(FiidexError::parse(kind.dataset(), "no `Date` or `Datetime` column"));
    }
    let dates = dates.unwrap_or_else(|| vec![None; raw.height()]);
    let datetimes = datetimes.unwrap_or_else(|| vec![None; raw.height()]);
    let intervals = optional(raw, "Intervalo")?;

    Ok((0..raw.height())
        .filter_map(|row| {
            if cell(&intervals, row).is_some_and(|i| i.trim() != DAILY_INTERVAL) {
                return None;
            }
            let date = cell(&dates, row)
                .and_then(parse_iso_date)
                .or_else(|| cell(&datetimes, row).and_then(parse_iso_date))?;
            Some(PriceQuote {
                ticker: ticker(&tickers, row)?,
                date,
                close: cell(&closes, row).and_then(parse_plain_number)?,
            })
        })
        .collect())
}

fn fundamentals(raw: &DataFrame) -> Result<Vec<FundamentalsRecord>> {
    let kind = SourceKind::Fundamentals;
    let tickers = required(raw, kind, "Ticker")?;
    let dates = required(raw, kind, "Date")?;
    let net_assets = optional(raw, "Patrimonio_Liquido")?;
    let shares = optional(raw, "Cotas")?;
    let book_values = optional(raw, "VP_Cota")?;

    Ok((0..raw.height())
        .filter_map(|row| {
            Some(FundamentalsRecord {
                ticker: ticker(&tickers, row)?,
                date: cell(&dates, row).and_then(parse_iso_date)?,
                net_assets: cell(&net_assets, row).and_then(parse_plain_number),
                shares_outstanding: cell(&shares, row).and_then(parse_plain_number),
                book_value_per_share: cell(&book_values, row).and_then(parse_plain_number),
            })
        })
        .collect())
}

fn quarterly(raw: &DataFrame) -> Result<Vec<QuarterlyBookValue>> {
    let kind = SourceKind::Quarterly;
    let tickers = required(raw, kind, "Ticker")?;
    let quarters = required(raw, kind, "Trimestre")?;
    let book_values = optional(raw, "VP por cota")?;
    let ratios = optional(raw, "P/VP")?;

    Ok((0..raw.height())
        .filter_map(|row| {
            let quarter = cell(&quarters, row)?;
            Some(QuarterlyBookValue {
                ticker: ticker(&tickers, row)?,
                date: quarter_end(quarter)?,
                quarter: quarter.trim().to_string(),
                book_value_per_share: cell(&book_values, row).and_then(parse_locale_number),
                price_to_book: cell(&ratios, row).and_then(parse_locale_number),
            })
        })
        .collect())
}
