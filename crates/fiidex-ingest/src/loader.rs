//! Bulk loading of every extract into a [`Snapshot`].
//!
//! Each source is read independently. A missing file or a table that cannot
//! be normalized leaves that source empty and is recorded in the
//! [`LoadReport`]; loading itself never fails.

use crate::{
    config::DataPaths,
    normalize::{CanonicalTable, SourceKind, try_normalize},
};
use fiidex_traits::{FiidexError, Result, Snapshot};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How loading one source ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum SourceStatus {
    /// File read and normalized.
    Loaded,
    /// File not found.
    Missing,
    /// File present but unreadable or not interpretable.
    Failed(String),
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded"),
            Self::Missing => f.write_str("missing"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of loading one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source kind.
    pub kind: SourceKind,
    /// File that was looked up.
    pub path: PathBuf,
    /// Rows in the raw file.
    pub rows_read: usize,
    /// Canonical records kept.
    pub rows_loaded: usize,
    /// Raw rows discarded during normalization.
    pub rows_dropped: usize,
    /// Status.
    pub status: SourceStatus,
}

impl SourceReport {
    fn empty(kind: SourceKind, path: PathBuf, status: SourceStatus) -> Self {
        Self {
            kind,
            path,
            rows_read: 0,
            rows_loaded: 0,
            rows_dropped: 0,
            status,
        }
    }
}

/// Per-source outcome of [`load`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// One entry per source, in load order.
    pub sources: Vec<SourceReport>,
}

impl LoadReport {
    /// Report entry of `kind`.
    pub fn source(&self, kind: SourceKind) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    /// Whether every source loaded.
    pub fn all_loaded(&self) -> bool {
        self.sources.iter().all(|s| s.status == SourceStatus::Loaded)
    }
}

/// Read a CSV extract with every column as text.
///
/// # Errors
///
/// Returns [`FiidexError::MissingSource`] when the file does not exist, or a
/// polars error when it cannot be parsed as CSV.
pub fn read_raw(path: &Path, kind: SourceKind) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(FiidexError::MissingSource {
            dataset: kind.dataset().to_string(),
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_encoding(CsvEncoding::LossyUtf8))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Load and normalize the extract of one source.
pub fn load_source(paths: &DataPaths, kind: SourceKind) -> (CanonicalTable, SourceReport) {
    let path = paths.path_for(kind);

    let raw = match read_raw(&path, kind) {
        Ok(raw) => raw,
        Err(err @ FiidexError::MissingSource { .. }) => {
            warn!(dataset = kind.dataset(), error = %err, "source not found");
            return (
                CanonicalTable::empty(kind),
                SourceReport::empty(kind, path, SourceStatus::Missing),
            );
        }
        Err(err) => {
            warn!(dataset = kind.dataset(), path = %path.display(), error = %err, "failed to read source");
            return (
                CanonicalTable::empty(kind),
                SourceReport::empty(kind, path, SourceStatus::Failed(err.to_string())),
            );
        }
    };

    match try_normalize(&raw, kind) {
        Ok(normalized) => {
            let report = SourceReport {
                kind,
                path,
                rows_read: normalized.rows_read,
                rows_loaded: normalized.table.len(),
                rows_dropped: normalized.rows_dropped(),
                status: SourceStatus::Loaded,
            };
            debug!(
                dataset = kind.dataset(),
                rows_loaded = report.rows_loaded,
                rows_dropped = report.rows_dropped,
                "loaded source"
            );
            (normalized.table, report)
        }
        Err(err) => {
            warn!(dataset = kind.dataset(), error = %err, "failed to normalize source");
            let mut report = SourceReport::empty(kind, path, SourceStatus::Failed(err.to_string()));
            report.rows_read = raw.height();
            report.rows_dropped = raw.height();
            (CanonicalTable::empty(kind), report)
        }
    }
}

/// Load every source into an immutable [`Snapshot`].
pub fn load(paths: &DataPaths) -> (Snapshot, LoadReport) {
    let mut builder = Snapshot::builder();
    let mut report = LoadReport::default();

    for kind in SourceKind::ALL {
        let (table, source) = load_source(paths, kind);
        report.sources.push(source);
        builder = match table {
            CanonicalTable::Distributions(rows) => builder.distributions(rows),
            CanonicalTable::Indicators(rows) => builder.indicators(rows),
            CanonicalTable::Quotes(rows) => builder.quotes(rows),
            CanonicalTable::Fundamentals(rows) => builder.fundamentals(rows),
            CanonicalTable::Quarterly(rows) => builder.quarterly(rows),
        };
    }

    let snapshot = builder.build();
    info!(
        tickers = snapshot.all_tickers().len(),
        complete = report.all_loaded(),
        "snapshot loaded"
    );
    (snapshot, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiidex_traits::Ticker;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_all_sources() {
        let bronze = tempfile::tempdir().unwrap();
        let oceans = tempfile::tempdir().unwrap();

        write(
            bronze.path(),
            "funds_rendimentos.csv",
            "Ticker,Data Base,Data de Pagamento,Fechamento (R$),Valor por Cota (R$),Yield 1M,Yield 12M\n\
             HGLG11,29/12/2023,12/01/2024,\"1.650,00\",\"1,10\",\"0,67%\",\"8,1%\"\n\
             HGLG11,,14/02/2024,\"1.640,50\",\"1,10\",,\n\
             HGLG11,31/01/2024,14/02/2024,,,,\n",
        );
        write(
            bronze.path(),
            "funds_indicadores_diarios.csv",
            "Ticker,timestamp,valor_patrimonial_cota,patrimonio_liquido\n\
             HGLG11,2024-05-01 10:00:00,160.0,3200000000.0\n",
        );
        write(
            bronze.path(),
            "yahoo_cotacoes.csv",
            "Date,Ticker,Ticker_Yahoo,Open,High,Low,Close,Volume,Intervalo\n\
             2023-01-02 00:00:00-03:00,HGLG11,HGLG11.SA,160,161,159,160.5,1000,1d\n\
             2023-01-03 00:00:00-03:00,KNRI11.SA,KNRI11.SA,140,141,139,140.0,1000,1d\n",
        );
        write(
            oceans.path(),
            "Indicadores.csv",
            "Ticker,Trimestre,P/VP,VP por cota\n\
             HGLG11,1T2023,\"0,98\",\"1.601,20\"\n",
        );

        let paths = DataPaths::new(bronze.path(), oceans.path());
        let (snapshot, report) = load(&paths);

        let hglg = Ticker::new("HGLG11");
        assert_eq!(snapshot.distributions(&hglg).len(), 2);
        assert_eq!(snapshot.indicators(&hglg).len(), 1);
        assert_eq!(snapshot.quotes(&hglg).len(), 1);
        assert_eq!(snapshot.quarterly(&hglg).len(), 1);
        assert_eq!(snapshot.quotes(&Ticker::new("KNRI11")).len(), 1);

        let distributions = report.source(SourceKind::Distributions).unwrap();
        assert_eq!(distributions.status, SourceStatus::Loaded);
        assert_eq!(distributions.rows_read, 3);
        assert_eq!(distributions.rows_loaded, 2);
        assert_eq!(distributions.rows_dropped, 1);

        assert_eq!(
            report.source(SourceKind::Fundamentals).unwrap().status,
            SourceStatus::Missing
        );
        assert!(!report.all_loaded());
    }

    #[test]
    fn test_missing_directories_give_empty_snapshot() {
        let paths = DataPaths::new("/nonexistent/bronze", "/nonexistent/oceans");
        let (snapshot, report) = load(&paths);

        assert!(snapshot.is_empty());
        assert_eq!(report.sources.len(), SourceKind::ALL.len());
        assert!(report.sources.iter().all(|s| s.status == SourceStatus::Missing));
    }

    #[test]
    fn test_uninterpretable_source_is_reported_as_failed() {
        let bronze = tempfile::tempdir().unwrap();
        write(bronze.path(), "yahoo_cotacoes.csv", "Foo,Bar\n1,2\n");

        let paths = DataPaths::new(bronze.path(), bronze.path());
        let (table, report) = load_source(&paths, SourceKind::Quotes);

        assert!(table.is_empty());
        assert!(matches!(report.status, SourceStatus::Failed(_)));
        assert_eq!(report.rows_read, 1);
        assert_eq!(report.rows_dropped, 1);
    }

    #[test]
    fn test_read_raw_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "yahoo_cotacoes.csv", "Date,Ticker,Close\n2023-01-02,HGLG11,160.5\n");

        let df = read_raw(&dir.path().join("yahoo_cotacoes.csv"), SourceKind::Quotes).unwrap();
        assert_eq!(df.column("Close").unwrap().dtype(), &DataType::String);
    }
}
