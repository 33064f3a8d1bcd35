//! Output formatting shared by the subcommands.

use anyhow::Result;
use clap::ValueEnum;
use fiidex::ToFrame;
use polars::prelude::*;
use serde::Serialize;
use std::io::Write;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
    /// CSV with a header row
    Csv,
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
    println!("{json}");
    Ok(())
}

/// Print the frame of `value` as CSV.
pub(crate) fn print_csv<T: ToFrame + ?Sized>(value: &T) -> Result<()> {
    let mut frame = value.to_frame()?;
    write_csv(&mut frame, &mut std::io::stdout().lock())
}

fn write_csv<W: Write>(frame: &mut DataFrame, out: &mut W) -> Result<()> {
    CsvWriter::new(out).include_header(true).finish(frame)?;
    Ok(())
}

/// Render an optional metric with `precision` decimals, `-` when absent.
pub(crate) fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// Section header used by the text output.
pub(crate) fn header(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{title}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_opt(None, 2), "-");
    }

    #[test]
    fn test_write_csv() {
        let mut frame = df! {
            "ticker" => ["HGLG11", "KNRI11"],
            "dy_monthly" => [Some(0.8), None],
        }
        .unwrap();
        let mut buf = Vec::new();
        write_csv(&mut frame, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ticker,dy_monthly");
        assert_eq!(lines[1], "HGLG11,0.8");
        assert_eq!(lines[2], "KNRI11,");
    }
}
