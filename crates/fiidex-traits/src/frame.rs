//! Conversion of resolved series into polars frames.
//!
//! The presentation layer (CLI, notebooks, dashboards) works with tables, so
//! every series can be exported as a [`DataFrame`] with a `date` column typed
//! as `Date` and one `Float64` column per metric.

use crate::{
    Date, Result,
    series::{BookValuePoint, DividendYieldPoint, PriceToBookPoint, ResolvedSeries},
};
use polars::prelude::*;

/// Export as a polars [`DataFrame`].
pub trait ToFrame {
    /// Build the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the columns.
    fn to_frame(&self) -> Result<DataFrame>;
}

fn dates<T>(points: &[T], date: impl Fn(&T) -> Date) -> Vec<Date> {
    points.iter().map(date).collect()
}

impl ToFrame for ResolvedSeries<DividendYieldPoint> {
    fn to_frame(&self) -> Result<DataFrame> {
        let points = self.points();
        Ok(df! {
            "date" => dates(points, |p| p.date),
            "dividend" => points.iter().map(|p| p.dividend).collect::<Vec<f64>>(),
            "price_at_date" => points.iter().map(|p| p.price_at_date).collect::<Vec<Option<f64>>>(),
            "dy_monthly" => points.iter().map(|p| p.dy_monthly).collect::<Vec<Option<f64>>>(),
        }?)
    }
}

impl ToFrame for ResolvedSeries<BookValuePoint> {
    fn to_frame(&self) -> Result<DataFrame> {
        let points = self.points();
        Ok(df! {
            "date" => dates(points, |p| p.date),
            "book_value_per_share" => points.iter().map(|p| p.book_value_per_share).collect::<Vec<f64>>(),
            "source" => points.iter().map(|p| p.source.as_str()).collect::<Vec<&str>>(),
        }?)
    }
}

impl ToFrame for ResolvedSeries<PriceToBookPoint> {
    fn to_frame(&self) -> Result<DataFrame> {
        let points = self.points();
        Ok(df! {
            "date" => dates(points, |p| p.date),
            "close" => points.iter().map(|p| p.close).collect::<Vec<f64>>(),
            "book_value_used" => points.iter().map(|p| p.book_value_used).collect::<Vec<f64>>(),
            "price_to_book" => points.iter().map(|p| p.price_to_book).collect::<Vec<f64>>(),
        }?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::BookValueSource;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_price_to_book_frame_schema() {
        let series = ResolvedSeries::from_points(vec![
            PriceToBookPoint {
                date: d(2024, 1, 2),
                close: 12.0,
                book_value_used: 10.0,
                price_to_book: 1.2,
            },
            PriceToBookPoint {
                date: d(2024, 1, 3),
                close: 8.0,
                book_value_used: 10.0,
                price_to_book: 0.8,
            },
        ]);

        let df = series.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("price_to_book").unwrap().dtype(), &DataType::Float64);

        let ratios: Vec<Option<f64>> = df
            .column("price_to_book")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ratios, vec![Some(1.2), Some(0.8)]);
    }

    #[test]
    fn test_dividend_yield_frame_keeps_missing_values() {
        let series = ResolvedSeries::from_points(vec![DividendYieldPoint {
            date: d(2024, 1, 15),
            dividend: 1.1,
            price_at_date: None,
            dy_monthly: None,
        }]);

        let df = series.to_frame().unwrap();
        assert_eq!(df.column("dy_monthly").unwrap().null_count(), 1);
    }

    #[test]
    fn test_book_value_frame_source_column() {
        let series = ResolvedSeries::from_points(vec![BookValuePoint {
            date: d(2024, 3, 31),
            book_value_per_share: 100.0,
            source: BookValueSource::Oceans14Quarterly,
        }]);

        let df = series.to_frame().unwrap();
        let sources = df.column("source").unwrap().as_materialized_series().str().unwrap().get(0);
        assert_eq!(sources, Some("oceans14"));
    }

    #[test]
    fn test_empty_series_frame() {
        let series: ResolvedSeries<BookValuePoint> = ResolvedSeries::default();
        let df = series.to_frame().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }
}
