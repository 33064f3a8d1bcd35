//! Time-axis alignment primitives.
//!
//! Every resolver in this crate reduces to three operations on ascending,
//! duplicate-free series: a backward as-of join (each target date takes the
//! latest point dated on or before it), daily forward-fill over a span, and a
//! month-end resample that keeps the last row of each calendar month. None of
//! them interpolates or looks ahead.

use chrono::{Datelike, Months};
use fiidex_traits::{Date, DateSpan, Dated, ResolvedSeries};

/// Pair each target date with the latest point dated on or before it.
///
/// `dates` must be ascending; the join walks both sequences once. Dates
/// before the first point pair with `None`.
pub fn as_of_join<'a, T: Dated>(
    series: &'a ResolvedSeries<T>,
    dates: impl IntoIterator<Item = Date>,
) -> Vec<(Date, Option<&'a T>)> {
    let points = series.points();
    let mut cursor = 0usize;
    let mut current: Option<&T> = None;
    let mut previous: Option<Date> = None;

    dates
        .into_iter()
        .map(|date| {
            if previous.is_some_and(|p| date < p) {
                // Out-of-order target: fall back to a binary search.
                return (date, series.as_of(date));
            }
            previous = Some(date);
            while let Some(point) = points.get(cursor) {
                if point.date() > date {
                    break;
                }
                current = Some(point);
                cursor += 1;
            }
            (date, current)
        })
        .collect()
}

/// Forward-fill a series onto every calendar day of `span`.
pub fn forward_fill_daily<'a, T: Dated>(
    series: &'a ResolvedSeries<T>,
    span: DateSpan,
) -> Vec<(Date, Option<&'a T>)> {
    as_of_join(series, span.days())
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: Date) -> Date {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Keep the last point of every calendar month, labelled with the month end.
pub fn last_per_month<T: Dated>(series: &ResolvedSeries<T>) -> Vec<(Date, &T)> {
    let mut out: Vec<(Date, &T)> = Vec::new();
    for point in series {
        let label = month_end(point.date());
        match out.last_mut() {
            Some((last_label, last)) if *last_label == label => *last = point,
            _ => out.push((label, point)),
        }
    }
    out
}
