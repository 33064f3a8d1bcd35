//! Quarter labels of the Oceans14 indicator table.

use chrono::NaiveDate;

/// Last calendar day of the quarter named by a `"nTyyyy"` label.
///
/// `"1T2023"` is 2023-03-31, `"4T2023"` is 2023-12-31. Labels with an
/// unknown quarter number or a year that is not four digits yield `None`.
pub fn quarter_end(label: &str) -> Option<NaiveDate> {
    let (quarter, year) = label.trim().split_once(['T', 't'])?;
    let year = year.trim();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let (month, day) = match quarter.trim() {
        "1" => (3, 31),
        "2" => (6, 30),
        "3" => (9, 30),
        "4" => (12, 31),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
