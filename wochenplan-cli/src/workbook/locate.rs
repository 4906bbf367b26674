//! Header discovery inside untyped grids
//!
//! Planning sheets carry no schema: tables float inside the grid and header
//! rows are sometimes missing entirely. These locators scan bounded windows
//! for marker content and return coordinates, leaving the "not found" policy
//! (fallback, empty section, diagnostic) to the caller.

use chrono::NaiveDate;

use super::cell;
use super::Grid;

/// Scan the first `window` rows for one whose `col` cell equals any marker
/// (case-insensitive). Returns the row index of the marker row.
pub fn find_marker_row(grid: &Grid, col: usize, markers: &[&str], window: usize) -> Option<usize> {
    grid.iter().take(window).position(|row| {
        let value = cell::cell_string(row, col);
        markers.iter().any(|m| value.eq_ignore_ascii_case(m))
    })
}

/// Scan a bounded row window for the first row containing a genuine date
/// value within `cols`. Used to find the planning grid's date header band.
pub fn find_date_row(
    grid: &Grid,
    row_window: usize,
    cols: std::ops::Range<usize>,
) -> Option<usize> {
    grid.iter().take(row_window).position(|row| {
        cols.clone()
            .any(|col| row.get(col).is_some_and(|c| cell::date(c).is_some()))
    })
}

/// Find a cell equal to `token` (case-insensitive) inside a bounded
/// row/column window. Returns (row, col).
pub fn find_token(
    grid: &Grid,
    row_window: usize,
    col_window: usize,
    token: &str,
) -> Option<(usize, usize)> {
    for (row_idx, row) in grid.iter().take(row_window).enumerate() {
        for col_idx in 0..col_window.min(row.len()) {
            if cell::cell_string(row, col_idx).eq_ignore_ascii_case(token) {
                return Some((row_idx, col_idx));
            }
        }
    }
    None
}

/// Date value of a cell, if the grid has one at that position.
pub fn date_at(grid: &Grid, row: usize, col: usize) -> Option<NaiveDate> {
    grid.get(row).and_then(|r| r.get(col)).and_then(cell::date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testgrid::{d, e, s};
    use chrono::NaiveDate;

    #[test]
    fn marker_row_found_at_any_offset() {
        let grid = vec![
            vec![s("Wochenplan KW 28")],
            vec![e()],
            vec![s("Lenker"), s("Soll-Std.")],
            vec![s("Huber M."), s("162:30")],
        ];
        assert_eq!(find_marker_row(&grid, 0, &["Lenker", "Name"], 10), Some(2));
    }

    #[test]
    fn marker_row_absent_outside_window() {
        let grid = vec![vec![e()]; 15];
        assert_eq!(find_marker_row(&grid, 0, &["Lenker"], 10), None);
    }

    #[test]
    fn date_row_skips_label_rows() {
        let monday = NaiveDate::from_ymd_opt(2026, 7, 6).unwrap();
        let grid = vec![
            vec![s("plan"), e(), e(), s("Schule")],
            vec![e(), e(), e(), d(monday)],
        ];
        assert_eq!(find_date_row(&grid, 20, 3..20), Some(1));
        assert_eq!(find_date_row(&grid, 20, 5..20), None);
    }

    #[test]
    fn token_found_case_insensitively() {
        let grid = vec![
            vec![e()],
            vec![e(), e(), e(), e(), e(), e(), e(), e(), s("sms"), s("SoS")],
        ];
        assert_eq!(find_token(&grid, 10, 30, "SmS"), Some((1, 8)));
        assert_eq!(find_token(&grid, 10, 30, "WmS"), None);
    }
}
