//! Calendar context resolution
//!
//! Each date of the target week gets a season (from the week's starting
//! month), a school-in-session flag and an optional holiday. School status
//! comes from the planning grid's date/status header band; when the band is
//! missing or does not cover a date, a static vacation calendar answers for
//! exactly the missing dates.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::workbook::{cell, locate, Grid};

use super::diagnostics::{report, Diagnostic};
use super::types::{CalendarDay, Season, SchoolStatus};

const DATE_ROW_WINDOW: usize = 20;
const DATE_COL_START: usize = 3;
const DATE_COL_END: usize = 20;

/// Offsets above the date row tried for the status band, in priority order.
/// When none holds a plausible keyword, one-row-above is assumed.
const STATUS_ROW_OFFSETS: [usize; 3] = [1, 2, 3];

/// Substrings marking a date as school-free. Anything else (including no
/// status cell at all) counts as school in session.
const NO_SCHOOL_KEYWORDS: [&str; 2] = ["frei", "ohne"];

/// Substrings that make a candidate status row plausible at all.
const STATUS_KEYWORDS: [&str; 3] = ["schul", "frei", "ohne"];

/// Parse the optional holiday sheet: date in column A, name in column B.
pub fn parse_holidays(grid: &Grid) -> Vec<(NaiveDate, String)> {
    let mut holidays = Vec::new();
    for row in grid {
        let Some(date) = row.first().and_then(cell::date) else {
            continue;
        };
        let name = match cell::cell_string(row, 1) {
            s if s.is_empty() => "Feiertag".to_string(),
            s => s,
        };
        holidays.push((date, name));
    }
    holidays
}

/// Resolve the 7-day calendar context for the week starting at `week_start`.
pub fn resolve_calendar(
    week_start: NaiveDate,
    planning: Option<&Grid>,
    holidays: &[(NaiveDate, String)],
    diags: &mut Vec<Diagnostic>,
) -> Vec<CalendarDay> {
    let season = Season::from_month(week_start.month());

    let school_days = match planning {
        Some(grid) => parse_school_band(grid, diags),
        None => HashMap::new(),
    };

    let mut fallback_dates = Vec::new();
    let mut calendar = Vec::with_capacity(7);
    for offset in 0..7 {
        let date = week_start + Days::new(offset);
        let school_day = match school_days.get(&date) {
            Some(flag) => *flag,
            None => {
                fallback_dates.push(date);
                fallback_school_day(date)
            }
        };
        let holiday = holidays
            .iter()
            .find(|(d, _)| *d == date)
            .map(|(_, name)| name.clone());

        calendar.push(CalendarDay {
            date,
            season,
            school_day,
            holiday,
        });
    }

    if !fallback_dates.is_empty() {
        report(
            diags,
            Diagnostic::FallbackCalendar {
                dates: fallback_dates,
            },
        );
    }

    calendar
}

/// Week-level school status: school-free as soon as any day of the week is.
pub fn week_school_status(calendar: &[CalendarDay]) -> SchoolStatus {
    if calendar.iter().any(|day| !day.school_day) {
        SchoolStatus::WithoutSchool
    } else {
        SchoolStatus::WithSchool
    }
}

/// Extract per-date school flags from the planning grid's date/status band.
fn parse_school_band(grid: &Grid, diags: &mut Vec<Diagnostic>) -> HashMap<NaiveDate, bool> {
    let Some(date_row) = locate::find_date_row(grid, DATE_ROW_WINDOW, DATE_COL_START..DATE_COL_END)
    else {
        report(diags, Diagnostic::PlanningBandMissing);
        return HashMap::new();
    };

    let status_row = STATUS_ROW_OFFSETS
        .iter()
        .filter(|offset| date_row >= **offset)
        .find(|offset| row_has_status_keyword(grid, date_row - **offset))
        .map(|offset| date_row - offset)
        .or_else(|| date_row.checked_sub(1));

    let mut school_days = HashMap::new();
    for col in DATE_COL_START..DATE_COL_END {
        let Some(date) = locate::date_at(grid, date_row, col) else {
            continue;
        };

        let status_text = status_row
            .map(|row| cell::cell_string(grid.get(row).map_or(&[][..], Vec::as_slice), col))
            .unwrap_or_default()
            .to_lowercase();
        let school_day = !NO_SCHOOL_KEYWORDS
            .iter()
            .any(|kw| status_text.contains(kw));
        school_days.insert(date, school_day);
    }

    school_days
}

fn row_has_status_keyword(grid: &Grid, row: usize) -> bool {
    let Some(row) = grid.get(row) else {
        return false;
    };
    (DATE_COL_START..DATE_COL_END).any(|col| {
        let text = cell::cell_string(row, col).to_lowercase();
        !text.is_empty() && STATUS_KEYWORDS.iter().any(|kw| text.contains(kw))
    })
}

/// Static vacation calendar: summer break (July and August), winter break
/// (December 24 to January 6) and the semester break (first full week of
/// February). Best-effort typical ranges, used only for dates the planning
/// grid cannot answer.
fn fallback_school_day(date: NaiveDate) -> bool {
    let (month, day) = (date.month(), date.day());

    if month == 7 || month == 8 {
        return false;
    }
    if (month == 12 && day >= 24) || (month == 1 && day <= 6) {
        return false;
    }
    if month == 2 {
        if let Some(first_monday) = (1..=7)
            .filter_map(|d| NaiveDate::from_ymd_opt(date.year(), 2, d))
            .find(|d| d.weekday() == Weekday::Mon)
        {
            let in_semester_break = date >= first_monday && date < first_monday + Days::new(7);
            return !in_semester_break;
        }
    }

    true
}
