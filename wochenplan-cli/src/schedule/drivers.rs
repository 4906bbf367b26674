//! Driver roster parsing
//!
//! The roster sheet lists one driver per row. A header row marked "Lenker"
//! (or "Name") usually precedes the data but is sometimes missing, in which
//! case data is read from the top. The planning grid repeats the driver list
//! with the hours actually worked this month; that pass folds worked and
//! remaining hours into the already-parsed roster.

use crate::workbook::{cell, locate, Grid};

use super::diagnostics::{report, Diagnostic};
use super::types::Driver;

pub const DRIVER_MARKERS: [&str; 2] = ["Lenker", "Name"];
const MARKER_WINDOW: usize = 10;

/// Column layout of the roster sheet.
mod cols {
    pub const NAME: usize = 0;
    pub const TARGET_HOURS: usize = 1;
    pub const EMPLOYMENT: usize = 2;
    pub const VACATION_HOURS: usize = 3;
    pub const SICK_HOURS: usize = 4;
    pub const FIXED_WITH_SCHOOL: usize = 5;
    pub const FIXED_WITHOUT_SCHOOL: usize = 6;
}

/// Parse the driver roster. Rows are read until the first blank name.
pub fn parse_driver_roster(grid: &Grid, diags: &mut Vec<Diagnostic>) -> Vec<Driver> {
    let start = match locate::find_marker_row(grid, cols::NAME, &DRIVER_MARKERS, MARKER_WINDOW) {
        Some(header_row) => header_row + 1,
        None => {
            report(diags, Diagnostic::RosterHeaderMissing);
            0
        }
    };

    let mut drivers = Vec::new();
    for row in &grid[start.min(grid.len())..] {
        let name = cell::cell_string(row, cols::NAME);
        if name.is_empty() {
            break;
        }

        let mut driver = Driver::new(name);
        driver.target_hours = row.get(cols::TARGET_HOURS).and_then(cell::duration_hours);
        driver.employment_percentage = row.get(cols::EMPLOYMENT).and_then(cell::percentage);
        driver.vacation_hours = row.get(cols::VACATION_HOURS).and_then(cell::duration_hours);
        driver.sick_leave_hours = row.get(cols::SICK_HOURS).and_then(cell::duration_hours);
        driver.fixed_duty_with_school = duty_cell(row, cols::FIXED_WITH_SCHOOL);
        driver.fixed_duty_without_school = duty_cell(row, cols::FIXED_WITHOUT_SCHOOL);
        drivers.push(driver);
    }

    drivers
}

/// Hours columns of the planning grid's driver section.
mod planning_cols {
    pub const NAME: usize = 0;
    pub const TARGET_HOURS: usize = 1;
    pub const WORKED_HOURS: usize = 2;
}

const PLANNING_MARKER_WINDOW: usize = 20;

/// Fold worked hours from the planning grid into the roster. Remaining
/// hours are `target - worked` floored at zero, left unset when either
/// side is missing.
pub fn apply_planning_hours(grid: &Grid, drivers: &mut [Driver]) {
    let Some(header_row) = locate::find_marker_row(
        grid,
        planning_cols::NAME,
        &DRIVER_MARKERS,
        PLANNING_MARKER_WINDOW,
    ) else {
        // The planning grid has other uses (date band); no driver section
        // is not worth a diagnostic of its own.
        log::debug!("planning grid has no driver hours section");
        return;
    };

    for row in &grid[(header_row + 1).min(grid.len())..] {
        let name = cell::cell_string(row, planning_cols::NAME);
        if name.is_empty() {
            break;
        }

        let Some(driver) = drivers.iter_mut().find(|d| d.name == name) else {
            continue;
        };

        let target = row
            .get(planning_cols::TARGET_HOURS)
            .and_then(cell::duration_hours);
        let worked = row
            .get(planning_cols::WORKED_HOURS)
            .and_then(cell::duration_hours);

        driver.worked_hours = worked.clone();
        if let (Some(target), Some(worked)) = (target.as_deref(), worked.as_deref()) {
            driver.remaining_hours = Some(cell::subtract_duration(target, worked));
        }
    }
}

fn duty_cell(row: &[calamine::Data], col: usize) -> Option<String> {
    let value = cell::cell_string(row, col);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testgrid::{dur, e, f, s};

    fn roster_grid() -> Grid {
        vec![
            vec![s("Lenkerliste KW 28")],
            vec![
                s("Lenker"),
                s("Soll-Std."),
                s("B-Grad"),
                s("Feiertag"),
                s("Krankenstand"),
                s("Fixdienst mS"),
                s("Fixdienst oS"),
            ],
            vec![
                s("Huber M."),
                dur(173, 20),
                s("100%"),
                e(),
                e(),
                s("411 + 412"),
                s("frei"),
            ],
            vec![s("Maier K."), s("86,67"), f(50.0), e(), e(), e(), s("MB")],
            vec![e()],
            vec![s("orphan below blank row")],
        ]
    }

    #[test]
    fn parses_rows_below_header_until_blank() {
        let mut diags = Vec::new();
        let drivers = parse_driver_roster(&roster_grid(), &mut diags);
        assert_eq!(drivers.len(), 2);
        assert!(diags.is_empty());

        let huber = &drivers[0];
        assert_eq!(huber.name, "Huber M.");
        assert_eq!(huber.target_hours.as_deref(), Some("173:20"));
        assert_eq!(huber.employment_percentage, Some(100));
        assert_eq!(huber.fixed_duty_with_school.as_deref(), Some("411 + 412"));
        assert_eq!(huber.fixed_duty_without_school.as_deref(), Some("frei"));

        let maier = &drivers[1];
        assert_eq!(maier.target_hours.as_deref(), Some("86:40"));
        assert_eq!(maier.fixed_duty_with_school, None);
    }

    #[test]
    fn headerless_sheet_reads_from_the_top() {
        let grid: Grid = vec![
            vec![s("Huber M."), dur(173, 20)],
            vec![s("Maier K."), dur(86, 40)],
        ];
        let mut diags = Vec::new();
        let drivers = parse_driver_roster(&grid, &mut diags);
        assert_eq!(drivers.len(), 2);
        assert_eq!(diags, [Diagnostic::RosterHeaderMissing]);
    }

    #[test]
    fn planning_hours_fold_into_roster() {
        let mut drivers = vec![Driver::new("Huber M."), Driver::new("Maier K.")];
        let grid: Grid = vec![
            vec![s("Lenker"), s("Soll"), s("Ist")],
            vec![s("Huber M."), dur(173, 20), dur(120, 5)],
            vec![s("Maier K."), dur(86, 40), e()],
            vec![s("Unknown P."), dur(10, 0), dur(5, 0)],
        ];
        apply_planning_hours(&grid, &mut drivers);

        assert_eq!(drivers[0].worked_hours.as_deref(), Some("120:05"));
        assert_eq!(drivers[0].remaining_hours.as_deref(), Some("53:15"));
        // Worked hours missing: remaining stays unset.
        assert_eq!(drivers[1].worked_hours, None);
        assert_eq!(drivers[1].remaining_hours, None);
    }

    #[test]
    fn remaining_hours_floor_at_zero() {
        let mut drivers = vec![Driver::new("Huber M.")];
        let grid: Grid = vec![
            vec![s("Lenker")],
            vec![s("Huber M."), dur(86, 40), dur(120, 0)],
        ];
        apply_planning_hours(&grid, &mut drivers);
        assert_eq!(drivers[0].remaining_hours.as_deref(), Some("00:00"));
    }
}
