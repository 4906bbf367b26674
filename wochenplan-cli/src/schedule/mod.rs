//! Weekly schedule derivation
//!
//! Turns a loaded planning workbook into the normalized week: route
//! instances, drivers, availability coverage and fixed assignments.
//! Parsing is total past the workbook open; structural problems degrade
//! and land in the result's diagnostics instead of aborting.

pub mod assign;
pub mod calendar;
pub mod diagnostics;
pub mod drivers;
pub mod expand;
pub mod routes;
pub mod types;

use chrono::{Datelike, NaiveDate};

use crate::workbook::Workbook;

use diagnostics::{report, Diagnostic};
pub use types::WeeklySchedule;

/// Candidate sheet names, tried in order, case-insensitive.
pub const ROUTE_SHEET_NAMES: [&str; 2] = ["Dienste", "Routes"];
pub const DRIVER_SHEET_NAMES: [&str; 2] = ["Lenker", "Drivers"];
pub const HOLIDAY_SHEET_NAMES: [&str; 4] = ["Feiertag", "Feiertage", "Holidays", "Freedays"];
pub const PLANNING_SHEET_NAMES: [&str; 4] = ["Dienstplan", "DP-Vorlage", "Planning", "Schedule"];

/// Derive the full week starting at `week_start` (a Monday) from the
/// workbook. Missing sheets degrade: the affected sections come out empty
/// and a diagnostic records which sheet was absent.
pub fn derive_weekly_schedule(workbook: &Workbook, week_start: NaiveDate) -> WeeklySchedule {
    let mut diags = Vec::new();

    let route_sheet = required_sheet(workbook, "routes", &ROUTE_SHEET_NAMES, &mut diags);
    let driver_sheet = required_sheet(workbook, "drivers", &DRIVER_SHEET_NAMES, &mut diags);
    let planning_sheet = required_sheet(workbook, "planning", &PLANNING_SHEET_NAMES, &mut diags);
    // The holiday sheet is genuinely optional; no diagnostic when absent.
    let holiday_sheet = workbook.find_sheet(&HOLIDAY_SHEET_NAMES);

    let mut drivers = match driver_sheet {
        Some(grid) => drivers::parse_driver_roster(grid, &mut diags),
        None => Vec::new(),
    };
    if let Some(grid) = planning_sheet {
        drivers::apply_planning_hours(grid, &mut drivers);
    }

    let holidays = holiday_sheet.map(calendar::parse_holidays).unwrap_or_default();
    let week_calendar = calendar::resolve_calendar(week_start, planning_sheet, &holidays, &mut diags);
    let school_status = calendar::week_school_status(&week_calendar);
    let season = types::Season::from_month(week_start.month());

    let (catalog, activation) = match route_sheet {
        Some(grid) => (
            routes::parse_route_catalog(grid),
            routes::parse_seasonal_activation(grid, &mut diags),
        ),
        None => Default::default(),
    };

    let instances = expand::expand_week(&catalog, &activation, &week_calendar);
    let (availability, fixed_assignments) =
        assign::resolve_assignments(&drivers, &instances, &week_calendar);

    log::info!(
        "week {}: {} routes, {} drivers, {} fixed assignments, {} diagnostics",
        week_start,
        instances.len(),
        drivers.len(),
        fixed_assignments.len(),
        diags.len()
    );

    WeeklySchedule {
        week_start,
        season,
        school_status,
        calendar: week_calendar,
        routes: instances,
        drivers,
        availability,
        fixed_assignments,
        diagnostics: diags,
    }
}

fn required_sheet<'a>(
    workbook: &'a Workbook,
    role: &'static str,
    candidates: &[&str],
    diags: &mut Vec<Diagnostic>,
) -> Option<&'a crate::workbook::Grid> {
    let sheet = workbook.find_sheet(candidates);
    if sheet.is_none() {
        report(
            diags,
            Diagnostic::SheetMissing {
                role,
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
                available: workbook.sheet_names().iter().map(|n| n.to_string()).collect(),
            },
        );
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testgrid::{d, dur, e, f, s, t};
    use crate::workbook::Grid;
    use chrono::Days;
    use types::{RouteKind, SchoolStatus, Season};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 6).unwrap()
    }

    fn route_sheet() -> Grid {
        let mut grid: Grid = vec![
            vec![s("Dienstübersicht")],
            {
                let mut row = vec![e(); 8];
                row.extend([s("SmS"), s("SoS"), s("WmS"), s("WoS")]);
                row
            },
            vec![
                s("Linien/Dienst"),
                s("Dienst-Nr."),
                s("VAD mS"),
                s("VAD oS"),
                s("Diäten"),
                s("Tag"),
                s("KFZ-Ort"),
            ],
        ];
        let mut r411: Vec<calamine::Data> = vec![
            s("Linie 411"),
            s("411"),
            t(6, 45),
            t(7, 30),
            f(26.4),
            s("Mo-Fr"),
            s("Graz"),
        ];
        r411.push(e());
        r411.extend([s("411"), s("411"), s("411"), s("411")]);
        grid.push(r411);

        let mut mb: Vec<calamine::Data> = vec![s("Mobilbüro"), s("MB"), e(), e(), e(), e(), e()];
        mb.push(e());
        mb.extend([s("MB"), s("MB"), e(), e()]);
        grid.push(mb);
        grid
    }

    fn driver_sheet() -> Grid {
        vec![
            vec![s("Lenker"), s("Soll"), s("B-Grad"), e(), e(), s("mS"), s("oS")],
            vec![s("Huber M."), dur(173, 20), s("100%"), e(), e(), s("411"), s("frei")],
            vec![s("Maier K."), dur(86, 40), s("50%"), e(), e(), e(), e()],
        ]
    }

    fn planning_sheet(school: bool) -> Grid {
        let label = if school { "Schule" } else { "schulfrei" };
        let mut status_row = vec![e(), e(), e()];
        status_row.extend((0..7).map(|_| s(label)));
        let mut date_row = vec![e(), e(), e()];
        date_row.extend((0..7).map(|i| d(monday() + Days::new(i))));
        vec![
            vec![s("Dienstplan KW 28")],
            status_row,
            date_row,
            vec![e()],
            vec![s("Lenker"), s("Soll"), s("Ist")],
            vec![s("Huber M."), dur(173, 20), dur(100, 0)],
        ]
    }

    fn workbook(sheets: Vec<(&str, Grid)>) -> Workbook {
        Workbook::from_sheets(
            sheets
                .into_iter()
                .map(|(name, grid)| (name.to_string(), grid))
                .collect(),
        )
    }

    #[test]
    fn full_workbook_derives_a_complete_week() {
        let wb = workbook(vec![
            ("Dienste", route_sheet()),
            ("Lenker", driver_sheet()),
            ("Dienstplan", planning_sheet(true)),
        ]);
        let schedule = derive_weekly_schedule(&wb, monday());

        assert_eq!(schedule.season, Season::Summer);
        assert_eq!(schedule.school_status, SchoolStatus::WithSchool);
        assert!(schedule.diagnostics.is_empty());

        // 411 runs Mo-Fr, MB occupies the five weekdays.
        assert_eq!(schedule.routes.len(), 10);
        assert_eq!(
            schedule
                .routes
                .iter()
                .filter(|r| r.kind == RouteKind::SpecialDuty)
                .count(),
            5
        );

        assert_eq!(schedule.drivers.len(), 2);
        assert_eq!(
            schedule.drivers[0].remaining_hours.as_deref(),
            Some("73:20")
        );

        // Coverage law: 2 drivers x 7 days.
        assert_eq!(schedule.availability.len(), 14);
        // Huber is fixed on 411 every school weekday.
        assert_eq!(schedule.fixed_assignments.len(), 5);
        assert!(schedule
            .fixed_assignments
            .iter()
            .all(|a| a.route_code == "411" && a.driver == "Huber M."));
    }

    #[test]
    fn school_free_week_switches_duty_and_codes() {
        let wb = workbook(vec![
            ("Dienste", route_sheet()),
            ("Lenker", driver_sheet()),
            ("Dienstplan", planning_sheet(false)),
        ]);
        let schedule = derive_weekly_schedule(&wb, monday());

        assert_eq!(schedule.school_status, SchoolStatus::WithoutSchool);
        // Huber's without-school duty is "frei": no assignments, blocked
        // Monday to Friday.
        assert!(schedule.fixed_assignments.is_empty());
        let blocked = schedule
            .availability
            .iter()
            .filter(|a| a.driver == "Huber M." && !a.available)
            .count();
        assert_eq!(blocked, 5);
    }

    #[test]
    fn holiday_sheet_suppresses_the_date() {
        let holiday_sheet: Grid = vec![vec![d(monday()), s("Staatsfeiertag")]];
        let wb = workbook(vec![
            ("Dienste", route_sheet()),
            ("Lenker", driver_sheet()),
            ("Dienstplan", planning_sheet(true)),
            ("Feiertag", holiday_sheet),
        ]);
        let schedule = derive_weekly_schedule(&wb, monday());

        assert!(schedule.routes.iter().all(|r| r.date != monday()));
        let monday_availability: Vec<_> = schedule
            .availability
            .iter()
            .filter(|a| a.date == monday())
            .collect();
        assert!(monday_availability.iter().all(|a| !a.available));
        assert!(monday_availability
            .iter()
            .all(|a| a.note == "Feiertag: Staatsfeiertag"));
    }

    #[test]
    fn missing_sheets_degrade_with_diagnostics() {
        let wb = workbook(vec![("Sonstiges", vec![vec![s("x")]])]);
        let schedule = derive_weekly_schedule(&wb, monday());

        assert!(schedule.routes.is_empty());
        assert!(schedule.drivers.is_empty());
        assert!(schedule.availability.is_empty());
        assert_eq!(schedule.calendar.len(), 7);

        let missing_roles: Vec<&str> = schedule
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::SheetMissing { role, .. } => Some(*role),
                _ => None,
            })
            .collect();
        assert_eq!(missing_roles, ["routes", "drivers", "planning"]);
    }
}
