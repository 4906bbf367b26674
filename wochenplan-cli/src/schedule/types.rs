//! Domain model for a derived week

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use super::diagnostics::Diagnostic;

/// Calendar season, a pure function of the month. Fixed boundary: June
/// through September is summer, everything else winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        if (6..=9).contains(&month) {
            Season::Summer
        } else {
            Season::Winter
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

/// Whether school is in session. Affects which routes run, which run time
/// applies and which fixed-duty field of a driver is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchoolStatus {
    #[serde(rename = "mit_schule")]
    WithSchool,
    #[serde(rename = "ohne_schule")]
    WithoutSchool,
}

impl SchoolStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SchoolStatus::WithSchool => "mit_schule",
            SchoolStatus::WithoutSchool => "ohne_schule",
        }
    }

    /// Suffix appended to route codes in the planning sheets
    /// (e.g. `411mS` / `411oS`).
    pub fn route_suffix(self) -> &'static str {
        match self {
            SchoolStatus::WithSchool => "mS",
            SchoolStatus::WithoutSchool => "oS",
        }
    }
}

/// One row of the route-definition table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDefinition {
    /// Display label ("Linien/Dienst" column).
    pub label: Option<String>,
    /// Route code, unique within the catalog.
    pub code: String,
    /// Run time while school is in session; absent means the route does not
    /// run in that context.
    pub time_with_school: Option<String>,
    pub time_without_school: Option<String>,
    /// Per-diem amount (Diäten), doubling as the duration proxy.
    pub per_diem: Option<f64>,
    /// Weekday pattern, e.g. `Mo-Fr` or `Sa.`.
    pub weekday_pattern: Option<String>,
    /// Vehicle location (KFZ-Ort).
    pub location: Option<String>,
    /// Non-schedulable special-duty entry (office/dispatch codes carrying no
    /// time or weekday data).
    pub special_duty: bool,
}

impl RouteDefinition {
    pub fn run_time(&self, status: SchoolStatus) -> Option<&str> {
        match status {
            SchoolStatus::WithSchool => self.time_with_school.as_deref(),
            SchoolStatus::WithoutSchool => self.time_without_school.as_deref(),
        }
    }
}

/// Which route codes are active per (season, school status).
#[derive(Debug, Clone, Default)]
pub struct SeasonalActivation {
    columns: Vec<((Season, SchoolStatus), Vec<String>)>,
}

impl SeasonalActivation {
    pub fn insert(&mut self, season: Season, status: SchoolStatus, codes: Vec<String>) {
        self.columns.push(((season, status), codes));
    }

    pub fn active_codes(&self, season: Season, status: SchoolStatus) -> &[String] {
        self.columns
            .iter()
            .find(|(key, _)| *key == (season, status))
            .map(|(_, codes)| codes.as_slice())
            .unwrap_or(&[])
    }
}

/// Employment-type classification derived from the employment percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    Reduced,
    PartTime,
    Unknown,
}

impl EmploymentType {
    pub fn from_percentage(percentage: Option<i64>) -> Self {
        match percentage {
            Some(p) if p >= 100 => EmploymentType::FullTime,
            Some(p) if p >= 80 => EmploymentType::Reduced,
            Some(_) => EmploymentType::PartTime,
            None => EmploymentType::Unknown,
        }
    }
}

/// A driver from the roster sheet, enriched with the planning grid's
/// hours pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub name: String,
    /// Monthly target hours as `"HH:MM"`.
    pub target_hours: Option<String>,
    pub employment_percentage: Option<i64>,
    /// Display-only columns carried from the roster sheet.
    pub vacation_hours: Option<String>,
    pub sick_leave_hours: Option<String>,
    /// Hours already worked this month, filled by the planning-grid pass.
    pub worked_hours: Option<String>,
    /// `target - worked`, floored at zero; absent when either side is.
    pub remaining_hours: Option<String>,
    /// Standing duty while school is in session: empty, `frei`, a special
    /// duty code, or a route code list joined with `+`.
    pub fixed_duty_with_school: Option<String>,
    pub fixed_duty_without_school: Option<String>,
}

impl Driver {
    pub fn new(name: impl Into<String>) -> Self {
        Driver {
            name: name.into(),
            target_hours: None,
            employment_percentage: None,
            vacation_hours: None,
            sick_leave_hours: None,
            worked_hours: None,
            remaining_hours: None,
            fixed_duty_with_school: None,
            fixed_duty_without_school: None,
        }
    }

    pub fn employment_type(&self) -> EmploymentType {
        EmploymentType::from_percentage(self.employment_percentage)
    }

    pub fn fixed_duty(&self, status: SchoolStatus) -> Option<&str> {
        let duty = match status {
            SchoolStatus::WithSchool => self.fixed_duty_with_school.as_deref(),
            SchoolStatus::WithoutSchool => self.fixed_duty_without_school.as_deref(),
        };
        duty.map(str::trim).filter(|d| !d.is_empty())
    }

    /// Details bag persisted alongside the driver name.
    pub fn details(&self) -> serde_json::Value {
        json!({
            "monthly_hours_target": self.target_hours,
            "employment_percentage": self.employment_percentage,
            "employment_type": self.employment_type(),
            "vacation_hours": self.vacation_hours,
            "sick_leave_hours": self.sick_leave_hours,
            "hours_worked_this_month": self.worked_hours,
            "remaining_hours_this_month": self.remaining_hours,
            "fixed_route_with_school": self.fixed_duty_with_school,
            "fixed_route_without_school": self.fixed_duty_without_school,
        })
    }
}

/// One date of the target week with its resolved context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub season: Season,
    /// School in session this date. Defaults to true when unresolvable.
    pub school_day: bool,
    /// Holiday name when the date is a public holiday.
    pub holiday: Option<String>,
}

impl CalendarDay {
    pub fn school_status(&self) -> SchoolStatus {
        if self.school_day {
            SchoolStatus::WithSchool
        } else {
            SchoolStatus::WithoutSchool
        }
    }

    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Regular,
    Saturday,
    SpecialDuty,
}

/// A materialized route occurrence on a concrete date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInstance {
    pub date: NaiveDate,
    pub code: String,
    /// English day name, e.g. `Monday`.
    pub day_of_week: String,
    pub kind: RouteKind,
    /// Per-diem value reused as the duration proxy; zero when absent.
    pub duration_hours: f64,
    pub per_diem: Option<f64>,
    pub run_time: Option<String>,
    pub location: Option<String>,
    pub season: Season,
    pub school_status: SchoolStatus,
}

impl RouteInstance {
    pub fn details(&self) -> serde_json::Value {
        match self.kind {
            RouteKind::SpecialDuty => json!({
                "type": self.kind,
                "duty_code": self.code,
                "duty_name": super::routes::duty_name(&self.code),
                "season": self.season,
                "school_status": self.school_status,
            }),
            _ => json!({
                "type": self.kind,
                "duration_hours": self.duration_hours,
                "diaten": self.per_diem,
                "vad_time": self.run_time,
                "location": self.location,
                "season": self.season,
                "school_status": self.school_status,
            }),
        }
    }
}

/// Exactly one availability outcome per (driver, date) of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityRecord {
    pub driver: String,
    pub date: NaiveDate,
    pub available: bool,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Regular,
    SpecialDuty,
}

/// A driver fixed to a concrete route instance (or special duty) on a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedAssignmentRecord {
    pub driver: String,
    /// Code of the resolved route instance (suffixed form when that is what
    /// matched).
    pub route_code: String,
    pub date: NaiveDate,
    pub kind: AssignmentKind,
    /// Secondary parts of a `A + B` duty code; recorded, not resolved.
    pub additional_routes: Vec<String>,
}

impl FixedAssignmentRecord {
    pub fn details(&self) -> serde_json::Value {
        match self.kind {
            AssignmentKind::SpecialDuty => json!({
                "type": self.kind,
                "duty_code": self.route_code,
                "duty_name": super::routes::duty_name(&self.route_code),
                "blocks_regular_assignment": true,
            }),
            AssignmentKind::Regular => json!({
                "type": self.kind,
                "additional_routes": self.additional_routes,
            }),
        }
    }
}

/// The complete derived week.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySchedule {
    pub week_start: NaiveDate,
    pub season: Season,
    pub school_status: SchoolStatus,
    pub calendar: Vec<CalendarDay>,
    pub routes: Vec<RouteInstance>,
    pub drivers: Vec<Driver>,
    pub availability: Vec<AvailabilityRecord>,
    pub fixed_assignments: Vec<FixedAssignmentRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_boundary() {
        assert_eq!(Season::from_month(5), Season::Winter);
        assert_eq!(Season::from_month(6), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Winter);
    }

    #[test]
    fn employment_classification() {
        assert_eq!(
            EmploymentType::from_percentage(Some(100)),
            EmploymentType::FullTime
        );
        assert_eq!(
            EmploymentType::from_percentage(Some(80)),
            EmploymentType::Reduced
        );
        assert_eq!(
            EmploymentType::from_percentage(Some(50)),
            EmploymentType::PartTime
        );
        assert_eq!(
            EmploymentType::from_percentage(None),
            EmploymentType::Unknown
        );
    }

    #[test]
    fn fixed_duty_trims_and_filters_empty() {
        let mut driver = Driver::new("Huber M.");
        driver.fixed_duty_with_school = Some(" 411 + 412 ".to_string());
        driver.fixed_duty_without_school = Some("   ".to_string());
        assert_eq!(
            driver.fixed_duty(SchoolStatus::WithSchool),
            Some("411 + 412")
        );
        assert_eq!(driver.fixed_duty(SchoolStatus::WithoutSchool), None);
    }
}
