//! Parse diagnostics
//!
//! The engine never aborts on malformed structure; it degrades and reports.
//! Diagnostics are collected beside the result (so callers and tests can
//! assert on them) and mirrored to the log.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A required sheet was not found under any candidate name.
    SheetMissing {
        role: &'static str,
        candidates: Vec<String>,
        available: Vec<String>,
    },
    /// The seasonal activation header band (SmS/SoS/WmS/WoS) was not found.
    SeasonalTableMissing,
    /// No driver header marker; roster parsing assumed data starts at row 1.
    RosterHeaderMissing,
    /// The planning grid's date/status band could not be located.
    PlanningBandMissing,
    /// School status for these dates came from the static vacation calendar.
    FallbackCalendar { dates: Vec<NaiveDate> },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::SheetMissing {
                role,
                candidates,
                available,
            } => write!(
                f,
                "{} sheet not found (looked for {}; workbook has {})",
                role,
                candidates.join(", "),
                available.join(", ")
            ),
            Diagnostic::SeasonalTableMissing => {
                write!(f, "seasonal activation table (SmS/SoS/WmS/WoS) not found")
            }
            Diagnostic::RosterHeaderMissing => {
                write!(f, "no driver header row; reading roster from the top")
            }
            Diagnostic::PlanningBandMissing => {
                write!(f, "planning grid date/status band not found")
            }
            Diagnostic::FallbackCalendar { dates } => write!(
                f,
                "school status from static vacation calendar for {} date(s)",
                dates.len()
            ),
        }
    }
}

/// Record a diagnostic: collect it and mirror it to the log.
pub fn report(diags: &mut Vec<Diagnostic>, diag: Diagnostic) {
    log::warn!("{}", diag);
    diags.push(diag);
}
