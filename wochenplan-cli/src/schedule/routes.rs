//! Route catalog parsing
//!
//! The route sheet carries two tables: the route-definition table on the
//! left (fixed layout, data from row 4) and the seasonal activation table
//! further right, headed by the four tokens `SmS`, `SoS`, `WmS`, `WoS`
//! (summer/winter × with/without school).

use std::collections::{HashMap, HashSet};

use crate::workbook::{cell, locate, Grid};

use super::diagnostics::{report, Diagnostic};
use super::types::{RouteDefinition, Season, SchoolStatus, SeasonalActivation};

/// Non-route markers that appear in code columns: holiday (FT), sick (K),
/// free (FREI), vacation (U) plus the special-duty codes.
pub const SENTINEL_CODES: [&str; 7] = ["FT", "K", "FREI", "U", "SOF", "MB", "DI"];

/// The three genuine special-duty codes, catalogued without time or
/// weekday data.
pub const SPECIAL_DUTY_CODES: [&str; 3] = ["MB", "DI", "SOF"];

/// Special duties that occupy a driver Monday to Friday. SOF marks ad-hoc
/// trips and is never scheduled as a standing duty.
pub const SCHEDULABLE_DUTY_CODES: [&str; 2] = ["MB", "DI"];

/// Sentinels filtered from the activation columns. MB and DI stay: they
/// expand into special-duty instances.
const ACTIVATION_SENTINELS: [&str; 5] = ["FT", "K", "FREI", "U", "SOF"];

pub fn duty_name(code: &str) -> &'static str {
    match code {
        "MB" => "Mobilbüro",
        "DI" => "Dispo",
        "SOF" => "Sonderfahrt",
        _ => "Sonderdienst",
    }
}

/// Column layout of the route-definition table.
mod cols {
    pub const LABEL: usize = 0;
    pub const CODE: usize = 1;
    pub const TIME_WITH_SCHOOL: usize = 2;
    pub const TIME_WITHOUT_SCHOOL: usize = 3;
    pub const PER_DIEM: usize = 4;
    pub const WEEKDAYS: usize = 5;
    pub const LOCATION: usize = 6;
}

/// First data row of the route-definition table (0-based).
const DEFINITION_START_ROW: usize = 2;
const DEFINITION_SCAN_ROWS: usize = 100;

const CODE_HEADER_LABELS: [&str; 2] = ["Dienst-Nr.", "Dienst-Nr"];

/// Parse the route-definition table into a code-keyed catalog.
pub fn parse_route_catalog(grid: &Grid) -> HashMap<String, RouteDefinition> {
    let mut catalog = HashMap::new();

    let end = grid.len().min(DEFINITION_START_ROW + DEFINITION_SCAN_ROWS);
    for row in &grid[DEFINITION_START_ROW.min(grid.len())..end] {
        let code = cell::cell_string(row, cols::CODE);
        if code.is_empty() || CODE_HEADER_LABELS.iter().any(|h| code.eq_ignore_ascii_case(h)) {
            continue;
        }

        if SPECIAL_DUTY_CODES.contains(&code.as_str()) {
            let label = non_empty(cell::cell_string(row, cols::LABEL))
                .or_else(|| Some(duty_name(&code).to_string()));
            catalog.insert(
                code.clone(),
                RouteDefinition {
                    label,
                    code,
                    time_with_school: None,
                    time_without_school: None,
                    per_diem: None,
                    weekday_pattern: None,
                    location: None,
                    special_duty: true,
                },
            );
            continue;
        }

        if SENTINEL_CODES.contains(&code.as_str()) {
            continue;
        }

        let definition = RouteDefinition {
            label: non_empty(cell::cell_string(row, cols::LABEL)),
            code: code.clone(),
            time_with_school: row.get(cols::TIME_WITH_SCHOOL).and_then(cell::time_of_day),
            time_without_school: row
                .get(cols::TIME_WITHOUT_SCHOOL)
                .and_then(cell::time_of_day),
            per_diem: row.get(cols::PER_DIEM).and_then(cell::number),
            weekday_pattern: non_empty(cell::cell_string(row, cols::WEEKDAYS)),
            location: non_empty(cell::cell_string(row, cols::LOCATION)),
            special_duty: false,
        };
        catalog.insert(code, definition);
    }

    catalog
}

/// Header band scan window for the seasonal activation table.
const ACTIVATION_HEADER_ROWS: usize = 10;
const ACTIVATION_HEADER_COLS: usize = 30;
const ACTIVATION_SCAN_ROWS: usize = 100;

/// The four season columns, in their fixed relative order.
const ACTIVATION_KEYS: [(Season, SchoolStatus); 4] = [
    (Season::Summer, SchoolStatus::WithSchool),
    (Season::Summer, SchoolStatus::WithoutSchool),
    (Season::Winter, SchoolStatus::WithSchool),
    (Season::Winter, SchoolStatus::WithoutSchool),
];

/// Parse the seasonal activation table. The `SmS` header anchors the band;
/// the remaining three columns follow in fixed relative order.
pub fn parse_seasonal_activation(grid: &Grid, diags: &mut Vec<Diagnostic>) -> SeasonalActivation {
    let mut activation = SeasonalActivation::default();

    let Some((header_row, start_col)) =
        locate::find_token(grid, ACTIVATION_HEADER_ROWS, ACTIVATION_HEADER_COLS, "SmS")
    else {
        report(diags, Diagnostic::SeasonalTableMissing);
        return activation;
    };

    for (offset, (season, status)) in ACTIVATION_KEYS.iter().enumerate() {
        let col = start_col + offset;
        let mut codes = Vec::new();

        let end = grid.len().min(header_row + 1 + ACTIVATION_SCAN_ROWS);
        for row in &grid[(header_row + 1).min(grid.len())..end] {
            let code = cell::cell_string(row, col);
            if code.is_empty() || ACTIVATION_SENTINELS.contains(&code.as_str()) {
                continue;
            }
            codes.push(code);
        }

        activation.insert(*season, *status, fold_shift_variants(codes));
    }

    activation
}

/// Fold `-vor`/`-nach` split-shift variants into their base code when the
/// base is not independently listed. Duplicates collapse, order preserved.
fn fold_shift_variants(codes: Vec<String>) -> Vec<String> {
    let bases: HashSet<&str> = codes
        .iter()
        .filter(|c| shift_base(c).is_none())
        .map(String::as_str)
        .collect();

    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for code in &codes {
        let folded = match shift_base(code) {
            Some(base) if !bases.contains(base) => {
                log::debug!("folding split-shift code {} into {}", code, base);
                base.to_string()
            }
            _ => code.clone(),
        };
        if seen.insert(folded.clone()) {
            out.push(folded);
        }
    }
    out
}

fn shift_base(code: &str) -> Option<&str> {
    code.strip_suffix("-vor").or_else(|| code.strip_suffix("-nach"))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
