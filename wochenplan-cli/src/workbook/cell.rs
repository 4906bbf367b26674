//! Cell value coercions
//!
//! Planning workbooks mix native date-time cells, elapsed-time cells,
//! decimal numbers and German-locale strings for the same logical field.
//! Every coercion here is total: unparseable input yields an absent value,
//! never an error.
//!
//! Time-of-day and duration deliberately disagree about `"00:00"`: as a run
//! time it is the "route does not run" sentinel and coerces to absent, as a
//! duration it is a valid zero (hours worked) and is retained.

use calamine::{Data, DataType};
use chrono::NaiveDate;

const DATE_FORMATS: [&str; 4] = ["%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Cell as a trimmed string, numbers rendered the way they were typed
/// (whole floats without a trailing `.0`).
pub fn cell_string(row: &[Data], col: usize) -> String {
    row.get(col)
        .map(|c| match c {
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => b.to_string(),
            _ => String::new(),
        })
        .unwrap_or_default()
}

/// Run-time-of-day as `"HH:MM"`. Midnight (native or the literal string
/// `"00:00"`) means "route does not run" and coerces to `None`.
pub fn time_of_day(cell: &Data) -> Option<String> {
    let formatted = match cell {
        Data::DateTime(dt) => {
            let minutes = (dt.as_f64().fract() * 1440.0).round() as i64;
            format_hhmm(minutes)
        }
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.to_string()
        }
        _ => return None,
    };

    if formatted == "00:00" {
        None
    } else {
        Some(formatted)
    }
}

/// Elapsed hours as `"HH:MM"`. Accepts native elapsed/date-time cells,
/// decimal hours (dot or comma separator) and pre-formatted `H:MM` strings.
/// Unlike [`time_of_day`], `"00:00"` is a valid zero duration.
pub fn duration_hours(cell: &Data) -> Option<String> {
    match cell {
        Data::DateTime(dt) => {
            let minutes = (dt.as_f64() * 1440.0).round() as i64;
            Some(format_hhmm(minutes))
        }
        Data::Float(f) => Some(format_hhmm(hours_to_minutes(*f))),
        Data::Int(i) => Some(format_hhmm(i * 60)),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if s.contains(':') {
                Some(s.to_string())
            } else {
                number_str(s).map(|h| format_hhmm(hours_to_minutes(h)))
            }
        }
        _ => None,
    }
}

/// Plain number; German comma decimals are accepted in strings.
pub fn number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => number_str(s),
        _ => None,
    }
}

/// Employment percentage, truncated to a whole number. A trailing `%` on
/// string values is stripped before parsing.
pub fn percentage(cell: &Data) -> Option<i64> {
    match cell {
        Data::Float(f) => Some(*f as i64),
        Data::Int(i) => Some(*i),
        Data::String(s) => number_str(s.trim().trim_end_matches('%')).map(|v| v as i64),
        _ => None,
    }
}

/// Calendar date from a native date-time cell or a formatted string.
pub fn date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        }
        _ => cell.as_datetime().map(|dt| dt.date()),
    }
}

/// `a - b` over `"HH:MM"` durations, floored at zero. Drivers cannot owe
/// negative remaining hours; unparseable operands yield `"00:00"`.
pub fn subtract_duration(a: &str, b: &str) -> String {
    match (parse_hhmm(a), parse_hhmm(b)) {
        (Some(a), Some(b)) => format_hhmm((a - b).max(0)),
        _ => "00:00".to_string(),
    }
}

fn hours_to_minutes(hours: f64) -> i64 {
    (hours.max(0.0) * 60.0).round() as i64
}

fn parse_hhmm(s: &str) -> Option<i64> {
    let (h, m) = s.trim().split_once(':')?;
    let h: i64 = h.trim().parse().ok()?;
    let m: i64 = m.trim().parse().ok()?;
    Some(h * 60 + m)
}

fn format_hhmm(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn number_str(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse().ok()
}
