//! Weekly route expansion
//!
//! Turns the route catalog plus the seasonal activation lists into one
//! route instance per (date, code) that actually runs that day. Holidays
//! suppress the whole date, Sundays never run, and Saturday is isolated
//! both ways: only `…SA` codes run on Saturday, and `…SA` codes run on
//! nothing else — regardless of what a weekday pattern claims.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use super::routes::SCHEDULABLE_DUTY_CODES;
use super::types::{CalendarDay, RouteDefinition, RouteInstance, RouteKind, SeasonalActivation};

/// Suffix marking Saturday-only route codes.
pub const SATURDAY_MARKER: &str = "SA";

const SATURDAY: u32 = 5;
const SUNDAY: u32 = 6;

/// Expand the week into concrete route instances.
pub fn expand_week(
    catalog: &HashMap<String, RouteDefinition>,
    activation: &SeasonalActivation,
    calendar: &[CalendarDay],
) -> Vec<RouteInstance> {
    let mut instances = Vec::new();

    for day in calendar {
        if day.is_holiday() {
            log::debug!("{}: holiday, no routes", day.date);
            continue;
        }
        let weekday = weekday_index(day.date);
        if weekday == SUNDAY {
            continue;
        }

        let status = day.school_status();
        for code in activation.active_codes(day.season, status) {
            let saturday_code = code.to_uppercase().ends_with(SATURDAY_MARKER);
            if saturday_code != (weekday == SATURDAY) {
                continue;
            }

            match catalog.get(code) {
                Some(def) if !def.special_duty => {
                    if !saturday_code && !pattern_includes(def.weekday_pattern.as_deref(), weekday)
                    {
                        continue;
                    }
                    let Some(run_time) = def.run_time(status) else {
                        continue;
                    };
                    if run_time == "00:00" {
                        continue;
                    }
                    instances.push(RouteInstance {
                        date: day.date,
                        code: code.clone(),
                        day_of_week: day_name(weekday).to_string(),
                        kind: if saturday_code {
                            RouteKind::Saturday
                        } else {
                            RouteKind::Regular
                        },
                        duration_hours: def.per_diem.unwrap_or(0.0),
                        per_diem: def.per_diem,
                        run_time: Some(run_time.to_string()),
                        location: def.location.clone(),
                        season: day.season,
                        school_status: status,
                    });
                }
                // Special-duty codes carry no time or weekday data; they
                // occupy weekdays only.
                _ if SCHEDULABLE_DUTY_CODES.contains(&code.as_str()) && weekday < SATURDAY => {
                    instances.push(RouteInstance {
                        date: day.date,
                        code: code.clone(),
                        day_of_week: day_name(weekday).to_string(),
                        kind: RouteKind::SpecialDuty,
                        duration_hours: 0.0,
                        per_diem: None,
                        run_time: None,
                        location: None,
                        season: day.season,
                        school_status: status,
                    });
                }
                _ => {}
            }
        }
    }

    instances
}

/// Monday-based weekday index (0 = Monday, 6 = Sunday).
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

pub fn day_name(weekday: u32) -> &'static str {
    match weekday {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        _ => "Sunday",
    }
}

/// Does a weekday pattern (`Mo-Fr`, `Sa.`, single tokens) include the day?
/// An absent or unparseable pattern includes nothing.
fn pattern_includes(pattern: Option<&str>, weekday: u32) -> bool {
    pattern.is_some_and(|p| parse_weekday_pattern(p).contains(&weekday))
}

fn parse_weekday_pattern(pattern: &str) -> Vec<u32> {
    let pattern = pattern.trim();

    if let Some((from, to)) = pattern.split_once('-') {
        if let (Some(start), Some(end)) = (day_index(from), day_index(to)) {
            if start <= end {
                return (start..=end).collect();
            }
        }
        return Vec::new();
    }

    day_index(pattern).into_iter().collect()
}

/// German day abbreviation (optionally dotted) to Monday-based index.
fn day_index(token: &str) -> Option<u32> {
    let token = token.trim().trim_end_matches('.');
    let index = match token.to_lowercase().as_str() {
        "mo" => 0,
        "di" => 1,
        "mi" => 2,
        "do" => 3,
        "fr" => 4,
        "sa" => 5,
        "so" => 6,
        _ => return None,
    };
    Some(index)
}
