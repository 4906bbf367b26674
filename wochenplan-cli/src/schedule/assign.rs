//! Fixed-duty resolution and availability coverage
//!
//! Standing duties apply Monday to Friday: `frei` blocks the driver, the
//! special-duty codes bind to their expanded instances, and route codes
//! resolve against the week's instances — suffixed form (`411mS`) first,
//! bare code second. Holidays block every driver. Whatever remains gets a
//! default "available" record, so the finished week carries exactly one
//! availability outcome per (driver, date).

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use super::expand::weekday_index;
use super::routes::SCHEDULABLE_DUTY_CODES;
use super::types::{
    AssignmentKind, AvailabilityRecord, CalendarDay, Driver, FixedAssignmentRecord, RouteInstance,
};

const FREE_MARKER: &str = "frei";

/// Resolve fixed assignments and produce full availability coverage.
pub fn resolve_assignments(
    drivers: &[Driver],
    instances: &[RouteInstance],
    calendar: &[CalendarDay],
) -> (Vec<AvailabilityRecord>, Vec<FixedAssignmentRecord>) {
    let instance_keys: HashSet<(&str, NaiveDate)> = instances
        .iter()
        .map(|i| (i.code.as_str(), i.date))
        .collect();

    let mut availability: BTreeMap<(String, NaiveDate), AvailabilityRecord> = BTreeMap::new();
    let mut assignments = Vec::new();

    // Public holidays block every driver.
    for day in calendar {
        let Some(name) = &day.holiday else {
            continue;
        };
        for driver in drivers {
            merge_availability(
                &mut availability,
                AvailabilityRecord {
                    driver: driver.name.clone(),
                    date: day.date,
                    available: false,
                    note: format!("Feiertag: {}", name),
                },
            );
        }
    }

    for driver in drivers {
        for day in calendar {
            // Fixed duties only apply Monday to Friday.
            if day.is_holiday() || weekday_index(day.date) >= 5 {
                continue;
            }
            let status = day.school_status();
            let Some(duty) = driver.fixed_duty(status) else {
                continue;
            };

            if duty.eq_ignore_ascii_case(FREE_MARKER) {
                merge_availability(
                    &mut availability,
                    AvailabilityRecord {
                        driver: driver.name.clone(),
                        date: day.date,
                        available: false,
                        note: format!("Fixdienst: frei ({})", status.as_str()),
                    },
                );
                continue;
            }

            if SCHEDULABLE_DUTY_CODES.contains(&duty) {
                if instance_keys.contains(&(duty, day.date)) {
                    assignments.push(FixedAssignmentRecord {
                        driver: driver.name.clone(),
                        route_code: duty.to_string(),
                        date: day.date,
                        kind: AssignmentKind::SpecialDuty,
                        additional_routes: Vec::new(),
                    });
                } else {
                    log::debug!(
                        "{}: special duty {} has no instance on {}",
                        driver.name,
                        duty,
                        day.date
                    );
                }
                continue;
            }

            // Combined duty codes: only the primary part resolves; the rest
            // ride along in the record's details.
            let mut parts = duty.split('+').map(str::trim).filter(|p| !p.is_empty());
            let Some(primary) = parts.next() else {
                continue;
            };
            let additional: Vec<String> = parts.map(String::from).collect();

            let suffixed = format!("{}{}", primary, status.route_suffix());
            let resolved = if instance_keys.contains(&(suffixed.as_str(), day.date)) {
                Some(suffixed)
            } else if instance_keys.contains(&(primary, day.date)) {
                Some(primary.to_string())
            } else {
                None
            };

            match resolved {
                Some(route_code) => assignments.push(FixedAssignmentRecord {
                    driver: driver.name.clone(),
                    route_code,
                    date: day.date,
                    kind: AssignmentKind::Regular,
                    additional_routes: additional,
                }),
                // Unmatched codes are skipped, not errors.
                None => log::debug!(
                    "{}: fixed duty {} has no instance on {}",
                    driver.name,
                    primary,
                    day.date
                ),
            }
        }
    }

    // Coverage law: exactly one availability outcome per (driver, date).
    for driver in drivers {
        for day in calendar {
            let key = (driver.name.clone(), day.date);
            availability.entry(key).or_insert_with(|| AvailabilityRecord {
                driver: driver.name.clone(),
                date: day.date,
                available: true,
                note: "available".to_string(),
            });
        }
    }

    (availability.into_values().collect(), assignments)
}

/// Insert or augment: unavailability wins, notes concatenate.
fn merge_availability(
    map: &mut BTreeMap<(String, NaiveDate), AvailabilityRecord>,
    record: AvailabilityRecord,
) {
    match map.entry((record.driver.clone(), record.date)) {
        std::collections::btree_map::Entry::Vacant(slot) => {
            slot.insert(record);
        }
        std::collections::btree_map::Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            existing.available &= record.available;
            if !record.note.is_empty() {
                if existing.note.is_empty() {
                    existing.note = record.note;
                } else {
                    existing.note.push_str("; ");
                    existing.note.push_str(&record.note);
                }
            }
        }
    }
}
