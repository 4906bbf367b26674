//! SQLite persistence for derived weeks
//!
//! Drivers are global and upserted by name; routes, availability and fixed
//! assignments are keyed by date and replaced or appended per week. All of
//! a week's writes happen in one transaction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::schedule::WeeklySchedule;

pub struct Store {
    pool: SqlitePool,
}

/// Row counts written by [`Store::save_week`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub drivers: usize,
    pub routes: usize,
    pub availability: usize,
    pub assignments: usize,
}

impl Store {
    /// Open (creating if missing) the database at `path`, or at the default
    /// location under the user data directory.
    pub async fn open(path: Option<&Path>) -> Result<Self> {
        let db_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_db_path()?,
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS drivers (
                driver_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                details TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create drivers table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routes (
                route_id INTEGER PRIMARY KEY AUTOINCREMENT,
                date DATE NOT NULL,
                route_name TEXT NOT NULL,
                day_of_week TEXT,
                details TEXT,
                UNIQUE(date, route_name)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create routes table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS driver_availability (
                availability_id INTEGER PRIMARY KEY AUTOINCREMENT,
                driver_id INTEGER NOT NULL REFERENCES drivers(driver_id),
                date DATE NOT NULL,
                available INTEGER NOT NULL,
                notes TEXT,
                UNIQUE(driver_id, date)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create driver_availability table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS fixed_assignments (
                assignment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                driver_id INTEGER NOT NULL REFERENCES drivers(driver_id),
                route_id INTEGER NOT NULL REFERENCES routes(route_id),
                date DATE NOT NULL,
                details TEXT,
                UNIQUE(driver_id, route_id, date)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create fixed_assignments table")?;

        Ok(())
    }

    /// Persist a derived week. With `replace`, the week's existing routes,
    /// availability and assignments are cleared first; drivers are always
    /// upserted by name.
    pub async fn save_week(&self, schedule: &WeeklySchedule, replace: bool) -> Result<SaveSummary> {
        let week_end = schedule.week_start + Days::new(6);
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        if replace {
            sqlx::query(
                "DELETE FROM fixed_assignments WHERE date BETWEEN ? AND ?",
            )
            .bind(schedule.week_start)
            .bind(week_end)
            .execute(&mut *tx)
            .await
            .context("Failed to clear fixed assignments")?;
            sqlx::query(
                "DELETE FROM driver_availability WHERE date BETWEEN ? AND ?",
            )
            .bind(schedule.week_start)
            .bind(week_end)
            .execute(&mut *tx)
            .await
            .context("Failed to clear availability")?;
            sqlx::query("DELETE FROM routes WHERE date BETWEEN ? AND ?")
                .bind(schedule.week_start)
                .bind(week_end)
                .execute(&mut *tx)
                .await
                .context("Failed to clear routes")?;
        }

        let mut summary = SaveSummary::default();

        let mut driver_ids: HashMap<String, i64> = HashMap::new();
        for driver in &schedule.drivers {
            let (driver_id,): (i64,) = sqlx::query_as(
                "INSERT INTO drivers (name, details) VALUES (?, ?)
                 ON CONFLICT(name) DO UPDATE SET details = excluded.details
                 RETURNING driver_id",
            )
            .bind(&driver.name)
            .bind(driver.details().to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert driver {}", driver.name))?;
            driver_ids.insert(driver.name.clone(), driver_id);
            summary.drivers += 1;
        }

        let mut route_ids: HashMap<(String, NaiveDate), i64> = HashMap::new();
        for route in &schedule.routes {
            let (route_id,): (i64,) = sqlx::query_as(
                "INSERT INTO routes (date, route_name, day_of_week, details)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(date, route_name) DO UPDATE SET
                     day_of_week = excluded.day_of_week,
                     details = excluded.details
                 RETURNING route_id",
            )
            .bind(route.date)
            .bind(&route.code)
            .bind(&route.day_of_week)
            .bind(route.details().to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert route {} on {}", route.code, route.date))?;
            route_ids.insert((route.code.clone(), route.date), route_id);
            summary.routes += 1;
        }

        for record in &schedule.availability {
            let Some(driver_id) = driver_ids.get(&record.driver) else {
                continue;
            };
            sqlx::query(
                "INSERT INTO driver_availability (driver_id, date, available, notes)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(driver_id, date) DO UPDATE SET
                     available = excluded.available,
                     notes = CASE
                         WHEN driver_availability.notes IS NULL
                              OR driver_availability.notes = '' THEN excluded.notes
                         WHEN excluded.notes IS NULL
                              OR excluded.notes = '' THEN driver_availability.notes
                         ELSE driver_availability.notes || '; ' || excluded.notes
                     END",
            )
            .bind(driver_id)
            .bind(record.date)
            .bind(record.available)
            .bind(&record.note)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!("Failed to save availability for {} on {}", record.driver, record.date)
            })?;
            summary.availability += 1;
        }

        for assignment in &schedule.fixed_assignments {
            let Some(driver_id) = driver_ids.get(&assignment.driver) else {
                continue;
            };
            let Some(route_id) = route_ids.get(&(assignment.route_code.clone(), assignment.date))
            else {
                log::warn!(
                    "no stored route {} on {} for assignment of {}",
                    assignment.route_code,
                    assignment.date,
                    assignment.driver
                );
                continue;
            };
            sqlx::query(
                "INSERT OR IGNORE INTO fixed_assignments (driver_id, route_id, date, details)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(driver_id)
            .bind(route_id)
            .bind(assignment.date)
            .bind(assignment.details().to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to save assignment of {} to {}",
                    assignment.driver, assignment.route_code
                )
            })?;
            summary.assignments += 1;
        }

        tx.commit().await.context("Failed to commit week")?;
        Ok(summary)
    }

    /// (date, route name, day of week, details JSON) for the week, ordered.
    pub async fn routes_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<(NaiveDate, String, Option<String>, Option<String>)>> {
        sqlx::query_as(
            "SELECT date, route_name, day_of_week, details FROM routes
             WHERE date BETWEEN ? AND ?
             ORDER BY date, route_name",
        )
        .bind(week_start)
        .bind(week_start + Days::new(6))
        .fetch_all(&self.pool)
        .await
        .context("Failed to load routes")
    }

    /// (name, details JSON) for every known driver.
    pub async fn drivers(&self) -> Result<Vec<(String, Option<String>)>> {
        sqlx::query_as("SELECT name, details FROM drivers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load drivers")
    }

    /// (driver name, date, available, notes) for the week, ordered.
    pub async fn availability_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<(String, NaiveDate, bool, Option<String>)>> {
        sqlx::query_as(
            "SELECT d.name, a.date, a.available, a.notes
             FROM driver_availability a
             JOIN drivers d ON d.driver_id = a.driver_id
             WHERE a.date BETWEEN ? AND ?
             ORDER BY d.name, a.date",
        )
        .bind(week_start)
        .bind(week_start + Days::new(6))
        .fetch_all(&self.pool)
        .await
        .context("Failed to load availability")
    }

    /// (driver name, route name, date, details JSON) for the week, ordered.
    pub async fn assignments_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Vec<(String, String, NaiveDate, Option<String>)>> {
        sqlx::query_as(
            "SELECT d.name, r.route_name, f.date, f.details
             FROM fixed_assignments f
             JOIN drivers d ON d.driver_id = f.driver_id
             JOIN routes r ON r.route_id = f.route_id
             WHERE f.date BETWEEN ? AND ?
             ORDER BY f.date, d.name",
        )
        .bind(week_start)
        .bind(week_start + Days::new(6))
        .fetch_all(&self.pool)
        .await
        .context("Failed to load assignments")
    }
}

fn default_db_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine user data directory")?
        .join("wochenplan");
    Ok(dir.join("wochenplan.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{
        AssignmentKind, AvailabilityRecord, CalendarDay, Driver, FixedAssignmentRecord,
        RouteInstance, RouteKind, SchoolStatus, Season, WeeklySchedule,
    };

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 6).unwrap()
    }

    fn sample_week() -> WeeklySchedule {
        let route = RouteInstance {
            date: monday(),
            code: "411".to_string(),
            day_of_week: "Monday".to_string(),
            kind: RouteKind::Regular,
            duration_hours: 26.4,
            per_diem: Some(26.4),
            run_time: Some("06:45".to_string()),
            location: Some("Graz".to_string()),
            season: Season::Summer,
            school_status: SchoolStatus::WithSchool,
        };
        WeeklySchedule {
            week_start: monday(),
            season: Season::Summer,
            school_status: SchoolStatus::WithSchool,
            calendar: vec![CalendarDay {
                date: monday(),
                season: Season::Summer,
                school_day: true,
                holiday: None,
            }],
            routes: vec![route],
            drivers: vec![Driver::new("Huber M.")],
            availability: vec![AvailabilityRecord {
                driver: "Huber M.".to_string(),
                date: monday(),
                available: true,
                note: "available".to_string(),
            }],
            fixed_assignments: vec![FixedAssignmentRecord {
                driver: "Huber M.".to_string(),
                route_code: "411".to_string(),
                date: monday(),
                kind: AssignmentKind::Regular,
                additional_routes: Vec::new(),
            }],
            diagnostics: Vec::new(),
        }
    }

    #[tokio::test]
    async fn save_and_read_back_a_week() {
        let store = Store::open_in_memory().await.unwrap();
        let summary = store.save_week(&sample_week(), false).await.unwrap();

        assert_eq!(
            summary,
            SaveSummary {
                drivers: 1,
                routes: 1,
                availability: 1,
                assignments: 1
            }
        );

        let routes = store.routes_for_week(monday()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].1, "411");

        let availability = store.availability_for_week(monday()).await.unwrap();
        assert_eq!(availability[0].0, "Huber M.");
        assert!(availability[0].2);

        let assignments = store.assignments_for_week(monday()).await.unwrap();
        assert_eq!(assignments[0].1, "411");
    }

    #[tokio::test]
    async fn replace_clears_the_week_first() {
        let store = Store::open_in_memory().await.unwrap();
        store.save_week(&sample_week(), false).await.unwrap();

        let mut week = sample_week();
        week.routes[0].code = "412".to_string();
        week.fixed_assignments.clear();
        week.availability.clear();
        store.save_week(&week, true).await.unwrap();

        let routes = store.routes_for_week(monday()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].1, "412");
        assert!(store.assignments_for_week(monday()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_merges_availability_notes() {
        let store = Store::open_in_memory().await.unwrap();
        store.save_week(&sample_week(), false).await.unwrap();

        let mut week = sample_week();
        week.availability[0].note = "Fixdienst: frei (mit_schule)".to_string();
        store.save_week(&week, false).await.unwrap();

        let availability = store.availability_for_week(monday()).await.unwrap();
        assert_eq!(availability.len(), 1);
        assert_eq!(
            availability[0].3.as_deref(),
            Some("available; Fixdienst: frei (mit_schule)")
        );
    }

    #[tokio::test]
    async fn drivers_upsert_by_name() {
        let store = Store::open_in_memory().await.unwrap();
        store.save_week(&sample_week(), false).await.unwrap();
        store.save_week(&sample_week(), true).await.unwrap();

        let drivers = store.drivers().await.unwrap();
        assert_eq!(drivers.len(), 1);
    }
}
