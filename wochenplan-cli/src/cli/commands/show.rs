//! Show command handler

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::cli::{Section, ShowArgs};
use crate::store::Store;

pub async fn handle(args: ShowArgs, db: Option<&Path>) -> Result<()> {
    super::require_monday(args.week_start)?;
    let store = Store::open(db).await?;

    match args.section {
        Section::Routes => {
            let routes = store.routes_for_week(args.week_start).await?;
            if routes.is_empty() {
                println!("No routes stored for week {}", args.week_start);
            }
            for (date, name, day_of_week, _) in routes {
                println!(
                    "{}  {:<10} {}",
                    date,
                    name.cyan(),
                    day_of_week.unwrap_or_default()
                );
            }
        }
        Section::Drivers => {
            for (name, _) in store.drivers().await? {
                println!("{}", name);
            }
        }
        Section::Availability => {
            for (driver, date, available, notes) in
                store.availability_for_week(args.week_start).await?
            {
                let marker = if available {
                    "available".green()
                } else {
                    "unavailable".red()
                };
                println!(
                    "{}  {:<20} {}  {}",
                    date,
                    driver,
                    marker,
                    notes.unwrap_or_default().dimmed()
                );
            }
        }
        Section::Assignments => {
            for (driver, route, date, _) in store.assignments_for_week(args.week_start).await? {
                println!("{}  {:<20} -> {}", date, driver, route.cyan());
            }
        }
    }

    Ok(())
}
