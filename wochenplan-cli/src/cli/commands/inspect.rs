//! Inspect command handler

use anyhow::{Context, Result};
use colored::*;

use crate::cli::InspectArgs;
use crate::schedule::derive_weekly_schedule;
use crate::workbook::Workbook;

pub async fn handle(args: InspectArgs) -> Result<()> {
    super::require_monday(args.week_start)?;

    let workbook = Workbook::open(&args.file)?;
    let schedule = derive_weekly_schedule(&workbook, args.week_start);

    if args.json {
        let json =
            serde_json::to_string_pretty(&schedule).context("Failed to serialize schedule")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "Week {} ({}, {})",
        schedule.week_start.to_string().bright_green().bold(),
        schedule.season.as_str(),
        schedule.school_status.as_str()
    );

    for day in &schedule.calendar {
        let context = match &day.holiday {
            Some(name) => format!("Feiertag: {}", name).yellow().to_string(),
            None if day.school_day => "Schule".to_string(),
            None => "schulfrei".dimmed().to_string(),
        };
        println!("  {}  {}", day.date, context);
    }

    println!("\n{} ({})", "Routes".bold(), schedule.routes.len());
    for route in &schedule.routes {
        println!(
            "  {}  {:<10} {}  {}",
            route.date,
            route.code.cyan(),
            route.run_time.as_deref().unwrap_or("--:--"),
            route.location.as_deref().unwrap_or("")
        );
    }

    println!("\n{} ({})", "Drivers".bold(), schedule.drivers.len());
    for driver in &schedule.drivers {
        println!(
            "  {:<20} target {}  worked {}",
            driver.name,
            driver.target_hours.as_deref().unwrap_or("-"),
            driver.worked_hours.as_deref().unwrap_or("-")
        );
    }

    println!(
        "\n{} ({})",
        "Fixed assignments".bold(),
        schedule.fixed_assignments.len()
    );
    for assignment in &schedule.fixed_assignments {
        println!(
            "  {}  {:<20} -> {}",
            assignment.date,
            assignment.driver,
            assignment.route_code.cyan()
        );
    }

    let unavailable = schedule.availability.iter().filter(|a| !a.available).count();
    println!(
        "\n{} availability records ({} unavailable)",
        schedule.availability.len(),
        unavailable
    );

    for diagnostic in &schedule.diagnostics {
        println!("{} {}", "warning:".yellow().bold(), diagnostic);
    }

    Ok(())
}
