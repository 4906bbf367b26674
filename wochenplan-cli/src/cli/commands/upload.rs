//! Upload command handler

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::cli::UploadArgs;
use crate::schedule::derive_weekly_schedule;
use crate::store::Store;
use crate::workbook::Workbook;

pub async fn handle(args: UploadArgs, db: Option<&Path>) -> Result<()> {
    super::require_monday(args.week_start)?;

    let workbook = Workbook::open(&args.file)?;
    let schedule = derive_weekly_schedule(&workbook, args.week_start);

    println!(
        "Week {} ({}, {})",
        args.week_start.to_string().bright_green().bold(),
        schedule.season.as_str(),
        schedule.school_status.as_str()
    );
    println!(
        "Derived {} routes, {} drivers, {} availability records, {} fixed assignments",
        schedule.routes.len(),
        schedule.drivers.len(),
        schedule.availability.len(),
        schedule.fixed_assignments.len()
    );
    for diagnostic in &schedule.diagnostics {
        println!("{} {}", "warning:".yellow().bold(), diagnostic);
    }

    let store = Store::open(db).await?;
    let summary = store.save_week(&schedule, !args.append).await?;

    println!(
        "{} {} drivers, {} routes, {} availability records, {} assignments ({})",
        "Saved".bright_green().bold(),
        summary.drivers,
        summary.routes,
        summary.availability,
        summary.assignments,
        if args.append { "appended" } else { "replaced week" }
    );

    Ok(())
}
