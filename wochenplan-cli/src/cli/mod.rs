//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "wochenplan-cli")]
#[command(about = "Derive and store weekly driver schedules from planning workbooks")]
#[command(version)]
pub struct Cli {
    /// Database file (defaults to the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive a week from a workbook and store it
    Upload(UploadArgs),
    /// Derive a week and print it without touching the database
    Inspect(InspectArgs),
    /// Print stored data for a week
    Show(ShowArgs),
}

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Path to the xlsx planning workbook
    pub file: PathBuf,

    /// Monday the week starts on (YYYY-MM-DD)
    #[arg(long)]
    pub week_start: NaiveDate,

    /// Add to existing data for the week instead of replacing it
    #[arg(long)]
    pub append: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the xlsx planning workbook
    pub file: PathBuf,

    /// Monday the week starts on (YYYY-MM-DD)
    #[arg(long)]
    pub week_start: NaiveDate,

    /// Emit the full derived week as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Which stored section to print
    #[arg(value_enum)]
    pub section: Section,

    /// Monday the week starts on (YYYY-MM-DD)
    #[arg(long)]
    pub week_start: NaiveDate,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Section {
    Routes,
    Drivers,
    Availability,
    Assignments,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload(args) => commands::upload::handle(args, cli.db.as_deref()).await,
        Commands::Inspect(args) => commands::inspect::handle(args).await,
        Commands::Show(args) => commands::show::handle(args, cli.db.as_deref()).await,
    }
}
