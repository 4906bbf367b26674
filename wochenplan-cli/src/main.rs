mod cli;
mod schedule;
mod store;
mod workbook;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
