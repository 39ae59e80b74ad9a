//! Outreach CLI: run a batch of leads through the worker pool and print the final report.

use anyhow::Result;
use clap::Parser;
use outreach::engine::arg_parser::Cli;
use outreach::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
