use clap::Parser;
use std::path::PathBuf;

/// Drive a batch of target records through a shared remote session and report per-record status.
#[derive(Clone, Debug, Parser)]
#[command(name = "outreach")]
#[command(about = "Process a batch of leads with a bounded worker pool; simulated by default.")]
pub struct Cli {
    /// Delimited batch file (header row, then id, name, target). Default: leads.csv.
    #[arg(value_name = "BATCH")]
    pub batch: Option<PathBuf>,

    /// Config file. Default: `.outreach.toml` in the working directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the simulated actor (no network, no login). Pass `--simulated=false` for a real session.
    #[arg(long, short = 's', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub simulated: Option<bool>,

    /// Visible session. Cosmetic; has no effect on processing.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub visible: Option<bool>,

    /// Worker count. Real sessions only accept 1; simulated default is 3.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Per-record timeout in seconds.
    #[arg(long, short = 't', value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Field delimiter of the batch file.
    #[arg(long, short = 'd')]
    pub delimiter: Option<char>,

    /// Login endpoint for a real session.
    #[arg(long)]
    pub login_url: Option<String>,

    /// Follow-up message queued for each successful record.
    #[arg(long)]
    pub followup_message: Option<String>,

    /// Record ids the simulated actor should fail. Can specify multiple: --fail-ids 2 5
    #[arg(long, num_args = 1..)]
    pub fail_ids: Vec<String>,

    /// Artificial delay per simulated call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub simulated_delay_ms: Option<u64>,

    /// Print the report as JSON.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Verbose output (debug logs and a progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
