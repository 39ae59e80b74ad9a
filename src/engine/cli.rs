//! CLI command handler: layer config, install Ctrl+C, run the batch, print the report.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::pipeline::RunScope;
use crate::run::run;
use crate::utils::{apply_file_to_opts, load_outreach_toml, setup_logging};

/// Defaults, then the config file, then CLI flags.
pub fn build_opts(cli: &Cli, cwd: &Path) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_outreach_toml(cwd, cli.config.as_deref()) {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_cli_to_opts(cli, &mut opts);
    opts
}

/// Apply only the flags that were given.
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(ref p) = cli.batch {
        opts.batch_path = p.clone();
    }
    if let Some(v) = cli.simulated {
        opts.simulated = v;
    }
    if let Some(v) = cli.visible {
        opts.visible_session = v;
    }
    if let Some(n) = cli.workers {
        opts.workers = Some(n);
    }
    if let Some(secs) = cli.timeout {
        opts.per_record_timeout = Duration::from_secs(secs);
    }
    if let Some(d) = cli.delimiter {
        opts.delimiter = d;
    }
    if let Some(ref url) = cli.login_url {
        opts.login_url = Some(url.clone());
    }
    if let Some(ref msg) = cli.followup_message {
        opts.followup_message = msg.clone();
    }
    if !cli.fail_ids.is_empty() {
        opts.simulated_failures = cli.fail_ids.clone();
    }
    if let Some(ms) = cli.simulated_delay_ms {
        opts.simulated_delay = Duration::from_millis(ms);
    }
    if let Some(v) = cli.json {
        opts.json = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
}

/// Run one batch end to end. Fatal errors are returned (non-zero exit); per-record failures
/// only show up in the report.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let opts = build_opts(cli, &cwd);
    setup_logging(opts.verbose);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    if opts.simulated {
        warn!("RUNNING IN SIMULATED MODE. NO REMOTE ACTIONS WILL BE PERFORMED.");
    }

    let scope = RunScope::new();
    let cancel_flag = scope.cancel_flag();
    ctrlc::set_handler(move || {
        cancel_flag.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let report = run(&opts, &scope)?;

    if opts.json {
        println!("{}", report.to_json().context("serialize report")?);
    } else {
        report.print();
    }
    if scope.is_cancelled() {
        warn!("Run cancelled by user; unprocessed records are reported as failed");
    }
    Ok(())
}
