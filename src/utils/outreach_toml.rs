//! Load `.outreach.toml` (CLI only). Library callers build [`Opts`] directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct OutreachToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    batch: Option<String>,
    delimiter: Option<char>,
    simulated: Option<bool>,
    visible_session: Option<bool>,
    workers: Option<usize>,
    timeout_secs: Option<u64>,
    simulated_delay_ms: Option<u64>,
    simulated_failures: Option<Vec<String>>,
    login_url: Option<String>,
    followup_message: Option<String>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Parse config text. Errors are returned so tests can see them; [`load_outreach_toml`] only logs.
pub fn parse_outreach_toml(s: &str) -> Result<OutreachToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file: `explicit` if given, else `.outreach.toml` in `dir`.
/// Returns None if the file is missing or unreadable; a malformed file is logged and ignored.
pub fn load_outreach_toml(dir: &Path, explicit: Option<&Path>) -> Option<OutreachToml> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(PackagePaths::get().config_filename()));
    let s = std::fs::read_to_string(&path).ok()?;
    log::debug!("Loaded config from {}", path.display());
    parse_outreach_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &OutreachToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.batch {
        opts.batch_path = PathBuf::from(p);
    }
    apply_file_opt!(sec, opts, delimiter => delimiter);
    apply_file_opt!(sec, opts, simulated => simulated);
    apply_file_opt!(sec, opts, visible_session => visible_session);
    if let Some(n) = sec.workers {
        opts.workers = Some(n);
    }
    if let Some(secs) = sec.timeout_secs {
        opts.per_record_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = sec.simulated_delay_ms {
        opts.simulated_delay = Duration::from_millis(ms);
    }
    apply_file_opt!(sec, opts, simulated_failures => simulated_failures);
    if let Some(ref url) = sec.login_url {
        opts.login_url = Some(url.clone());
    }
    apply_file_opt!(sec, opts, followup_message => followup_message);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, json => json);
}
