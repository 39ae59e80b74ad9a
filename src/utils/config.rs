//! Application configuration constants.
//! Defaults and pool limits in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn default_batch_filename(&self) -> &'static str {
        "leads.csv"
    }

    /// Environment variable name for a credential field, e.g. `OUTREACH_USERNAME`.
    pub fn env_key(&self, field: &str) -> String {
        format!("{}_{}", self.env_prefix, field.to_uppercase())
    }
}

// ---- Worker pool ----

/// Worker counts per session kind.
#[derive(Clone, Copy, Debug)]
pub struct WorkerLimits {
    /// A live remote session is driven by one worker only.
    pub real: usize,
    /// Default for the simulated actor when no count is requested.
    pub simulated_default: usize,
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self {
            real: Self::REAL_SESSION_WORKERS,
            simulated_default: Self::SIMULATED_DEFAULT_WORKERS,
        }
    }
}

impl WorkerLimits {
    pub const REAL_SESSION_WORKERS: usize = 1;
    pub const SIMULATED_DEFAULT_WORKERS: usize = 3;
}

// ---- Defaults ----

pub struct Defaults;

impl Defaults {
    pub const DELIMITER: char = ',';
    /// One stuck page must not hold a worker longer than this.
    pub const PER_RECORD_TIMEOUT: Duration = Duration::from_secs(30);
    /// Timeout for the login request, which has no per-record scope.
    pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);
    pub const FOLLOWUP_MESSAGE: &'static str = "Hi, thanks for connecting!";
    /// Granularity for scope-aware sleeps and cancellation polling.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(20);
}

// ---- Batch file ----

/// Minimum fields per data row: id, display name, target.
pub const MIN_BATCH_FIELDS: usize = 3;
