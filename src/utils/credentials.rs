//! Session credentials for the real actor: env var → .env in dir → prompt.

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::utils::config::PackagePaths;

/// Login credentials. `Debug` never prints the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `key` from the environment, else from `.env` in `dir`. A malformed `.env` is logged and skipped.
pub fn lookup_credential(dir: &Path, key: &str) -> Option<String> {
    if let Some(s) = non_empty_env(key) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        if let Err(e) = dotenvy::from_path(&env_path) {
            warn!("{}: {}", env_path.display(), e);
        }
        return non_empty_env(key);
    }
    None
}

fn prompt_line(label: &str) -> Result<String> {
    let tag = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    print!("{} {}", tag, label);
    std::io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read username")?;
    Ok(line.trim().to_string())
}

/// Read credentials: env (`OUTREACH_USERNAME` / `OUTREACH_PASSWORD`) → .env in `dir` → prompt.
pub fn get_credentials(dir: &Path) -> Result<Credentials> {
    let paths = PackagePaths::get();
    let user_key = paths.env_key("username");
    let pass_key = paths.env_key("password");

    let username = match lookup_credential(dir, &user_key) {
        Some(u) => u,
        None => prompt_line("Username: ")?,
    };
    let password = match lookup_credential(dir, &pass_key) {
        Some(p) => {
            info!("Password found in environment");
            p
        }
        None => {
            let tag = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
            rpassword::prompt_password(format!("{} Password: ", tag))
                .context("read password")?
                .trim()
                .to_string()
        }
    };
    if username.is_empty() || password.is_empty() {
        anyhow::bail!("credentials are required for a real session ({user_key} / {pass_key})");
    }
    Ok(Credentials { username, password })
}
