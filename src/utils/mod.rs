pub mod config;
pub mod credentials;
pub mod logger;
pub mod outreach_toml;

pub use config::*;
pub use credentials::{Credentials, get_credentials, lookup_credential};
pub use logger::{format_line, setup_logging};
pub use outreach_toml::{OutreachToml, apply_file_to_opts, load_outreach_toml, parse_outreach_toml};
