//! Engine module: CLI surface and terminal progress

pub mod arg_parser;
pub mod cli;
pub mod progress;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{apply_cli_to_opts, build_opts, handle_run};
pub use progress::{ProgressBar, setup_progress, update_progress_bar};
