//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the server and one-shot runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_oneshot, run_server, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{AdapterArgs, AnalyzeArgs, Cli, Commands, ConfigAction, ServeArgs};
pub use presenter::Presenter;
