//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::config::AdapterMode;

/// Transcript Analyzer - summaries and next actions for transcripts
#[derive(Parser, Debug)]
#[command(name = "transcript-analyzer")]
#[command(version)]
#[command(about = "HTTP API that summarizes transcripts and extracts next actions")]
#[command(long_about = None)]
pub struct Cli {
    /// Use this config file instead of the XDG default
    #[arg(long, global = true, value_name = "PATH", env = "TRANSCRIPT_ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Analyze a single transcript and print the result as JSON
    Analyze(AnalyzeArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by every command that talks to the language model
#[derive(Args, Debug, Clone, Default)]
pub struct AdapterArgs {
    /// How the language model adapter is driven
    #[arg(long, value_name = "MODE")]
    pub adapter_mode: Option<AdapterModeArg>,

    /// Worker pool size for the blocking adapter
    #[arg(long, value_name = "N")]
    pub blocking_workers: Option<usize>,

    /// Model name
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,
}

/// `serve` options
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    #[command(flatten)]
    pub adapter: AdapterArgs,
}

/// `analyze` options
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Transcript text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub adapter: AdapterArgs,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Adapter mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AdapterModeArg {
    Async,
    Blocking,
}

impl From<AdapterModeArg> for AdapterMode {
    fn from(arg: AdapterModeArg) -> Self {
        match arg {
            AdapterModeArg::Async => AdapterMode::Async,
            AdapterModeArg::Blocking => AdapterMode::Blocking,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "model",
    "base_url",
    "host",
    "port",
    "adapter_mode",
    "blocking_workers",
    "request_timeout_secs",
    "system_prompt",
    "user_prompt_template",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
