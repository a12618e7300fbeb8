//! Transcript Analyzer CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcript_analyzer::cli::{
    app::{config_store, load_merged_config, run_oneshot, run_server, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{AdapterArgs, Cli, Commands, ServeArgs},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use transcript_analyzer::domain::config::{AdapterMode, AppConfig};
use transcript_analyzer::domain::error::ConfigError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let presenter = Presenter::new();
    let store = config_store(cli.config);

    // Config subcommand works on the file alone
    let command = match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                let code = match e {
                    ConfigError::ValidationError { .. } => EXIT_USAGE_ERROR,
                    _ => EXIT_ERROR,
                };
                return ExitCode::from(code);
            }
            return ExitCode::SUCCESS;
        }
        Some(command) => command,
        None => Commands::Serve(ServeArgs::default()),
    };

    // Build CLI config from args
    let cli_config = match &command {
        Commands::Serve(args) => AppConfig {
            host: args.host.clone(),
            port: args.port,
            ..adapter_config(&args.adapter)
        },
        Commands::Analyze(args) => adapter_config(&args.adapter),
        Commands::Config { .. } => AppConfig::empty(),
    };

    let config = match load_merged_config(&store, cli_config).await {
        Ok(config) => config,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match command {
        Commands::Analyze(args) => run_oneshot(config, &args.text, args.pretty).await,
        _ => run_server(config).await,
    }
}

fn adapter_config(args: &AdapterArgs) -> AppConfig {
    AppConfig {
        model: args.model.clone(),
        adapter_mode: args
            .adapter_mode
            .map(|m| AdapterMode::from(m).to_string()),
        blocking_workers: args.blocking_workers,
        ..AppConfig::empty()
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcript_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
