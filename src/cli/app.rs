//! Application runners: configuration loading, wiring, server and one-shot mode

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AnalysisResponse, AppState};
use crate::application::ports::{ConfigStore, LanguageModelError};
use crate::application::{AdapterBinding, AnalyzeError, TranscriptAnalyzer};
use crate::domain::config::{AdapterMode, AppConfig};
use crate::domain::error::{ConfigError, InvalidAdapterModeError, PromptTemplateError};
use crate::infrastructure::{
    InMemoryAnalysisRepository, OpenAiBlockingLanguageModel, OpenAiLanguageModel, OpenAiSettings,
    XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_HOST: &str = "TRANSCRIPT_ANALYZER_HOST";
pub const ENV_PORT: &str = "TRANSCRIPT_ANALYZER_PORT";
pub const ENV_MODEL: &str = "TRANSCRIPT_ANALYZER_MODEL";
pub const ENV_BASE_URL: &str = "TRANSCRIPT_ANALYZER_BASE_URL";

/// Errors that stop the process before it can serve or analyze anything
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AdapterMode(#[from] InvalidAdapterModeError),

    #[error(transparent)]
    Prompt(#[from] PromptTemplateError),

    #[error("Language model unavailable: {0}")]
    Adapter(#[from] LanguageModelError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(std::io::Error),
}

impl StartupError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::AdapterMode(_) | Self::Prompt(_) => EXIT_USAGE_ERROR,
            Self::Adapter(LanguageModelError::MissingApiKey) => EXIT_USAGE_ERROR,
            Self::Adapter(_) | Self::Bind { .. } | Self::Server(_) => EXIT_ERROR,
        }
    }
}

/// Config store for an explicit path, or the XDG default
pub fn config_store(path: Option<PathBuf>) -> XdgConfigStore {
    match path {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    }
}

/// Configuration taken from environment variables
pub fn env_config() -> Result<AppConfig, ConfigError> {
    let var = |name: &str| env::var(name).ok().filter(|s| !s.trim().is_empty());

    let port = match var(ENV_PORT) {
        Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
            ConfigError::ValidationError {
                key: ENV_PORT.to_string(),
                message: format!("'{}' is not a valid port", raw),
            }
        })?),
        None => None,
    };

    Ok(AppConfig {
        api_key: var(ENV_API_KEY),
        host: var(ENV_HOST),
        port,
        model: var(ENV_MODEL),
        base_url: var(ENV_BASE_URL),
        ..Default::default()
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(
    store: &S,
    cli_config: AppConfig,
) -> Result<AppConfig, ConfigError> {
    let file_config = store.load().await?;
    let env_config = env_config()?;

    // Merge: defaults < file < env < cli
    Ok(AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config))
}

/// Wire the analyzer from configuration.
///
/// Fails when the adapter cannot be constructed or a configured value is
/// invalid; nothing falls back silently.
pub fn build_analyzer(config: &AppConfig) -> Result<TranscriptAnalyzer, StartupError> {
    let mode = match config.adapter_mode.as_deref() {
        Some(raw) => raw.parse::<AdapterMode>()?,
        None => AdapterMode::default(),
    };
    let prompts = config.prompt_templates()?;

    let settings = OpenAiSettings::new(config.api_key.clone().unwrap_or_default())
        .with_model(config.model_or_default())
        .with_base_url(config.base_url_or_default())
        .with_timeout(Duration::from_secs(config.request_timeout_secs_or_default()));

    let binding = match mode {
        AdapterMode::Async => AdapterBinding::non_blocking(OpenAiLanguageModel::new(settings)?),
        AdapterMode::Blocking => AdapterBinding::blocking(
            OpenAiBlockingLanguageModel::new(settings)?,
            config.blocking_workers_or_default(),
        ),
    };

    info!(
        mode = %binding.mode(),
        model = config.model_or_default(),
        "language model adapter bound"
    );
    Ok(TranscriptAnalyzer::new(binding, prompts))
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_server(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    match serve(&config).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            if matches!(e, StartupError::Adapter(LanguageModelError::MissingApiKey)) {
                presenter.info(&format!(
                    "Set {} or run 'transcript-analyzer config set api_key <key>'",
                    ENV_API_KEY
                ));
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn serve(config: &AppConfig) -> Result<(), StartupError> {
    let analyzer = build_analyzer(config)?;
    let state = AppState::new(analyzer, InMemoryAnalysisRepository::new());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host_or_default(), config.port_or_default());
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Transcript analyzer listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Server)?;

    info!("Server stopped");
    Ok(())
}

/// Analyze a single transcript and print the result as JSON on stdout
pub async fn run_oneshot(config: AppConfig, text: &str, pretty: bool) -> ExitCode {
    let mut presenter = Presenter::new();

    let analyzer = match build_analyzer(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(e.exit_code());
        }
    };

    presenter.start_spinner("Analyzing transcript...");
    let analysis = match analyzer.analyze(text).await {
        Ok(analysis) => {
            presenter.spinner_success("Analysis complete");
            analysis
        }
        Err(e) => {
            presenter.spinner_fail("Analysis failed");
            presenter.error(&e.to_string());
            let code = match e {
                AnalyzeError::InvalidInput(_) => EXIT_USAGE_ERROR,
                _ => EXIT_ERROR,
            };
            return ExitCode::from(code);
        }
    };

    let response = AnalysisResponse::from(&analysis);
    let json = if pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };

    match json {
        Ok(json) => {
            presenter.output(&json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Failed to encode result: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
