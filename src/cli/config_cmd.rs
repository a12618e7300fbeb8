//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::analysis::PromptTemplates;
use crate::domain::config::{AdapterMode, AppConfig};
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "api_key" => {
            if value.trim().is_empty() {
                return Err(invalid("API key cannot be empty".to_string()));
            }
            config.api_key = Some(value.to_string());
        }
        "model" => {
            if value.trim().is_empty() {
                return Err(invalid("Model name cannot be empty".to_string()));
            }
            config.model = Some(value.to_string());
        }
        "base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(
                    "Value must start with http:// or https://".to_string(),
                ));
            }
            config.base_url = Some(value.to_string());
        }
        "host" => {
            if value.trim().is_empty() {
                return Err(invalid("Host cannot be empty".to_string()));
            }
            config.host = Some(value.to_string());
        }
        "port" => {
            let port = value
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| invalid("Value must be a port number (1-65535)".to_string()))?;
            config.port = Some(port);
        }
        "adapter_mode" => {
            let mode = value
                .parse::<AdapterMode>()
                .map_err(|e| invalid(e.to_string()))?;
            config.adapter_mode = Some(mode.to_string());
        }
        "blocking_workers" => {
            config.blocking_workers = Some(parse_positive(value).map_err(invalid)?);
        }
        "request_timeout_secs" => {
            config.request_timeout_secs = Some(parse_positive(value).map_err(invalid)?);
        }
        "system_prompt" => {
            if value.trim().is_empty() {
                return Err(invalid("System prompt cannot be empty".to_string()));
            }
            config.system_prompt = Some(value.to_string());
        }
        "user_prompt_template" => {
            PromptTemplates::new(config.system_prompt.as_deref().unwrap_or_default(), value)
                .map_err(|e| invalid(e.to_string()))?;
            config.user_prompt_template = Some(value.to_string());
        }
        _ => unreachable!(), // Already validated
    }

    Ok(())
}

fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "model" => config.model.clone(),
        "base_url" => config.base_url.clone(),
        "host" => config.host.clone(),
        "port" => config.port.map(|p| p.to_string()),
        "adapter_mode" => config.adapter_mode.clone(),
        "blocking_workers" => config.blocking_workers.map(|n| n.to_string()),
        "request_timeout_secs" => config.request_timeout_secs.map(|n| n.to_string()),
        "system_prompt" => config.system_prompt.clone(),
        "user_prompt_template" => config.user_prompt_template.clone(),
        _ => None,
    }
}

/// Parse a strictly positive integer
fn parse_positive<T>(value: &str) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default())
        .ok_or_else(|| "Value must be a positive integer".to_string())
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
