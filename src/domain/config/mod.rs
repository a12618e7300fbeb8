//! Configuration domain module

mod adapter_mode;
mod app_config;

pub use adapter_mode::AdapterMode;
pub use app_config::{
    AppConfig, DEFAULT_BASE_URL, DEFAULT_BLOCKING_WORKERS, DEFAULT_HOST, DEFAULT_MODEL,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
};
