//! Adapter mode value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidAdapterModeError;

/// How the language-model adapter is bound to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdapterMode {
    /// Awaited directly on the async runtime
    #[default]
    Async,
    /// Run on the bounded blocking worker pool
    Blocking,
}

impl AdapterMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Async => "async",
            Self::Blocking => "blocking",
        }
    }
}

impl FromStr for AdapterMode {
    type Err = InvalidAdapterModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "async" => Ok(Self::Async),
            "blocking" => Ok(Self::Blocking),
            _ => Err(InvalidAdapterModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
