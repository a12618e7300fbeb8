//! Transcript value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::EmptyTranscriptError;

/// A plain-text transcript that is guaranteed to contain non-whitespace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    /// Validate and wrap raw transcript text.
    ///
    /// The text is kept verbatim; surrounding whitespace is not trimmed.
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyTranscriptError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyTranscriptError);
        }
        Ok(Self { text })
    }

    /// Returns true if `text` would be accepted by [`Transcript::new`]
    pub fn is_valid(text: &str) -> bool {
        !text.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for Transcript {
    type Err = EmptyTranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
