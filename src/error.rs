//! Error types for calendar-engine

use thiserror::Error;

/// Main error type for the engine and its host binary.
///
/// Picker interaction itself never fails: out-of-range input is clamped and
/// muted input is dropped. Errors only arise at the edges, when parsing host
/// supplied text or loading configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Invalid duration: {0}")]
    Duration(#[from] humantime::DurationError),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid date error for the given input text
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Create a script error pointing at a 1-based line number
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }

    /// Create an "other" error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message() {
        let err = Error::invalid_date("2021-13-01");
        assert_eq!(err.to_string(), "Invalid date '2021-13-01': expected YYYY-MM-DD");
    }

    #[test]
    fn test_script_message() {
        let err = Error::script(3, "unknown command 'jump'");
        assert_eq!(err.to_string(), "Script error on line 3: unknown command 'jump'");
    }
}
