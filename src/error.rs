//! Domain-specific error types for mind-adapters

use thiserror::Error;

/// Main error type for the schema and content adapters
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Recursive `$ref`s in JSON Schema are not supported by Gemini: {reference}")]
    RecursiveRef { reference: String },

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("{count} schema warning(s) raised and schema.fail_on_warning is set")]
    WarningsRaised { count: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AdapterError {
    fn from(err: toml::de::Error) -> Self {
        AdapterError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
