//! Error types and handling for the travel planner

use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors, including a missing or unusable API key
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failures of the outbound generation request
    #[error("Generation error: {message}")]
    Generation { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get the message shown on the page for this error
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { message } => {
                format!("Invalid API key or authentication error: {message}")
            }
            PlannerError::Generation { message } => {
                format!("Error: {message}")
            }
            PlannerError::Validation { message } => message.clone(),
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            PlannerError::General { message } => message.clone(),
        }
    }
}
