//! Safedesk incident query server
//!
//! The query side of a safety-incident dashboard: an in-memory incident repository,
//! a pure query engine (column filters, global search, single-column sort, pagination),
//! and a table controller that refetches through a simulated network boundary while
//! discarding superseded responses. Exposed over LSP-style JSON-RPC on stdio.

pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod jsonrpc;
pub mod models;
pub mod service;
pub mod stats;
pub mod store;

/// Application-wide error types with context preservation
#[derive(Debug, thiserror::Error)]
pub enum SafedeskError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Dataset error: {message}")]
    Dataset { message: String, incident_id: Option<String> },

    #[error("Service error: {message}")]
    Service { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl SafedeskError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid query error (caller contract violation)
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a dataset error with optional offending incident ID
    pub fn dataset(message: impl Into<String>, incident_id: Option<String>) -> Self {
        Self::Dataset {
            message: message.into(),
            incident_id,
        }
    }

    /// Create a service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get error code for JSON-RPC responses
    pub fn error_code(&self) -> i32 {
        match self {
            SafedeskError::Configuration { .. } => -32014,
            SafedeskError::InvalidQuery { .. } => -32602,
            SafedeskError::Dataset { .. } => -32010,
            SafedeskError::Service { .. } => -32011,
            SafedeskError::Transport { .. } => -32001,
            SafedeskError::Internal(_) => -32603,
            SafedeskError::Io { .. } => -32603,
            SafedeskError::Serialization { .. } => -32700,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SafedeskError::Configuration { message } => {
                format!("Configuration issue: {}", message)
            }
            SafedeskError::InvalidQuery { message } => {
                format!("Invalid incident query: {}", message)
            }
            SafedeskError::Dataset {
                message,
                incident_id,
            } => {
                if let Some(id) = incident_id {
                    format!("Dataset error ({}): {}", id, message)
                } else {
                    format!("Dataset error: {}", message)
                }
            }
            SafedeskError::Service { message } => {
                format!("Incident service error: {}", message)
            }
            SafedeskError::Transport { message } => {
                format!("Communication error: {}", message)
            }
            SafedeskError::Internal(message) => {
                format!("Internal error: {}", message)
            }
            SafedeskError::Io { source } => {
                format!("File system error: {}", source)
            }
            SafedeskError::Serialization { source } => {
                format!("Data format error: {}", source)
            }
        }
    }
}

/// Convenience type alias for Results
pub type SafedeskResult<T> = Result<T, SafedeskError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn with_dataset_context(self, path: &str) -> SafedeskResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn with_dataset_context(self, path: &str) -> SafedeskResult<T> {
        self.map_err(|e| {
            SafedeskError::dataset(format!("Failed to load {}: {}", path, e.into()), None)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SafedeskError::configuration("Invalid config");
        assert_eq!(err.error_code(), -32014);
        assert!(err.user_message().contains("Configuration issue"));
    }

    #[test]
    fn test_dataset_error_with_id() {
        let err = SafedeskError::dataset("duplicate id", Some("INC-0001".to_string()));
        assert_eq!(err.error_code(), -32010);
        assert!(err.user_message().contains("INC-0001"));
    }

    #[test]
    fn test_invalid_query_maps_to_invalid_params() {
        let err = SafedeskError::invalid_query("pageSize must be greater than 0");
        assert_eq!(err.error_code(), -32602);
        assert_eq!(
            err.to_string(),
            "Invalid query: pageSize must be greater than 0"
        );
    }

    #[test]
    fn test_result_extension() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let safedesk_result = result.with_dataset_context("incidents.json");
        assert!(safedesk_result.is_err());

        if let Err(SafedeskError::Dataset { message, .. }) = safedesk_result {
            assert!(message.contains("incidents.json"));
        } else {
            panic!("Expected Dataset error");
        }
    }
}
