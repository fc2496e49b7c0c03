//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::ChatError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("persistence failure: {context}")]
    Persistence {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    ChatService(#[from] ChatError),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("a sort is already running")]
    SortInProgress,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn persistence(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persistence {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
