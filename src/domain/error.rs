//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::StructureKind;

/// Domain errors signal that an operation could not complete as requested.
/// They are recovered at the workbench boundary and rendered as log lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{kind} is empty")]
    EmptyStructure { kind: StructureKind },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported operation: {operation} on {kind}")]
    UnsupportedOperation { kind: StructureKind, operation: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
