//! Error conversion helpers for store and serialization results
//!
//! Provides extension traits for cleaner error handling with key context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait StoreResultExt<T> {
    /// Add store-key context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// store.set(SESSIONS_KEY, &value)
    ///     .with_key_context("save session", SESSIONS_KEY)?;
    /// ```
    fn with_key_context(self, action: &str, key: &str) -> ApplicationResult<T>;
}

impl<T> StoreResultExt<T> for io::Result<T> {
    fn with_key_context(self, action: &str, key: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::persistence(format!("{action}: {key}"), e))
    }
}

/// Extension trait for serde_json results.
pub trait JsonResultExt<T> {
    fn with_json_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_json_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
