//! I/O boundary traits for testability
//!
//! These traits abstract the key-value store and the hosted chat model,
//! allowing services to be tested with in-memory implementations.

use std::io;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key-value blob store; values are JSON trees.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, None if absent.
    fn get(&self, key: &str) -> io::Result<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &serde_json::Value) -> io::Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> io::Result<()>;
}

/// Transcript role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters forwarded with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 800,
        }
    }
}

/// Failures of the chat collaborator. Shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Groq API key not configured. Set GROQ_API_KEY or chat.api_key in the config file.")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from chat service")]
    EmptyResponse,
}

/// Hosted chat model: transcript in, generated text out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Whether credentials are present; checked before any request is built.
    fn is_configured(&self) -> bool;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ChatError>;
}
