//! Chat client for Groq's OpenAI-compatible completions endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ChatConfig;
use crate::infrastructure::traits::{ChatClient, ChatError, ChatMessage, ChatOptions};

/// Placeholder shipped in sample env files; treated as missing.
const PLACEHOLDER_KEY: &str = "your_groq_api_key_here";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct GroqClient {
    http: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl GroqClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty() && k != PLACEHOLDER_KEY),
        }
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::NotConfigured)?;
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Groq API request failed".to_string());
            debug!("complete: status={} message={}", status, message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> ChatConfig {
        ChatConfig {
            api_key: api_key.map(String::from),
            ..ChatConfig::default()
        }
    }

    #[test]
    fn given_placeholder_key_when_creating_then_not_configured() {
        assert!(!GroqClient::new(&config(Some(PLACEHOLDER_KEY))).is_configured());
        assert!(!GroqClient::new(&config(Some("  "))).is_configured());
        assert!(!GroqClient::new(&config(None)).is_configured());
        assert!(GroqClient::new(&config(Some("gsk_live"))).is_configured());
    }

    #[tokio::test]
    async fn given_no_key_when_completing_then_not_configured_without_request() {
        let client = GroqClient::new(&ChatConfig {
            api_url: "http://127.0.0.1:9/unreachable".into(),
            ..config(None)
        });
        let err = client
            .complete(&[ChatMessage::user("hi")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::NotConfigured);
    }

    #[test]
    fn given_request_when_serializing_then_openai_shape() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let body = CompletionRequest {
            model: "m",
            messages: &messages,
            temperature: 0.5,
            max_tokens: 10,
            top_p: 1.0,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["stream"], false);
    }
}
