//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dsviz/dsviz.toml`
//! 3. `GROQ_API_KEY` for the chat key
//! 4. Environment variables: `DSVIZ_*` prefix, `__` between table and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::traits::ChatOptions;
use crate::util::path::expand_path;

pub const DEFAULT_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";

/// Chat collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible chat-completions endpoint
    pub api_url: String,
    pub model: String,
    /// Bearer token; chat is disabled without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Prior transcript messages sent with each request
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let options = ChatOptions::default();
        Self {
            api_url: DEFAULT_CHAT_URL.into(),
            model: DEFAULT_CHAT_MODEL.into(),
            api_key: None,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            history_window: 6,
        }
    }
}

impl ChatConfig {
    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Raw chat config for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawChatConfig {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub history_window: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub speed: Option<u32>,
    pub array_size: Option<usize>,
    pub chat: RawChatConfig,
}

/// Unified configuration for dsviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Data directory (default: ~/.dsviz); the store lives in `data_dir/store`
    pub data_dir: PathBuf,
    /// Playback speed percent, 1..=100
    pub speed: u32,
    /// Length of generated sort arrays
    pub array_size: usize,
    pub chat: ChatConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            speed: 50,
            array_size: 30,
            chat: ChatConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".dsviz"))
        .unwrap_or_else(|| PathBuf::from("~/.dsviz"))
}

/// Get the XDG config directory for dsviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dsviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dsviz.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Directory of the JSON file store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
    }

    /// Overlay values the file specified.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let chat = &global.chat;
        Self {
            data_dir: global
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            speed: global.speed.unwrap_or(self.speed),
            array_size: global.array_size.unwrap_or(self.array_size),
            chat: ChatConfig {
                api_url: chat
                    .api_url
                    .clone()
                    .unwrap_or_else(|| self.chat.api_url.clone()),
                model: chat.model.clone().unwrap_or_else(|| self.chat.model.clone()),
                api_key: chat.api_key.clone().or_else(|| self.chat.api_key.clone()),
                temperature: chat.temperature.unwrap_or(self.chat.temperature),
                max_tokens: chat.max_tokens.unwrap_or(self.chat.max_tokens),
                history_window: chat.history_window.unwrap_or(self.chat.history_window),
            },
        }
    }

    /// Load settings from the global config location plus environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence, reading `config_file` if it exists.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config file
        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3./4. Environment overrides
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply `GROQ_API_KEY` and `DSVIZ_*` environment variables.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let groq = Config::builder()
            .add_source(Environment::with_prefix("GROQ"))
            .build()
            .map_err(config_err)?;
        if let Ok(val) = groq.get_string("api_key") {
            settings.chat.api_key = Some(val);
        }

        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DSVIZ")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<u32>("speed") {
            settings.speed = val;
        }
        if let Ok(val) = config.get::<usize>("array_size") {
            settings.array_size = val;
        }
        if let Ok(val) = config.get_string("chat.api_url") {
            settings.chat.api_url = val;
        }
        if let Ok(val) = config.get_string("chat.model") {
            settings.chat.model = val;
        }
        if let Ok(val) = config.get_string("chat.api_key") {
            settings.chat.api_key = Some(val);
        }
        if let Ok(val) = config.get::<f32>("chat.temperature") {
            settings.chat.temperature = val;
        }
        if let Ok(val) = config.get::<u32>("chat.max_tokens") {
            settings.chat.max_tokens = val;
        }
        if let Ok(val) = config.get::<usize>("chat.history_window") {
            settings.chat.history_window = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML. The API key is never printed.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        shown.chat.api_key = shown.chat.api_key.map(|_| "********".to_string());
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dsviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/dsviz/dsviz.toml
#   Env:    GROQ_API_KEY, then DSVIZ_* environment variables
#           (use __ between table and key, e.g. DSVIZ_CHAT__MODEL)

# Data directory; saved state and sessions live in data_dir/store
# data_dir = "~/.dsviz"

# Sort playback speed in percent (1-100), delay per step is 101 - speed ms
# speed = 50

# Number of random values for the sort visualizer (10-50)
# array_size = 30

[chat]
# OpenAI-compatible chat completions endpoint
# api_url = "https://api.groq.com/openai/v1/chat/completions"

# model = "llama-3.3-70b-versatile"

# API key (prefer the GROQ_API_KEY environment variable)
# api_key = "gsk_..."

# temperature = 0.7
# max_tokens = 800

# Prior messages sent along with each question
# history_window = 6
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_file_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).expect("load defaults");
        assert!(settings.data_dir.to_string_lossy().contains(".dsviz"));
        assert_eq!(settings.chat.model, DEFAULT_CHAT_MODEL);
        assert_eq!(settings.chat.history_window, 6);
    }

    #[test]
    fn given_partial_file_when_loading_then_unspecified_fields_keep_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dsviz.toml");
        std::fs::write(
            &path,
            "speed = 90\n[chat]\nmodel = \"other-model\"\nmax_tokens = 100\n",
        )
        .unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();

        assert_eq!(settings.speed, 90);
        assert_eq!(settings.array_size, 30);
        assert_eq!(settings.chat.model, "other-model");
        assert_eq!(settings.chat.max_tokens, 100);
        assert_eq!(settings.chat.api_url, DEFAULT_CHAT_URL);
    }

    #[test]
    fn given_invalid_toml_when_loading_then_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dsviz.toml");
        std::fs::write(&path, "speed = \"fast").unwrap();

        let err = Settings::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.dsviz"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_dir.to_string_lossy().starts_with(&home));
        assert_eq!(settings.store_dir(), settings.data_dir.join("store"));
    }

    #[test]
    fn given_api_key_when_rendering_toml_then_masked() {
        let mut settings = Settings::default();
        settings.chat.api_key = Some("gsk_secret".into());

        let toml = settings.to_toml().unwrap();

        assert!(!toml.contains("gsk_secret"));
        assert!(toml.contains("********"));
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_dir.is_none());
    }
}
