//! Integration tests for layered settings and service wiring.
//!
//! Precedence, lowest to highest: defaults, config file, GROQ_API_KEY,
//! DSVIZ_* environment variables.

use std::fs;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use dsviz::config::Settings;
use dsviz::infrastructure::di::ServiceContainer;
use dsviz::infrastructure::groq::GroqClient;
use dsviz::infrastructure::store::MemoryStore;
use dsviz::infrastructure::traits::ChatClient;
use dsviz::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[rstest]
fn given_data_dir_with_env_var_when_loading_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dsviz.toml");
    fs::write(&path, "data_dir = \"$HOME/dsviz-data\"\narray_size = 12\n").unwrap();

    let settings = Settings::load_from(Some(&path)).unwrap();

    let home = std::env::var("HOME").unwrap();
    assert_eq!(settings.data_dir, std::path::PathBuf::from(home).join("dsviz-data"));
    assert_eq!(settings.store_dir(), settings.data_dir.join("store"));
    assert_eq!(settings.array_size, 12);
}

#[rstest]
fn given_missing_config_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();

    assert_eq!(settings.array_size, 30);
    assert_eq!(settings.chat.temperature, 0.7);
}

#[rstest]
fn given_dsviz_env_var_when_loading_then_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dsviz.toml");
    fs::write(&path, "[chat]\nmax_tokens = 100\n").unwrap();

    std::env::set_var("DSVIZ_CHAT__MAX_TOKENS", "321");
    let settings = Settings::load_from(Some(&path));
    std::env::remove_var("DSVIZ_CHAT__MAX_TOKENS");

    assert_eq!(settings.unwrap().chat.max_tokens, 321);
}

#[rstest]
fn given_settings_when_building_container_then_services_follow_settings() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.data_dir = dir.path().to_path_buf();
    settings.speed = 80;
    settings.chat.api_key = None;

    let chat: Arc<dyn ChatClient> = Arc::new(GroqClient::new(&settings.chat));
    let container = ServiceContainer::with_deps(settings, Arc::new(MemoryStore::new()), chat);

    assert_eq!(container.playback().speed().percent(), 80);
    assert!(!container.chat.is_configured());
    assert!(container.persistence().load_current().is_empty());
    assert_eq!(container.tutor().transcript().len(), 1);
}
