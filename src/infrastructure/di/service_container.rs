//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{PersistenceService, PlaybackService, Speed, TutorService};
use crate::config::Settings;
use crate::infrastructure::groq::GroqClient;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{ChatClient, KeyValueStore};

/// Container holding the boundary implementations and building services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Key-value store for current state and sessions
    pub store: Arc<dyn KeyValueStore>,

    /// Hosted chat model
    pub chat: Arc<dyn ChatClient>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(JsonFileStore::new(settings.store_dir()));
        let chat = Arc::new(GroqClient::new(&settings.chat));
        Self::with_deps(settings, store, chat)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            store,
            chat,
        }
    }

    pub fn persistence(&self) -> PersistenceService {
        PersistenceService::new(Arc::clone(&self.store))
    }

    pub fn playback(&self) -> PlaybackService {
        PlaybackService::new(Speed::new(self.settings.speed))
    }

    pub fn tutor(&self) -> TutorService {
        TutorService::new(
            Arc::clone(&self.chat),
            self.settings.chat.options(),
            self.settings.chat.history_window,
        )
    }
}
